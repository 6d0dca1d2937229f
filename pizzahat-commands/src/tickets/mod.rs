pub mod panel;
pub mod staffrole;
pub mod ticket;
