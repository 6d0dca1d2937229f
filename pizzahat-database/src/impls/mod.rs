pub mod staff_role;
pub mod warnings;
