pub mod ban;
pub mod channel;
pub mod cleanup;
pub mod clearwarns;
pub mod deletewarn;
pub mod kick;
pub mod lock;
pub mod massban;
pub mod modnick;
pub mod purge;
pub mod role;
pub mod setnick;
pub mod slowmode;
pub mod softban;
pub mod timeout;
pub mod unban;
pub mod unmute;
pub mod visibility;
pub mod warn;
pub mod warnings;

pub(crate) mod embeds;
pub(crate) mod guard;
mod overwrites;
