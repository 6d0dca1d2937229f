/// Shared embed colors and builders.
pub mod embed;
/// Shared formatting helpers (durations, mentions, names).
pub mod formatting;
/// Message-command prefix; the bot also answers to a mention.
pub const COMMAND_PREFIX: &str = "p!";
/// Shared pagination helper utilities.
pub mod pagination;
/// Pure parser helpers.
pub mod parse;
/// Permission and role-rank helpers.
pub mod permissions;
/// Shared time helpers.
pub mod time;
