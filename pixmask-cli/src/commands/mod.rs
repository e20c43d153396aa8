//! Subcommand implementations.

pub mod delete;
pub mod inspect;
pub mod modify;
