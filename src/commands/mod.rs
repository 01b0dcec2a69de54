//! CLI command implementations
//!
//! Every command works on a [`FieldCodec`] bound to the image file:
//!
//! - read-only commands (`show`, `dump`, `json`) reload the image first and
//!   never save
//! - `field` only needs the schema
//! - destructive commands (`init`, `erase`) ask a [`Confirm`] before they
//!   touch the image, then save it
//! - `update` reloads, validates every assignment, then applies and saves
//!
//! [`FieldCodec`]: eepctl_core::FieldCodec
//! [`Confirm`]: crate::confirm::Confirm

mod erase;
mod list;
mod show;
mod write;

pub use erase::cmd_erase;
pub use list::cmd_field;
pub use show::{cmd_dump, cmd_json, cmd_show};
pub use write::{cmd_init, cmd_update};

use std::io;
use thiserror::Error;

/// Errors reported by command implementations
#[derive(Debug, Error)]
pub enum CommandError {
    /// Malformed command argument
    #[error("invalid argument '{0}', expected <field>=<value>")]
    Usage(String),

    /// Field name not declared by the schema
    #[error("unknown field '{name}'. Available fields are: {}", available.join(", "))]
    UnknownField { name: String, available: Vec<String> },

    /// Error from the image or codec
    #[error(transparent)]
    Core(#[from] eepctl_core::Error),

    /// Terminal I/O failed (e.g., reading the confirmation)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CommandError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        2
    }
}

/// Result type for command implementations
pub type Result<T> = std::result::Result<T, CommandError>;
