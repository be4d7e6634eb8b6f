//! JSON message protocol for hosts that talk to the bridge through strings.
//!
//! A request is an object with a `"command"` name and positional arguments
//! `"param1"` to `"param10"`:
//!
//! ```json
//! {"command": "step", "param1": 0, "param2": 0.016, "param3": 8, "param4": 3}
//! ```
//!
//! The reply is `{"data": ...}` on success (`"success"` for commands without a
//! result) or `{"error": "..."}` on failure.

mod command;
mod dispatch;

pub use self::command::{Command, Params, BodyDef, FixtureDef, PositionDef, ShapeDef, MAX_PARAMS};
pub use self::dispatch::{execute, handle_message};

use thiserror::Error;
use crate::error::BridgeError;

/// Errors raised while decoding or running a protocol message
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("command not specified")]
    MissingCommand,

    #[error("invalid command: {0}")]
    UnknownCommand(String),

    #[error("invalid params count for command: {0}")]
    MissingParams(String),

    #[error("invalid params for command: {command} ({reason})")]
    InvalidParams {
        command: String,
        reason: String,
    },

    #[error(transparent)]
    Bridge(#[from] BridgeError),
}
