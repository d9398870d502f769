//! AI question answering: the `/ask` command and its time-bounded responder.

mod commands;
mod responder;

pub use commands::{ask_commands, ask_reply};
pub use responder::{ASK_TIMEOUT, AiResponder, race_timeout};
