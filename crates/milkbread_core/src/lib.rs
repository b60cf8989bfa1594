//! Milkbread Core - Reference Data and Command Handlers
//!
//! This crate owns the read-only reference tables, the slash-command
//! handlers, and the autocomplete resolver. Everything here is plain data
//! in and plain data out; the Discord surface lives in its own crate.

pub mod autocomplete;
pub mod commands;
pub mod config;
pub mod error;
pub mod roster;
pub mod store;

pub use autocomplete::{MAX_SUGGESTIONS, SuggestionScope, suggest};
pub use commands::{EmbedReply, Invocation, Reply, dispatch};
pub use config::Config;
pub use error::{ConfigError, CoreError, Result};
pub use store::{Attribute, Store};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        Attribute, Config, CoreError, EmbedReply, Invocation, Reply, Result, Store,
        SuggestionScope, dispatch, suggest,
    };
}
