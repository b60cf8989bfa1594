//! Milkbread Discord - The Bot Surface
//!
//! Serenity event handling, slash-command registration, and the mapping
//! from handler replies onto interaction responses.

pub mod bot;
pub mod commands;
pub mod error;

pub use bot::{BotConfig, MilkbreadBot, create_client, run_bot};
pub use commands::{ParseError, create_commands, parse_invocation, suggestion_scope};
pub use error::{DiscordError, InteractionError, Result};

// Re-export serenity for convenience
pub use serenity;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_builder_per_command() {
        assert_eq!(create_commands().len(), 6);
    }
}
