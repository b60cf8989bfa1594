//! Gateway event handling: slash commands in, replies out.

use crate::commands::{self, ParseError};
use crate::error::{DiscordError, InteractionError};
use milkbread_core::commands::attribute_not_found;
use milkbread_core::{Reply, Store, dispatch, suggest};
use serenity::{
    async_trait,
    builder::{
        CreateAttachment, CreateAutocompleteResponse, CreateEmbed, CreateInteractionResponse,
        CreateInteractionResponseFollowup, CreateInteractionResponseMessage,
    },
    client::{Context, EventHandler},
    model::{
        application::{CommandInteraction, Interaction},
        colour::Colour,
        gateway::Ready,
        id::GuildId,
    },
    prelude::*,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Shown when a handler reply could not be delivered for a reason other
/// than an expired interaction token
const COMMAND_FAILED: &str = "⚠️ 指令執行失敗，請稍後再試。";

/// Discord bot configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Discord bot token
    pub token: String,
    /// Discord application ID
    pub application_id: u64,
    /// Guild the slash commands are registered against
    pub guild_id: u64,
    /// Directory holding the bundled command images
    pub assets_dir: PathBuf,
}

/// Discord bot handler
pub struct MilkbreadBot {
    store: Arc<Store>,
    guild_id: u64,
    assets_dir: PathBuf,
}

impl MilkbreadBot {
    pub fn new(store: Arc<Store>, config: &BotConfig) -> Self {
        Self {
            store,
            guild_id: config.guild_id,
            assets_dir: config.assets_dir.clone(),
        }
    }

    async fn handle_command(&self, ctx: &Context, command: &CommandInteraction) {
        info!(
            "Received slash command: {} from user {}",
            command.data.name, command.user.name
        );

        let reply = match commands::parse_invocation(command) {
            Ok(invocation) => dispatch(&self.store, &invocation),
            Err(ParseError::UnknownAttribute { input }) => Reply::Text(attribute_not_found(&input)),
            Err(error @ ParseError::MissingOption { .. }) => {
                warn!("Malformed interaction payload: {}", error);
                Reply::Text(COMMAND_FAILED.to_string())
            }
            Err(ParseError::UnknownCommand { name }) => {
                warn!("Unknown command: {}", name);
                return;
            }
        };

        if let Err(error) = self.send_reply(ctx, command, reply).await {
            match error {
                InteractionError::Expired => {
                    debug!("Interaction expired before the reply went out")
                }
                InteractionError::Other(cause) => {
                    error!("Error sending command response: {:?}", cause);
                    self.send_failure_notice(ctx, command).await;
                }
            }
        }
    }

    async fn send_reply(
        &self,
        ctx: &Context,
        command: &CommandInteraction,
        reply: Reply,
    ) -> Result<(), InteractionError> {
        match reply {
            Reply::Text(content) => {
                let message = CreateInteractionResponseMessage::new().content(content);
                self.respond(ctx, command, message).await
            }
            Reply::Image { content, file_name } => {
                let path = self.assets_dir.join(&file_name);
                let attachment = CreateAttachment::path(&path).await?;
                let message = CreateInteractionResponseMessage::new()
                    .content(content)
                    .add_file(attachment);
                self.respond(ctx, command, message).await
            }
            Reply::Embed(embed) => {
                let embed = CreateEmbed::new()
                    .title(embed.title)
                    .description(embed.description)
                    .colour(Colour::new(embed.color));
                let message = CreateInteractionResponseMessage::new().embed(embed);
                self.respond(ctx, command, message).await
            }
            Reply::Paged(chunks) => {
                let mut chunks = chunks.into_iter();
                let Some(first) = chunks.next() else {
                    return Ok(());
                };
                let message = CreateInteractionResponseMessage::new().content(first);
                self.respond(ctx, command, message).await?;

                for chunk in chunks {
                    command
                        .create_followup(
                            &ctx.http,
                            CreateInteractionResponseFollowup::new().content(chunk),
                        )
                        .await?;
                }
                Ok(())
            }
        }
    }

    async fn respond(
        &self,
        ctx: &Context,
        command: &CommandInteraction,
        message: CreateInteractionResponseMessage,
    ) -> Result<(), InteractionError> {
        command
            .create_response(&ctx.http, CreateInteractionResponse::Message(message))
            .await?;
        Ok(())
    }

    /// Best effort: the interaction may or may not have been acknowledged
    /// when the original reply failed, so try both paths.
    async fn send_failure_notice(&self, ctx: &Context, command: &CommandInteraction) {
        let message = CreateInteractionResponseMessage::new().content(COMMAND_FAILED);
        if command
            .create_response(&ctx.http, CreateInteractionResponse::Message(message))
            .await
            .is_ok()
        {
            return;
        }

        let followup = CreateInteractionResponseFollowup::new().content(COMMAND_FAILED);
        if let Err(why) = command.create_followup(&ctx.http, followup).await {
            debug!("Could not deliver the failure notice: {:?}", why);
        }
    }

    async fn handle_autocomplete(&self, ctx: &Context, command: &CommandInteraction) {
        let Some(focused) = command.data.autocomplete() else {
            return;
        };

        let mut response = CreateAutocompleteResponse::new();
        if let Some(scope) = commands::suggestion_scope(command) {
            for name in suggest(&self.store, &scope, focused.value) {
                response = response.add_string_choice(name.clone(), name);
            }
        }

        // A dropped round is routine; the next keystroke starts another
        if let Err(why) = command
            .create_response(&ctx.http, CreateInteractionResponse::Autocomplete(response))
            .await
        {
            debug!("Autocomplete response dropped: {:?}", why);
        }
    }
}

#[async_trait]
impl EventHandler for MilkbreadBot {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);

        let commands = commands::create_commands();
        match GuildId::new(self.guild_id)
            .set_commands(&ctx.http, commands)
            .await
        {
            Ok(registered) => info!("Registered {} guild commands", registered.len()),
            Err(why) => error!("Cannot register slash commands: {:?}", why),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Command(command) => self.handle_command(&ctx, &command).await,
            Interaction::Autocomplete(command) => self.handle_autocomplete(&ctx, &command).await,
            _ => {}
        }
    }
}

/// Create the Discord client (without starting it)
pub async fn create_client(store: Arc<Store>, config: &BotConfig) -> Result<Client, DiscordError> {
    let handler = MilkbreadBot::new(store, config);

    let intents = GatewayIntents::GUILDS;

    Client::builder(&config.token, intents)
        .event_handler(handler)
        .application_id(config.application_id.into())
        .await
        .map_err(|cause| DiscordError::ClientBuildFailed { cause })
}

/// Create and run the Discord bot until the gateway connection ends
pub async fn run_bot(store: Arc<Store>, config: BotConfig) -> Result<(), DiscordError> {
    let mut client = create_client(store, &config).await?;

    info!("Starting Discord bot...");
    client
        .start()
        .await
        .map_err(|cause| DiscordError::GatewayConnectionLost { cause })
}
