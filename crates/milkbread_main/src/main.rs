use miette::Result;
use milkbread_core::config::{self, Config};
use milkbread_core::store::Store;
use milkbread_discord::{BotConfig, run_bot};
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod keepalive;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    init_logging();
    println!("Starting Milkbread Discord Bot");

    // Load environment variables
    config::load_dotenv();

    // Load configuration
    let config = Config::load()?;
    config.validate()?;

    println!("Loaded configuration");

    // Load reference data
    let store = Arc::new(Store::load(Path::new(&config.data.dir))?);

    // Liveness endpoint plus the loop that keeps the host awake
    tokio::spawn(keepalive::serve(config.http.port));
    tokio::spawn(keepalive::ping_loop(
        config.ping_url(),
        config.ping_interval(),
    ));

    // Convert config to bot module format
    let bot_config = BotConfig {
        token: config.discord.token.clone(),
        application_id: config.discord.application_id.unwrap_or_default(),
        guild_id: config.discord.guild_id.unwrap_or_default(),
        assets_dir: PathBuf::from(&config.data.assets),
    };

    // Run Discord bot
    run_bot(store, bot_config).await?;

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Create logs directory if it doesn't exist
    std::fs::create_dir_all("logs").ok();

    // Create file appender
    let file_appender = tracing_appender::rolling::daily("logs", "milkbread.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Leak the guard to keep it alive for the entire program
    Box::leak(Box::new(_guard));

    // Set up subscribers
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "milkbread_core=debug,milkbread_discord=debug,milkbread_main=debug,serenity=info"
                    .into()
            }),
        )
        .with(
            // Console output
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_line_number(true),
        )
        .with(
            // File output
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_ansi(false),
        )
        .init();
}
