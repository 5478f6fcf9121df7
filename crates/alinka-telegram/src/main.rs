//! Alinka Telegram Bot binary.
//!
//! Start the bot with:
//! ```bash
//! TELEGRAM_TOKEN=xxx GOOGLE_API_KEY=xxx HUGGINGFACE_TOKEN=xxx cargo run -p alinka-telegram
//! ```

use alinka_core::BotConfig;
use alinka_telegram::AlinkaBot;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Alinka - video director and chat companion on Telegram
#[derive(Parser, Debug)]
#[command(name = "alinka")]
#[command(about = "Telegram bot that writes video concepts and paints them")]
struct Args {
    /// Health server port (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Local .env.local or .env, if present
    let _ = dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv());

    // Initialize logging based on verbosity
    let filter = match args.verbose {
        0 => "alinka_telegram=info,alinka_core=info,teloxide=warn",
        1 => "alinka_telegram=debug,alinka_core=debug,teloxide=info",
        2 => "alinka_telegram=trace,alinka_core=trace,teloxide=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config = BotConfig::from_env()?;
    if let Some(port) = args.port {
        config.port = port;
    }
    tracing::debug!(config = ?config, "Configuration loaded");

    let bot = AlinkaBot::new(&config);

    match bot.get_me().await {
        Ok(username) => {
            tracing::info!(username = %username, port = bot.port(), "Bot initialized successfully");
            println!("\n[robot] Alinka Telegram Bot");
            println!("   Bot: @{}", username);
            println!("   Health: http://0.0.0.0:{}/", bot.port());
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to get bot info");
            return Err(e.into());
        }
    }

    println!("\n[phone] Open Telegram and send /start to begin");
    println!("   Press Ctrl+C to stop\n");

    bot.start_polling().await?;

    Ok(())
}
