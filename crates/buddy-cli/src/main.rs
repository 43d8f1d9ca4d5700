use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use buddy_application::BuddyApp;
use buddy_core::config::LoggingConfig;
use buddy_infrastructure::{BuddyPaths, ConfigService, open_store};

mod commands;

#[derive(Parser)]
#[command(name = "buddy")]
#[command(about = "Buddy Builder - create AI buddies and chat with them", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding stored buddies (overrides the config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all buddies
    List,
    /// Show one buddy
    Show {
        /// Buddy ID
        id: String,
    },
    /// Create a new buddy
    Create {
        #[arg(long)]
        name: String,
        /// Friendly, Professional, Creative or Witty (any case)
        #[arg(long)]
        personality: String,
        #[arg(long)]
        description: Option<String>,
        /// Avatar image URL
        #[arg(long)]
        image: Option<String>,
    },
    /// Edit a buddy's settings
    Settings {
        /// Buddy ID
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        personality: Option<String>,
        /// Avatar image URL; an empty value removes it
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        memory: Option<bool>,
        /// Creativity slider, 0-100
        #[arg(long)]
        creativity: Option<u8>,
    },
    /// Delete a buddy
    Delete {
        /// Buddy ID
        id: String,
    },
    /// Chat with a buddy
    Chat {
        /// Buddy ID
        id: String,
    },
    /// List image transformation styles
    Styles,
    /// Apply a style to a PNG or JPEG image (at most 5 MiB)
    Transform {
        /// Source image
        input: PathBuf,
        /// Style id, see `buddy styles`
        #[arg(long)]
        style: String,
        /// Where to write the result; format follows the extension
        #[arg(long)]
        output: PathBuf,
    },
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = BuddyPaths::default();
    let config_service = match cli.config {
        Some(path) => ConfigService::new(path),
        None => ConfigService::from_paths(&paths)?,
    };
    let mut config = config_service.get_config()?;
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = Some(dir);
    }

    init_tracing(&config.logging);
    tracing::debug!("Using config from {}", config_service.path().display());

    match &cli.command {
        Commands::Styles => {
            commands::buddy::styles();
            return Ok(());
        }
        Commands::Transform {
            input,
            style,
            output,
        } => {
            commands::transform::run(input, style, output).await?;
            return Ok(());
        }
        _ => {}
    }

    let store = open_store(&config.storage, &paths)?;
    let app = BuddyApp::with_key_value_store(store, &config.chat)?;

    match cli.command {
        Commands::List => commands::buddy::list(&app).await,
        Commands::Show { id } => commands::buddy::show(&app, &id).await?,
        Commands::Create {
            name,
            personality,
            description,
            image,
        } => commands::buddy::create(&app, name, personality, description, image).await?,
        Commands::Settings {
            id,
            name,
            description,
            personality,
            image,
            memory,
            creativity,
        } => {
            let edits = commands::buddy::SettingsEdits {
                name,
                description,
                personality,
                image,
                memory,
                creativity,
            };
            commands::buddy::settings(&app, &id, edits).await?
        }
        Commands::Delete { id } => commands::buddy::delete(&app, &id).await?,
        Commands::Chat { id } => commands::chat::run(&app, &id).await?,
        Commands::Styles => commands::buddy::styles(),
        Commands::Transform {
            input,
            style,
            output,
        } => commands::transform::run(&input, &style, &output).await?,
    }

    Ok(())
}
