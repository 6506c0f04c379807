//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod card_view;
pub mod model_list;

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::card::Card;
use crate::cli::card_view::render_card;
use crate::cli::model_list::list_models;
use crate::core::config::{Config, Settings};
use crate::core::generator::CardGenerator;
use crate::core::key_check::KeyValidator;
use crate::core::photo::Photo;
use crate::core::vision::GeminiClient;
use crate::utils::logging::init_logging;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ", ",
    env!("VERGEN_GIT_SHA"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

#[derive(Parser)]
#[command(name = "mythicard")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Turn photos into trading cards with a generative vision model")]
#[command(
    long_about = "Mythicard sends a photo to a Gemini vision model and turns the reply into a \
trading card: a name, a category, four stats with icons, lore, and a rarity.\n\n\
Environment Variables:\n\
  GEMINI_API_KEY      Default API key (GOOGLE_API_KEY is also accepted)\n\
  MYTHICARD_MODEL     Model to use (defaults to gemini-2.0-flash)\n\
  MYTHICARD_BASE_URL  API base URL\n\
  MYTHICARD_LOG       Log filter, e.g. mythicard=debug"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(short = 'l', long, global = true, value_name = "PATH")]
    pub log: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a card from a photo
    Generate {
        /// Image file, or a data:<mime>;base64,... URI
        photo: String,
        /// API key to use instead of the configured default
        #[arg(long)]
        api_key: Option<String>,
        /// Also save the card as JSON to this path
        #[arg(short, long, value_name = "PATH")]
        out: Option<PathBuf>,
        /// Print the card as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Check whether an API key can reach the provider
    CheckKey {
        /// Key to check (defaults to the configured key)
        key: Option<String>,
    },
    /// List models that can generate cards
    Models,
    /// Print a saved card
    Show {
        /// Card JSON file
        card: PathBuf,
    },
    /// Write new lore for a saved card
    Lore {
        /// Card JSON file
        card: PathBuf,
        /// Theme for the new lore, e.g. "noir detective"
        #[arg(short, long)]
        theme: String,
        /// API key to use instead of the configured default
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Print the effective configuration
    Config,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    if let Err(e) = init_logging(args.verbose, args.log.as_deref()) {
        eprintln!("⚠️  Logging disabled: {e}");
    }

    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };
    let settings = config.resolve();
    debug!(model = %settings.model, base_url = %settings.base_url, "settings resolved");

    match args.command {
        Commands::Generate {
            photo,
            api_key,
            out,
            json,
        } => generate(&settings, &photo, api_key.as_deref(), out.as_deref(), json).await,
        Commands::CheckKey { key } => check_key(&settings, key.as_deref()).await,
        Commands::Models => list_models(&settings).await,
        Commands::Show { card } => {
            let card = load_card(&card)?;
            println!("{}", render_card(&card));
            Ok(())
        }
        Commands::Lore {
            card,
            theme,
            api_key,
        } => regenerate_lore(&settings, &card, &theme, api_key.as_deref()).await,
        Commands::Config => {
            settings.print_all();
            Ok(())
        }
    }
}

fn build_generator(settings: &Settings) -> Result<CardGenerator<GeminiClient>, Box<dyn Error>> {
    let client = GeminiClient::new(
        settings.base_url.clone(),
        settings.model.clone(),
        settings.request_timeout,
    )?;
    Ok(CardGenerator::new(client)
        .with_default_credential(settings.api_key.clone())
        .with_temperature(settings.temperature))
}

async fn read_photo(source: &str) -> Result<Photo, Box<dyn Error>> {
    if source.starts_with("data:") {
        Ok(Photo::from_data_uri(source)?)
    } else {
        Ok(Photo::load(Path::new(source)).await?)
    }
}

fn load_card(path: &Path) -> Result<Card, Box<dyn Error>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read card at {}: {e}", path.display()))?;
    let card = Card::from_saved_json(&contents)
        .map_err(|e| format!("Failed to parse card at {}: {e}", path.display()))?;
    Ok(card)
}

async fn generate(
    settings: &Settings,
    source: &str,
    api_key: Option<&str>,
    out: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let photo = read_photo(source).await?;
    let generator = build_generator(settings)?;

    let cancel = CancellationToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_token.cancel();
        }
    });

    if !json {
        eprintln!("📸 Reading the photo with {}...", generator.model().model());
    }

    let card = match generator.generate_with_cancel(&photo, api_key, &cancel).await {
        Ok(card) => card,
        Err(e) if e.is_cancelled() => {
            eprintln!("⚠️  Cancelled");
            std::process::exit(130);
        }
        Err(e) => {
            error!(kind = e.kind().as_str(), error = %e, "card generation failed");
            eprintln!("❌ {}", e.user_message());
            std::process::exit(1);
        }
    };

    let card_json = serde_json::to_string_pretty(&card)?;
    if let Some(path) = out {
        tokio::fs::write(path, &card_json).await?;
        eprintln!("✅ Saved card to {}", path.display());
    }

    if json {
        println!("{card_json}");
    } else {
        println!("{}", render_card(&card));
    }
    Ok(())
}

async fn check_key(settings: &Settings, key: Option<&str>) -> Result<(), Box<dyn Error>> {
    let validator = KeyValidator::new(settings.base_url.clone(), settings.key_check_timeout)?;
    let key = key.or(settings.api_key.as_deref()).unwrap_or_default();

    if validator.check(key).await {
        println!("✅ API key is valid");
        Ok(())
    } else {
        eprintln!("❌ API key is not valid");
        std::process::exit(1);
    }
}

async fn regenerate_lore(
    settings: &Settings,
    path: &Path,
    theme: &str,
    api_key: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let card = load_card(path)?;
    let generator = build_generator(settings)?;

    match generator.regenerate_lore(&card, theme, api_key).await {
        Ok(lore) => {
            println!("{lore}");
            Ok(())
        }
        Err(e) => {
            error!(kind = e.kind().as_str(), error = %e, "lore generation failed");
            eprintln!("❌ Could not write new lore. Please try again.");
            std::process::exit(1);
        }
    }
}
