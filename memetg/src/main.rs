#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use log::{info, warn};
use memetg_rs::{
    save_exported, BackgroundFile, BackgroundLoader, CardRecord, CardSession, CardSource,
    CompositeOptions, Coordinator, ImageSmoothingQuality, ImageSource, LoadedImage, Notice,
    RelayClient, Resolution, ScryfallClient, SearchOutcome, SearchStatus,
};
use std::path::{Path, PathBuf};

/// memetg: Put your own artwork into the art box of a trading card
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Look up a card by (fuzzy) name and print its details
    Search {
        /// Card name
        name: String,

        /// Base URL of a running memetg-server to search through
        #[arg(long)]
        api_url: Option<String>,
    },

    /// Look up a card, overlay a background into its art area and save the PNG
    Create {
        /// Card name
        name: String,

        /// Background image file
        #[arg(short, long)]
        background: Option<PathBuf>,

        /// Directory the custom card is written to
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Base URL of a running memetg-server to fetch through
        #[arg(long)]
        api_url: Option<String>,

        /// Background resampling quality. One of low, medium, high
        #[arg(long, default_value = "high")]
        smoothing: ImageSmoothingQuality,
    },

    /// Composite a local card image without contacting any service
    Compose {
        /// Card image file
        #[arg(short, long)]
        card_image: PathBuf,

        /// Card name, used for the output file name
        #[arg(short, long)]
        name: String,

        /// Background image file
        #[arg(short, long)]
        background: Option<PathBuf>,

        /// Directory the custom card is written to
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Background resampling quality. One of low, medium, high
        #[arg(long, default_value = "high")]
        smoothing: ImageSmoothingQuality,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { name, api_url } => match api_url {
            Some(api_url) => search(&RelayClient::new(api_url), &name).await,
            None => search(&ScryfallClient::default(), &name).await,
        },
        Commands::Create {
            name,
            background,
            output_dir,
            api_url,
            smoothing,
        } => {
            let options = CompositeOptions {
                smoothing,
                ..CompositeOptions::default()
            };
            match api_url {
                Some(api_url) => {
                    let backend = RelayClient::new(api_url);
                    create(backend, &name, background.as_deref(), &output_dir, options).await
                }
                None => {
                    let backend = ScryfallClient::default();
                    create(backend, &name, background.as_deref(), &output_dir, options).await
                }
            }
        }
        Commands::Compose {
            card_image,
            name,
            background,
            output_dir,
            smoothing,
        } => {
            let options = CompositeOptions {
                smoothing,
                ..CompositeOptions::default()
            };
            compose_local(&card_image, &name, background.as_deref(), &output_dir, options).await
        }
    }
}

async fn search<B: CardSource>(backend: &B, name: &str) -> anyhow::Result<()> {
    if name.trim().is_empty() {
        bail!("Card name is required");
    }
    let card = match backend.search(name).await {
        Ok(SearchOutcome::Found(card)) => card,
        Ok(SearchOutcome::NotFound) => bail!("{}", Notice::CardNotFound),
        Err(err) => {
            warn!("Error fetching card: {}", err);
            bail!("{}", Notice::SearchFailed)
        }
    };

    println!("{}", card.name);
    println!("{}", card.type_line);
    if !card.oracle_text.is_empty() {
        println!("{}", card.oracle_text);
    }
    if let Some(url) = card.preferred_image_url() {
        println!("{}", url);
    }
    Ok(())
}

async fn create<B>(
    backend: B,
    name: &str,
    background: Option<&Path>,
    output_dir: &Path,
    options: CompositeOptions,
) -> anyhow::Result<()>
where
    B: CardSource + ImageSource,
{
    let mut coordinator = Coordinator::with_options(backend, options);
    match coordinator.search(name).await {
        SearchStatus::Skipped => bail!("Card name is required"),
        SearchStatus::Failed(notice) => bail!("{}", notice),
        SearchStatus::Found(card) => info!("Using card {:?}", card.name),
    }

    let ticket = coordinator
        .select_search_result()
        .ok_or_else(|| anyhow!("{}", Notice::CardImageFailed))?;
    match coordinator.load_card_image(&ticket).await {
        Resolution::Ready => {}
        Resolution::Failed(notice) => bail!("{}", notice),
        Resolution::Stale => bail!("Card selection changed while loading its image"),
    }

    if let Some(path) = background {
        let file = BackgroundFile::from_path(path)
            .with_context(|| format!("Failed to read background file: {}", path.display()))?;
        if !coordinator.choose_background(file) {
            warn!("Ignoring background {}: not an image file", path.display());
        }
    }

    let report = coordinator.export().await?;
    for notice in &report.notices {
        eprintln!("{}", notice);
    }

    std::fs::create_dir_all(output_dir)?;
    let path = coordinator.save(&report.card, output_dir)?;
    println!("{}", path.display());
    Ok(())
}

async fn compose_local(
    card_image: &Path,
    name: &str,
    background: Option<&Path>,
    output_dir: &Path,
    options: CompositeOptions,
) -> anyhow::Result<()> {
    let card_bytes = std::fs::read(card_image)
        .with_context(|| format!("Failed to read card image: {}", card_image.display()))?;
    let card = LoadedImage::decode(&card_bytes)
        .with_context(|| format!("Failed to decode card image: {}", card_image.display()))?;

    let mut session = CardSession::new(options);
    session.select_loaded(CardRecord::named(name), card);

    let mut backgrounds = BackgroundLoader::new();
    if let Some(path) = background {
        let file = BackgroundFile::from_path(path)
            .with_context(|| format!("Failed to read background file: {}", path.display()))?;
        if backgrounds.load(file).is_none() {
            warn!("Ignoring background {}: not an image file", path.display());
        }
    }

    let report = session.export(backgrounds.current().as_deref()).await?;
    for notice in &report.notices {
        eprintln!("{}", notice);
    }

    std::fs::create_dir_all(output_dir)?;
    let path = save_exported(&report.card, output_dir)?;
    println!("{}", path.display());
    Ok(())
}
