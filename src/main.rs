use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use trackgene::config::{
    AppConfig, CliConfig, FileConfig, DEFAULT_RECOMMEND_LIMIT, DEFAULT_WINDOW_SIZE,
};
use trackgene::{
    exemplars, gene_distribution, overall_gene, Catalog, CatalogBuilder, CatalogSource, GeneTrait,
    Recommender, RngSampler, Taxonomy, WebMusicService,
};

#[derive(Parser, Debug)]
#[clap(version, about = "Gene-code a listener's tracks and explore the buckets")]
struct CliArgs {
    /// Listening window to build the catalog from ("recent" or "top").
    #[clap(long, default_value = "recent")]
    pub source: String,

    /// Taxonomy variant used for classification ("classic" or "composite").
    #[clap(long)]
    pub taxonomy: Option<String>,

    /// Number of tracks to pull from the listening window.
    #[clap(long, default_value_t = DEFAULT_WINDOW_SIZE)]
    pub window_size: usize,

    /// Gene code to inspect: lists its tracks and seeds recommendations.
    #[clap(long)]
    pub gene: Option<String>,

    /// Maximum number of recommended tracks (used with --gene).
    #[clap(long, default_value_t = DEFAULT_RECOMMEND_LIMIT)]
    pub recommend_limit: usize,

    /// Base URL of the music-catalog service.
    #[clap(long)]
    pub api_base_url: Option<String>,

    /// Bearer token for the catalog service. Falls back to $TRACKGENE_TOKEN.
    #[clap(long)]
    pub token: Option<String>,

    /// Path to a TOML config file; its values override CLI flags.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Write the built catalog as JSON to this path (debugging artifact).
    #[clap(long)]
    pub export: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let source = match CatalogSource::from_api_str(&cli_args.source) {
        Some(CatalogSource::Recommended) | None => {
            bail!("--source must be 'recent' or 'top'")
        }
        Some(source) => source,
    };

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;

    let cli_config = CliConfig {
        taxonomy: cli_args.taxonomy.clone(),
        window_size: cli_args.window_size,
        recommend_limit: cli_args.recommend_limit,
        api_base_url: cli_args.api_base_url.clone(),
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    let token = match cli_args
        .token
        .or_else(|| std::env::var("TRACKGENE_TOKEN").ok())
    {
        Some(token) if !token.is_empty() => token,
        _ => bail!("A catalog service token is required (--token or $TRACKGENE_TOKEN)"),
    };

    let service = WebMusicService::new(&config.api_base_url, &token)?;
    let builder = CatalogBuilder::new(&service, config.taxonomy);

    info!(
        "Building catalog from the '{}' window ({} taxonomy)...",
        source.as_api_str(),
        config.taxonomy.as_config_str()
    );
    let catalog = builder.build_catalog(source, config.window_size)?;
    if catalog.is_empty() {
        println!("No classifiable tracks in the '{}' window.", source.as_api_str());
        return Ok(());
    }

    print_distribution(&catalog, config.taxonomy);
    print_exemplars(&catalog);

    if let Some(code) = &cli_args.gene {
        print_gene_bucket(&catalog, code, config.taxonomy)?;

        let mut recommender = Recommender::new(&service, config.taxonomy, Box::new(RngSampler));
        let recommended = recommender.recommend(&catalog, code, config.recommend_limit)?;
        println!("\nRecommended from {} ({} tracks):", code, recommended.len());
        for track in &recommended.tracks {
            println!("  {} — {} [{}]", track.name, track.artist_name, track.gene);
        }
    }

    if let Some(path) = &cli_args.export {
        export_catalog(&catalog, path)?;
    }

    Ok(())
}

fn print_distribution(catalog: &Catalog, taxonomy: Taxonomy) {
    println!("\nGene distribution ({} tracks):", catalog.len());
    for bucket in gene_distribution(catalog) {
        let legend: Vec<&str> = bucket
            .code
            .as_str()
            .chars()
            .filter_map(|symbol| taxonomy.describe_symbol(symbol))
            .collect();
        println!(
            "  {}  {:>5.1}%  ({:>2} tracks)  {}",
            bucket.code,
            bucket.percentage,
            bucket.count,
            legend.join(", ")
        );
    }
    if let Some(code) = overall_gene(catalog, taxonomy) {
        println!("Overall gene: {}", code);
    }
}

fn print_exemplars(catalog: &Catalog) {
    for gene_trait in GeneTrait::ALL {
        let picks = exemplars(catalog, gene_trait);
        println!("\nTop {}:", gene_trait.as_api_str());
        for track in &picks.top {
            println!("  {} — {}", track.name, track.artist_name);
        }
        if let Some(track) = &picks.bottom {
            println!("  contrary: {} — {}", track.name, track.artist_name);
        }
    }
}

fn print_gene_bucket(catalog: &Catalog, code: &str, taxonomy: Taxonomy) -> Result<()> {
    let Some(parsed) = taxonomy.parse_code(code) else {
        bail!(
            "'{}' is not a valid {} gene code",
            code,
            taxonomy.as_config_str()
        );
    };
    let tracks = catalog.tracks_by_gene(&parsed);
    println!("\nTracks with gene {} ({} of {}):", parsed, tracks.len(), catalog.len());
    for track in tracks {
        let marker = if track.in_library { "*" } else { " " };
        println!("  {}{} — {}", marker, track.name, track.artist_name);
    }
    Ok(())
}

fn export_catalog(catalog: &Catalog, path: &PathBuf) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create export file: {:?}", path))?;
    serde_json::to_writer_pretty(file, catalog)
        .with_context(|| format!("Failed to write catalog export: {:?}", path))?;
    info!("Catalog exported to {:?}", path);
    Ok(())
}
