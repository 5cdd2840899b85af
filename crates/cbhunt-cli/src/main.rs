mod collections;
mod missions;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use cbhunt_extract::{ExtractionPipeline, GeminiClient, RetryPolicy};
use cbhunt_store::{CollectionStore, ExportFormat, LegacyFileStore, LegacyStore, SqliteStore};
use cbhunt_workflow::Orchestrator;

use crate::collections::CollectionsCommands;
use crate::missions::{
    BrandArgs, IdeaKindArg, MatchArgs, PromptCommands, RunArgs, ScoutArgs, SelectArgs, TrendArgs,
};

pub(crate) type App = Orchestrator<SqliteStore>;
pub(crate) type Pipeline = ExtractionPipeline<GeminiClient>;

#[derive(Debug, Parser)]
#[command(name = "cbhunt")]
#[command(about = "Co-branding research missions and case notebooks")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search co-branding cases of a brand, review them and save the selection
    Search {
        #[command(flatten)]
        mission: BrandArgs,
        #[command(flatten)]
        run: RunArgs,
        #[command(flatten)]
        select: SelectArgs,
    },
    /// Spot trending IPs for a topic and save the selection as a new report
    Trends {
        #[command(flatten)]
        mission: TrendArgs,
        #[command(flatten)]
        run: RunArgs,
        /// 1-based trend numbers to save; all by default
        #[arg(long, value_delimiter = ',')]
        select: Vec<usize>,
        /// Show results without saving them
        #[arg(long)]
        no_save: bool,
        /// Search cases for the trend with this number instead of saving
        #[arg(long, conflicts_with_all = ["select", "no_save"])]
        research: Option<usize>,
    },
    /// Due-diligence profile of one IP
    Scout {
        #[command(flatten)]
        mission: ScoutArgs,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Recommend partner IPs for a brand campaign
    Match {
        #[command(flatten)]
        mission: MatchArgs,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Print the instruction text a mission would send
    Prompt {
        #[command(subcommand)]
        mission: PromptCommands,
    },
    /// Manage notebooks and reports
    Collections {
        #[command(subcommand)]
        command: CollectionsCommands,
    },
    /// Export a collection
    Export {
        /// Collection id or list number
        collection: String,
        #[arg(long, value_enum, default_value_t = FormatArg::Markdown)]
        format: FormatArg,
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Timeline, categories and keywords of a collection
    Stats {
        /// Collection id or list number
        collection: String,
    },
    /// Draft a social post from a collection
    Post {
        /// Collection id or list number
        collection: String,
    },
    /// Brainstorm brands or trend topics from a seed
    Ideas {
        #[arg(value_enum)]
        kind: IdeaKindArg,
        seed: String,
    },
    /// Suggest a full case from a keyword
    Autocomplete {
        keyword: String,
        /// Save the pre-selected suggestions as a manual case
        #[arg(long)]
        save: bool,
    },
    /// List the quick-pick brand catalog
    Picks {
        /// Only this category id
        category: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Markdown,
    Html,
    Mindmap,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Markdown => ExportFormat::Markdown,
            FormatArg::Html => ExportFormat::Html,
            FormatArg::Mindmap => ExportFormat::Mindmap,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("cbhunt: run `cbhunt --help` for commands");
        return Ok(());
    };

    let config = cbhunt_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Prompt { mission } => missions::run_prompt(&mission),
        Commands::Picks { category } => missions::run_picks(&config, category.as_deref()),
        Commands::Search {
            mission,
            run,
            select,
        } => {
            let (mut app, pipeline) = connect(&config).await?;
            missions::run_search(&mut app, &pipeline, &mission, &run, &select).await
        }
        Commands::Trends {
            mission,
            run,
            select,
            no_save,
            research,
        } => {
            let (mut app, pipeline) = connect(&config).await?;
            let save = missions::TrendSave {
                select,
                no_save,
                research,
            };
            missions::run_trends(&mut app, &pipeline, &mission, &run, &save).await
        }
        Commands::Scout { mission, run } => {
            let (mut app, pipeline) = connect(&config).await?;
            missions::run_scout(&mut app, &pipeline, &mission, &run).await
        }
        Commands::Match { mission, run } => {
            let (mut app, pipeline) = connect(&config).await?;
            missions::run_match(&mut app, &pipeline, &mission, &run).await
        }
        Commands::Collections { command } => {
            let mut app = open_app(&config).await?;
            collections::run_collections(&mut app, command).await
        }
        Commands::Export {
            collection,
            format,
            output,
        } => {
            let app = open_app(&config).await?;
            collections::run_export(&app, &collection, format.into(), output.as_deref())
        }
        Commands::Stats { collection } => {
            let app = open_app(&config).await?;
            collections::run_stats(&app, &collection)
        }
        Commands::Post { collection } => {
            let (app, pipeline) = connect(&config).await?;
            collections::run_post(&app, &pipeline, &collection).await
        }
        Commands::Ideas { kind, seed } => {
            let pipeline = build_pipeline(&config)?;
            missions::run_ideas(&pipeline, kind, &seed).await
        }
        Commands::Autocomplete { keyword, save } => {
            let (mut app, pipeline) = connect(&config).await?;
            missions::run_autocomplete(&mut app, &pipeline, &keyword, save).await
        }
    }
}

/// Opens the collection store, migrating a legacy file when one is
/// configured.
async fn open_app(config: &cbhunt_core::AppConfig) -> anyhow::Result<App> {
    tracing::debug!(database_url = %config.database_url, "opening collection store");
    let backend = SqliteStore::connect(&config.database_url).await?;
    let legacy = config.legacy_store_path.as_ref().map(LegacyFileStore::new);
    let store = CollectionStore::open(
        backend,
        legacy.as_ref().map(|l| l as &dyn LegacyStore),
    )
    .await?;
    Ok(Orchestrator::new(store))
}

fn build_pipeline(config: &cbhunt_core::AppConfig) -> anyhow::Result<Pipeline> {
    let client = GeminiClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build generative client: {e}"))?;
    let retry = RetryPolicy::new(config.max_retries, config.retry_backoff_base_ms);
    Ok(ExtractionPipeline::new(client, retry))
}

async fn connect(config: &cbhunt_core::AppConfig) -> anyhow::Result<(App, Pipeline)> {
    Ok((open_app(config).await?, build_pipeline(config)?))
}

#[cfg(test)]
mod tests;
