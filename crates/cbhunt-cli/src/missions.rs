//! Mission command handlers: run a mission, print the findings, and commit
//! what was selected.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand, ValueEnum};

use cbhunt_core::{
    BrandSearchConfig, Case, MatchConfig, MissionConfig, ScoutConfig, TrendConfig,
};
use cbhunt_extract::{build_query, IdeaKind};

use crate::render;
use crate::{App, Pipeline};

#[derive(Debug, Args)]
pub struct BrandArgs {
    /// Brand to research
    pub brand: String,
    /// Search keyword; repeat for several. Defaults to the deep-research set
    #[arg(long = "keyword")]
    pub keywords: Vec<String>,
    /// Platform to search; repeat for several
    #[arg(long = "platform")]
    pub platforms: Vec<String>,
}

impl BrandArgs {
    pub fn to_config(&self) -> MissionConfig {
        let mut config = BrandSearchConfig::deep_research(&self.brand);
        if !self.keywords.is_empty() {
            config.keywords.clone_from(&self.keywords);
        }
        if !self.platforms.is_empty() {
            config.platforms.clone_from(&self.platforms);
        }
        MissionConfig::BrandSearch(config)
    }
}

#[derive(Debug, Args)]
pub struct TrendArgs {
    pub topic: String,
    #[arg(long, default_value = "last 3 months")]
    pub time_scale: String,
    #[arg(long, default_value_t = 10)]
    pub limit: u32,
    #[arg(long = "keyword")]
    pub keywords: Vec<String>,
    #[arg(long = "platform")]
    pub platforms: Vec<String>,
}

impl TrendArgs {
    pub fn to_config(&self) -> MissionConfig {
        MissionConfig::Trend(TrendConfig {
            topic: self.topic.clone(),
            time_scale: self.time_scale.clone(),
            limit: self.limit,
            keywords: self.keywords.clone(),
            platforms: self.platforms.clone(),
        })
    }
}

#[derive(Debug, Args)]
pub struct ScoutArgs {
    /// IP to profile
    pub ip: String,
}

impl ScoutArgs {
    pub fn to_config(&self) -> MissionConfig {
        MissionConfig::Scout(ScoutConfig {
            ip_name: self.ip.clone(),
        })
    }
}

#[derive(Debug, Args)]
pub struct MatchArgs {
    pub brand: String,
    #[arg(long)]
    pub industry: String,
    /// What the campaign should achieve
    #[arg(long)]
    pub goal: String,
    #[arg(long)]
    pub audience: Option<String>,
}

impl MatchArgs {
    pub fn to_config(&self) -> MissionConfig {
        MissionConfig::Match(MatchConfig {
            brand_name: self.brand.clone(),
            industry: self.industry.clone(),
            campaign_goal: self.goal.clone(),
            target_audience: self.audience.clone(),
        })
    }
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Send the instruction text in this file instead of the generated one
    #[arg(long)]
    pub prompt_file: Option<PathBuf>,
}

#[derive(Debug, Default, Args)]
pub struct SelectArgs {
    /// 1-based result numbers to keep; all results by default
    #[arg(long, value_delimiter = ',')]
    pub select: Vec<usize>,
    /// Deselect results flagged as probable duplicates
    #[arg(long)]
    pub skip_duplicates: bool,
    /// Show results without saving them
    #[arg(long)]
    pub no_save: bool,
}

/// What to do with trend results.
#[derive(Debug, Default)]
pub struct TrendSave {
    pub select: Vec<usize>,
    pub no_save: bool,
    pub research: Option<usize>,
}

#[derive(Debug, Subcommand)]
pub enum PromptCommands {
    Search(BrandArgs),
    Trends(TrendArgs),
    Scout(ScoutArgs),
    Match(MatchArgs),
}

impl PromptCommands {
    pub fn to_config(&self) -> MissionConfig {
        match self {
            PromptCommands::Search(args) => args.to_config(),
            PromptCommands::Trends(args) => args.to_config(),
            PromptCommands::Scout(args) => args.to_config(),
            PromptCommands::Match(args) => args.to_config(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IdeaKindArg {
    Brands,
    Topics,
}

impl From<IdeaKindArg> for IdeaKind {
    fn from(value: IdeaKindArg) -> Self {
        match value {
            IdeaKindArg::Brands => IdeaKind::Brands,
            IdeaKindArg::Topics => IdeaKind::TrendTopics,
        }
    }
}

fn read_prompt_file(path: Option<&Path>) -> anyhow::Result<Option<String>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read prompt file {}: {e}", path.display()))?;
    if text.trim().is_empty() {
        anyhow::bail!("prompt file {} is empty", path.display());
    }
    Ok(Some(text))
}

/// Turns 1-based result numbers into indices. An empty list selects all.
pub(crate) fn to_indices(numbers: &[usize], len: usize) -> anyhow::Result<Vec<usize>> {
    if numbers.is_empty() {
        return Ok((0..len).collect());
    }
    numbers
        .iter()
        .map(|&n| {
            if n == 0 || n > len {
                anyhow::bail!("result {n} does not exist; pick 1 to {len}");
            }
            Ok(n - 1)
        })
        .collect()
}

/// Print the instruction text for a mission without sending it.
///
/// # Errors
///
/// Returns an error if the mission input is incomplete.
pub(crate) fn run_prompt(mission: &PromptCommands) -> anyhow::Result<()> {
    let config = mission.to_config();
    config.validate()?;
    println!("{}", build_query(&config).instruction_text);
    Ok(())
}

pub(crate) fn run_picks(
    config: &cbhunt_core::AppConfig,
    category: Option<&str>,
) -> anyhow::Result<()> {
    let catalog = cbhunt_core::load_quick_picks(&config.quick_picks_path)?;
    let categories: Vec<_> = match category {
        Some(id) => vec![catalog
            .category(id)
            .ok_or_else(|| anyhow::anyhow!("quick-pick category '{id}' not found"))?],
        None => catalog.categories.iter().collect(),
    };
    for category in categories {
        println!("{} ({})", category.label, category.id);
        for pick in &category.brands {
            println!("  {:<24}{}", pick.name, pick.desc);
        }
    }
    Ok(())
}

/// Search cases for a brand, print them with duplicate flags, and confirm
/// the selection into the target notebook.
///
/// # Errors
///
/// Returns an error if the mission fails or the selection cannot be saved.
pub(crate) async fn run_search(
    app: &mut App,
    pipeline: &Pipeline,
    mission: &BrandArgs,
    run: &RunArgs,
    select: &SelectArgs,
) -> anyhow::Result<()> {
    let instruction = read_prompt_file(run.prompt_file.as_deref())?;
    app.run_mission(pipeline, mission.to_config(), instruction)
        .await?;
    review_and_commit(app, select).await
}

async fn review_and_commit(app: &mut App, select: &SelectArgs) -> anyhow::Result<()> {
    let duplicates = app.review_duplicates();
    let cases = app.review_cases();
    if cases.is_empty() {
        println!("no cases found");
        app.discard_review()?;
        return Ok(());
    }

    for (i, case) in cases.iter().enumerate() {
        render::print_case_line(i + 1, case, duplicates[i]);
    }
    render::print_sources(app.metadata());

    if select.no_save {
        return Ok(());
    }

    let chosen: Vec<usize> = to_indices(&select.select, cases.len())?
        .into_iter()
        .filter(|&i| !(select.skip_duplicates && duplicates[i]))
        .collect();
    if chosen.is_empty() {
        app.discard_review()?;
        println!("nothing selected; review discarded");
        return Ok(());
    }

    let count = chosen.len();
    app.confirm_review(&chosen).await?;
    if let Some(notebook) = app.current_collection() {
        println!(
            "saved {count} case(s) to '{}' ({} total)",
            notebook.name,
            notebook.cases.len()
        );
    }
    Ok(())
}

/// Spot trends, then save them as a report or deep-research one of them.
///
/// # Errors
///
/// Returns an error if a mission fails or the report cannot be saved.
pub(crate) async fn run_trends(
    app: &mut App,
    pipeline: &Pipeline,
    mission: &TrendArgs,
    run: &RunArgs,
    save: &TrendSave,
) -> anyhow::Result<()> {
    let instruction = read_prompt_file(run.prompt_file.as_deref())?;
    app.run_mission(pipeline, mission.to_config(), instruction)
        .await?;

    let trends = app.trend_results();
    if trends.is_empty() {
        println!("no trends found for '{}'", mission.topic);
        return Ok(());
    }
    render::print_trends(trends);
    render::print_sources(app.metadata());

    if let Some(number) = save.research {
        let index = to_indices(&[number], trends.len())?[0];
        let ticket = app.research_trend(index)?;
        println!();
        println!("researching {}...", mission_subject(ticket.config()));
        app.run_ticket(pipeline, &ticket).await?;
        return review_and_commit(app, &SelectArgs::default()).await;
    }

    if save.no_save {
        return Ok(());
    }
    let chosen = to_indices(&save.select, trends.len())?;
    app.save_selected_trends(&chosen).await?;
    if let Some(report) = app.current_collection() {
        println!("saved {} trend(s) as '{}'", report.trends.len(), report.name);
    }
    Ok(())
}

fn mission_subject(config: &MissionConfig) -> &str {
    match config {
        MissionConfig::BrandSearch(c) => &c.brand_name,
        MissionConfig::Trend(c) => &c.topic,
        MissionConfig::Scout(c) => &c.ip_name,
        MissionConfig::Match(c) => &c.brand_name,
    }
}

/// # Errors
///
/// Returns an error if the mission fails.
pub(crate) async fn run_scout(
    app: &mut App,
    pipeline: &Pipeline,
    mission: &ScoutArgs,
    run: &RunArgs,
) -> anyhow::Result<()> {
    let instruction = read_prompt_file(run.prompt_file.as_deref())?;
    app.run_mission(pipeline, mission.to_config(), instruction)
        .await?;
    if let Some(profile) = app.ip_profile() {
        render::print_profile(profile);
    }
    render::print_sources(app.metadata());
    Ok(())
}

/// # Errors
///
/// Returns an error if the mission fails.
pub(crate) async fn run_match(
    app: &mut App,
    pipeline: &Pipeline,
    mission: &MatchArgs,
    run: &RunArgs,
) -> anyhow::Result<()> {
    let instruction = read_prompt_file(run.prompt_file.as_deref())?;
    app.run_mission(pipeline, mission.to_config(), instruction)
        .await?;
    if let Some(config) = app.match_config() {
        println!(
            "{} ({}): {}",
            config.brand_name, config.industry, config.campaign_goal
        );
    }
    render::print_matches(app.matches());
    render::print_sources(app.metadata());
    Ok(())
}

pub(crate) async fn run_ideas(
    pipeline: &Pipeline,
    kind: IdeaKindArg,
    seed: &str,
) -> anyhow::Result<()> {
    let ideas = pipeline.suggest_ideas(kind.into(), seed).await?;
    if ideas.is_empty() {
        println!("no ideas this time");
    }
    for idea in ideas {
        println!("- {idea}");
    }
    Ok(())
}

/// Suggest a case for `keyword`. With `save`, the pre-selected fields are
/// written into a new manual case in the target notebook.
///
/// # Errors
///
/// Returns an error if the suggestion fails or the case cannot be saved.
pub(crate) async fn run_autocomplete(
    app: &mut App,
    pipeline: &Pipeline,
    keyword: &str,
    save: bool,
) -> anyhow::Result<()> {
    let mut case = Case::default();
    let result = pipeline.autocomplete_case(keyword, &case).await?;
    let selection = result.default_selection(&case);
    let low = result.low_confidence_fields(&case);

    render::print_suggestions(&result, &selection, &low);

    if !save {
        return Ok(());
    }
    if selection.is_empty() {
        println!("no field was confident enough to save");
        return Ok(());
    }
    result.suggested_patch.apply(&mut case, &selection);
    let store = app.store_mut();
    let target = store.resolve_case_target().await?;
    store.add_manual_case(&target, case).await?;
    println!("saved suggested case to notebook {target}");
    Ok(())
}
