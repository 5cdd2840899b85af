//! Collection command handlers: browse, edit, export and summarize
//! notebooks and reports.

use std::path::Path;

use clap::Subcommand;

use cbhunt_core::{Collection, CollectionKind};
use cbhunt_store::export::{case_to_plain_text, to_markdown};
use cbhunt_store::{collection_stats, export, ExportFormat, StoreError};
use cbhunt_workflow::WorkflowError;

use crate::missions::to_indices;
use crate::render;
use crate::{App, Pipeline};

/// Sub-commands available under `collections`.
#[derive(Debug, Subcommand)]
pub enum CollectionsCommands {
    /// List notebooks and reports; `*` marks the active one
    List,
    /// Print every item of a collection and make it active
    Show {
        /// Collection id or list number
        collection: String,
    },
    Rename {
        collection: String,
        name: String,
    },
    Delete {
        collection: String,
    },
    /// Create an empty notebook (or report) and make it active
    New {
        name: Option<String>,
        #[arg(long)]
        report: bool,
    },
    /// Remove the case or trend with this 1-based number
    Remove {
        collection: String,
        item: usize,
    },
    /// Move a case to another 1-based position
    Move {
        collection: String,
        from: usize,
        to: usize,
    },
}

/// Find a collection by exact id, else by its 1-based position in
/// `collections list`.
pub(crate) fn find<'a>(app: &'a App, selector: &str) -> anyhow::Result<&'a Collection> {
    let collections = app.store().collections();
    if let Some(found) = collections.iter().find(|c| c.id == selector) {
        return Ok(found);
    }
    selector
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| collections.get(i))
        .ok_or_else(|| {
            anyhow::anyhow!("collection '{selector}' not found; see `cbhunt collections list`")
        })
}

/// # Errors
///
/// Returns an error for an unknown collection or a failed write. Deleting
/// the last collection is reported and otherwise ignored.
pub(crate) async fn run_collections(
    app: &mut App,
    command: CollectionsCommands,
) -> anyhow::Result<()> {
    match command {
        CollectionsCommands::List => {
            print_list(app);
            Ok(())
        }
        CollectionsCommands::Show { collection } => {
            let id = find(app, &collection)?.id.clone();
            app.open_collection(&id).await?;
            if let Some(shown) = app.current_collection() {
                print_collection(shown);
            }
            Ok(())
        }
        CollectionsCommands::Rename { collection, name } => {
            let id = find(app, &collection)?.id.clone();
            app.rename_collection(&id, &name).await?;
            println!("renamed {id} to '{}'", name.trim());
            Ok(())
        }
        CollectionsCommands::Delete { collection } => {
            let id = find(app, &collection)?.id.clone();
            match app.delete_collection(&id).await {
                Ok(()) => println!("deleted {id}"),
                Err(WorkflowError::Store(StoreError::LastCollection)) => {
                    println!("the last collection cannot be deleted; nothing changed");
                }
                Err(err) => return Err(err.into()),
            }
            Ok(())
        }
        CollectionsCommands::New { name, report } => {
            let kind = if report {
                CollectionKind::Report
            } else {
                CollectionKind::Notebook
            };
            let id = app.create_collection(kind, name.as_deref()).await?;
            println!("created {kind} {id}");
            Ok(())
        }
        CollectionsCommands::Remove { collection, item } => {
            let target = find(app, &collection)?;
            let id = target.id.clone();
            let kind = target.kind;
            let len = match kind {
                CollectionKind::Notebook => target.cases.len(),
                CollectionKind::Report => target.trends.len(),
            };
            let index = to_indices(&[item], len)?[0];
            let store = app.store_mut();
            let removed = match kind {
                CollectionKind::Notebook => store.delete_case(&id, index).await?.project_name,
                CollectionKind::Report => store.delete_trend(&id, index).await?.ip_name,
            };
            println!("removed '{removed}'");
            Ok(())
        }
        CollectionsCommands::Move { collection, from, to } => {
            let target = find(app, &collection)?;
            let id = target.id.clone();
            let mut cases = target.cases.clone();
            let from = to_indices(&[from], cases.len())?[0];
            let to = to_indices(&[to], cases.len())?[0];
            let moved = cases.remove(from);
            cases.insert(to, moved);
            app.store_mut().reorder_cases(&id, cases).await?;
            println!("moved case {} to position {}", from + 1, to + 1);
            Ok(())
        }
    }
}

fn print_list(app: &App) {
    let active = app.store().active_id();
    println!(
        "{:<4}{:<10}{:<7}{:<18}{:<38}NAME",
        "#", "KIND", "ITEMS", "UPDATED", "ID"
    );
    for (i, c) in app.store().collections().iter().enumerate() {
        let marker = if active == Some(c.id.as_str()) { "*" } else { " " };
        let items = match c.kind {
            CollectionKind::Notebook => c.cases.len(),
            CollectionKind::Report => c.trends.len(),
        };
        println!(
            "{:<4}{:<10}{:<7}{:<18}{:<38}{}",
            format!("{}{marker}", i + 1),
            c.kind.to_string(),
            items,
            render::format_timestamp(c.updated_at),
            c.id,
            c.name
        );
    }
}

fn print_collection(collection: &Collection) {
    println!("{} ({})", collection.name, collection.kind);
    println!();
    match collection.kind {
        CollectionKind::Notebook => {
            if collection.cases.is_empty() {
                println!("no cases yet");
            }
            for (i, case) in collection.cases.iter().enumerate() {
                println!("{}.", i + 1);
                print!("{}", case_to_plain_text(case));
                println!();
            }
        }
        CollectionKind::Report => render::print_trends(&collection.trends),
    }
}

/// # Errors
///
/// Returns an error for an unknown collection or an unwritable file.
pub(crate) fn run_export(
    app: &App,
    selector: &str,
    format: ExportFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let collection = find(app, selector)?;
    let content = export(collection, format);
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))?;
            println!("wrote {}", path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}

pub(crate) fn run_stats(app: &App, selector: &str) -> anyhow::Result<()> {
    let collection = find(app, selector)?;
    render::print_stats(&collection.name, &collection_stats(collection));
    Ok(())
}

/// Draft a social post from the collection's Markdown export.
///
/// # Errors
///
/// Returns an error for an unknown collection or a failed generation.
pub(crate) async fn run_post(app: &App, pipeline: &Pipeline, selector: &str) -> anyhow::Result<()> {
    let collection = find(app, selector)?;
    if collection.is_empty() {
        anyhow::bail!("'{}' has nothing to write about", collection.name);
    }
    let post = pipeline.draft_social_post(&to_markdown(collection)).await?;
    println!("{}", post.title);
    println!();
    println!("{}", post.content);
    Ok(())
}
