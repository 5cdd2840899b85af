//! Deterministic renderings of a collection.

mod html;
mod markdown;
mod mindmap;
mod text;

pub use html::to_html;
pub use markdown::{parse_markdown_cases, to_markdown};
pub use mindmap::to_mindmap;
pub use text::case_to_plain_text;

/// Output format for a whole collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Html,
    Mindmap,
}

impl ExportFormat {
    #[must_use]
    pub fn file_extension(self) -> &'static str {
        match self {
            ExportFormat::Markdown | ExportFormat::Mindmap => "md",
            ExportFormat::Html => "html",
        }
    }
}

#[must_use]
pub fn export(collection: &cbhunt_core::Collection, format: ExportFormat) -> String {
    match format {
        ExportFormat::Markdown => to_markdown(collection),
        ExportFormat::Html => to_html(collection),
        ExportFormat::Mindmap => to_mindmap(collection),
    }
}

/// Collapses line breaks so a value fits on one outline or text line.
fn single_line(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
