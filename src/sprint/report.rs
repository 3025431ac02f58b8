//! Standalone HTML report built from a finished history
//!
//! Read-only consumer of [`SprintHistory`]; nothing here feeds back into the
//! simulation.

use std::fmt::Write as _;
use std::path::Path;

use html_escape::encode_text;

use crate::core::error::Result;
use crate::sprint::history::{SprintHistory, TickSnapshot};

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 2em; color: #222; }
h1 { margin-bottom: 0.2em; }
.table-container { overflow-x: auto; margin-bottom: 2em; }
table { border-collapse: collapse; font-size: 0.9em; }
th, td { border: 1px solid #ccc; padding: 4px 8px; white-space: nowrap; }
th { background: #f0f0f0; position: sticky; top: 0; }
td.done { background: #e3f6e3; }
td.working { background: #e8f0fe; }
td.idle { color: #999; }
"#;

pub struct HtmlReport<'a> {
    history: &'a SprintHistory,
    title: String,
}

impl<'a> HtmlReport<'a> {
    pub fn new(history: &'a SprintHistory) -> Self {
        Self {
            history,
            title: "Sprint Report".to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn render(&self) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<h1>{title}</h1>\n<p>{ticks} ticks recorded</p>\n",
            title = encode_text(&self.title),
            ticks = self.history.len(),
        );

        if self.history.is_empty() {
            html.push_str("<p>No data</p>\n");
        } else {
            html.push_str(&self.feature_table());
            html.push_str(&self.worker_table());
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render())?;
        tracing::info!("Report saved to {}", path.display());
        Ok(())
    }

    /// Feature x Time table; a feature's column is blank once it has left
    /// the active set
    fn feature_table(&self) -> String {
        let names = self.history.feature_names();
        let rows = self.history.snapshots().iter().map(|snap| {
            let cells: Vec<String> = names
                .iter()
                .map(|name| match snap.features.iter().find(|f| f.name == *name) {
                    Some(f) if f.is_done => "<td class=\"done\">Done</td>".to_string(),
                    Some(f) => format!(
                        "<td>{} ({:.1} left)</td>",
                        f.current_stage,
                        f.total_remaining()
                    ),
                    None => "<td class=\"done\"></td>".to_string(),
                })
                .collect();
            row(snap, &cells)
        });

        table("Feature Progress", &names, rows)
    }

    fn worker_table(&self) -> String {
        let names: Vec<&str> = self
            .history
            .first()
            .map(|snap| snap.workers.iter().map(|w| w.name.as_str()).collect())
            .unwrap_or_default();

        let rows = self.history.snapshots().iter().map(|snap| {
            let cells: Vec<String> = snap
                .workers
                .iter()
                .map(|w| match (&w.current_task, w.has_worked) {
                    (Some(task), true) => {
                        format!("<td class=\"working\">{}</td>", encode_text(task))
                    }
                    _ => "<td class=\"idle\">Idle</td>".to_string(),
                })
                .collect();
            row(snap, &cells)
        });

        table("Worker Activity", &names, rows)
    }
}

fn row(snap: &TickSnapshot, cells: &[String]) -> String {
    format!("<tr><td>{}</td>{}</tr>", snap.tick.label(), cells.concat())
}

fn table(title: &str, columns: &[&str], rows: impl Iterator<Item = String>) -> String {
    let header: String = columns
        .iter()
        .map(|c| format!("<th>{}</th>", encode_text(c)))
        .collect();
    let body: Vec<String> = rows.collect();

    format!(
        "<h3>{}</h3>\n<div class=\"table-container\">\n<table>\n<thead><tr><th>Time</th>{}</tr></thead>\n<tbody>\n{}\n</tbody>\n</table>\n</div>\n",
        title,
        header,
        body.join("\n")
    )
}
