use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::model::AmendmentRecord;

const CSV_HEADERS: [&str; 7] = [
    "id",
    "author",
    "date",
    "description",
    "legislativeAction",
    "pdfLink",
    "pdfFilename",
];

/// Write all records as a pretty-printed JSON array, replacing `path`.
pub fn write_json(records: &[AmendmentRecord], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(count = records.len(), path = %path.display(), "saved JSON");
    Ok(())
}

/// Write all records as CSV. Returns `false` without touching the
/// filesystem when there is nothing to save.
pub fn write_csv(records: &[AmendmentRecord], path: &Path) -> Result<bool> {
    if records.is_empty() {
        warn!(path = %path.display(), "no amendments to save");
        return Ok(false);
    }

    fs::write(path, to_csv(records))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(count = records.len(), path = %path.display(), "saved CSV");
    Ok(true)
}

fn to_csv(records: &[AmendmentRecord]) -> String {
    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(CSV_HEADERS.join(","));

    for r in records {
        let fields = [
            r.id.as_str(),
            r.author.as_str(),
            r.date.as_str(),
            r.description.as_str(),
            r.legislative_action.as_str(),
            r.pdf_link.as_deref().unwrap_or(""),
            r.pdf_filename.as_deref().unwrap_or(""),
        ];
        let row: Vec<String> = fields.iter().map(|f| escape_csv(f)).collect();
        rows.push(row.join(","));
    }

    rows.join("\n")
}

fn escape_csv(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
