use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{error, info};

use crate::config::Settings;
use crate::download::{self, DownloadStats};
use crate::fetch;
use crate::model::AmendmentRecord;
use crate::output;
use crate::parser;
use crate::progress::{self, ConsoleProgress, NoProgress, ProgressSink};

/// Output locations for one matéria.
pub struct Dataset {
    pub dir: PathBuf,
}

impl Dataset {
    pub fn new(output_root: &Path, materia: &str) -> Self {
        Self {
            dir: output_root.join(materia),
        }
    }

    pub fn pdf_dir(&self) -> PathBuf {
        self.dir.join("pdfs")
    }

    pub fn json_path(&self) -> PathBuf {
        self.dir.join("emendas.json")
    }

    pub fn csv_path(&self) -> PathBuf {
        self.dir.join("emendas.csv")
    }
}

/// Fetch the bill page and extract its amendments.
pub async fn collect(client: &Client, page_url: &str) -> Result<Vec<AmendmentRecord>> {
    let html = fetch::fetch_page(client, page_url).await?;
    let records = parser::parse_page(&html);
    info!(count = records.len(), "amendments extracted");
    Ok(records)
}

/// Download PDFs and write JSON + CSV. Filesystem errors are fatal.
pub async fn save(
    client: &Client,
    records: &mut [AmendmentRecord],
    page_url: &str,
    dataset: &Dataset,
    sink: &mut dyn ProgressSink,
) -> Result<DownloadStats> {
    let pdf_dir = dataset.pdf_dir();
    std::fs::create_dir_all(&pdf_dir)
        .with_context(|| format!("Failed to create {}", pdf_dir.display()))?;

    let stats = download::download_all(client, records, page_url, &pdf_dir, sink).await;

    output::write_json(records, &dataset.json_path())?;
    output::write_csv(records, &dataset.csv_path())?;
    Ok(stats)
}

/// One full run for `materia`. Page-level failures are reported and end the
/// run without writing anything.
pub async fn run(settings: &Settings, materia: &str) -> Result<()> {
    let client = fetch::build_client(settings.timeout)?;
    run_with(&client, settings, materia).await
}

async fn run_with(client: &Client, settings: &Settings, materia: &str) -> Result<()> {
    let page_url = fetch::page_url(&settings.base_url, materia);

    println!("Matéria: {}", materia);
    println!("   url: {}\n", page_url);

    let spinner = if settings.quiet {
        indicatif::ProgressBar::hidden()
    } else {
        progress::spinner("Scraping emendas")
    };
    let mut records = match collect(client, &page_url).await {
        Ok(records) => {
            spinner.finish_and_clear();
            records
        }
        Err(e) => {
            spinner.finish_and_clear();
            error!("Error scraping emendas: {:?}", e);
            return Ok(());
        }
    };
    println!("Número de emendas encontradas: {}", records.len());

    let dataset = Dataset::new(&settings.output_dir, materia);
    let stats = if settings.quiet {
        save(client, &mut records, &page_url, &dataset, &mut NoProgress).await?
    } else {
        let with_pdf = records.iter().filter(|r| r.pdf_link.is_some()).count();
        let mut console = ConsoleProgress::new(with_pdf as u64);
        let stats = save(client, &mut records, &page_url, &dataset, &mut console).await?;
        console.finish();
        stats
    };

    println!(
        "PDFs: {} downloaded, {} failed ({} linked)",
        stats.ok, stats.failed, stats.attempted
    );
    println!("Saved {} emendas to {}", records.len(), dataset.dir.display());
    print_preview(&records);
    Ok(())
}

fn print_preview(records: &[AmendmentRecord]) {
    if records.is_empty() {
        return;
    }
    println!("\nFirst 3 emendas:");
    for (i, r) in records.iter().take(3).enumerate() {
        println!("\n{}. {}", i + 1, r.id);
        println!("   Autor: {}", r.author);
        println!("   Data: {}", r.date);
        println!("   Descrição: {}", head_chars(&r.description, 100));
        println!("   PDF: {}", r.pdf_filename.as_deref().unwrap_or("N/A"));
    }
}

fn head_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
