use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://www25.senado.leg.br/web/atividade/materias/-/materia";
pub const DEFAULT_OUTPUT_DIR: &str = "resultados";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Parser, Debug, Default)]
#[command(
    name = "emendas_scraper",
    version,
    about = "Senado Federal - scrape emendas de projetos de lei"
)]
pub struct Cli {
    /// Número da matéria: the numeric part at the end of the bill URL,
    /// e.g. 157233 for .../materia/157233
    #[arg(short, long)]
    pub materia: Option<String>,
    /// Bill page URL prefix; the matéria number is appended
    #[arg(long)]
    pub base_url: Option<String>,
    /// Root directory for results
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Connect and idle-read timeout in seconds, 0 to wait forever
    #[arg(short, long)]
    pub timeout: Option<u64>,
    /// JSON config file consulted for anything not given on the command line
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,
    /// Hide progress bars
    #[arg(short, long)]
    pub quiet: bool,
}

/// Contents of `config.json`. Every key is optional.
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    pub materia: Option<String>,
    pub base_url: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

/// Effective settings for one run.
#[derive(Debug, PartialEq)]
pub struct Settings {
    /// `None` until resolved from the prompt.
    pub materia: Option<String>,
    pub base_url: String,
    pub output_dir: PathBuf,
    pub timeout: Option<Duration>,
    pub quiet: bool,
}

impl Settings {
    /// Merge command-line values over file values over defaults.
    pub fn resolve(cli: Cli, file: FileConfig) -> Self {
        let timeout_secs = cli
            .timeout
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            materia: non_blank(cli.materia).or_else(|| non_blank(file.materia)),
            base_url: cli
                .base_url
                .or(file.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            output_dir: cli
                .output_dir
                .or(file.output_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            quiet: cli.quiet,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read the config file. A missing file is an empty config.
pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file");
        return Ok(FileConfig::default());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid config file {}", path.display()))
}

/// Ask for the matéria number until a non-empty answer is given.
/// Returns `None` when input ends first.
pub fn prompt_materia<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Option<String>> {
    loop {
        write!(output, "Número da matéria: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if let Some(materia) = non_blank(Some(line)) {
            return Ok(Some(materia));
        }
    }
}

/// Prompt on the terminal.
pub fn prompt_materia_stdin() -> Result<Option<String>> {
    let stdin = io::stdin();
    prompt_materia(&mut stdin.lock(), &mut io::stdout())
}
