mod config;
mod download;
mod error;
mod fetch;
mod model;
mod output;
mod parser;
mod pipeline;
mod progress;
#[cfg(test)]
mod test_support;

use std::time::Instant;

use clap::Parser;

use config::{Cli, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let file = config::load_file_config(&cli.config)?;
    let mut settings = Settings::resolve(cli, file);

    if settings.materia.is_none() {
        settings.materia = config::prompt_materia_stdin()?;
    }
    let Some(materia) = settings.materia.clone() else {
        eprintln!("Nenhuma matéria fornecida.");
        return Ok(());
    };

    let result = pipeline::run(&settings, &materia).await;

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
