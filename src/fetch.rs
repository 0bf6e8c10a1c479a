use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::{Client, ClientBuilder};
use tracing::info;

/// Builder with `timeout` applied to connecting and to each read. A body
/// that keeps arriving is never cut off, however long the transfer takes.
pub fn client_builder(timeout: Option<Duration>) -> ClientBuilder {
    let builder = Client::builder();
    match timeout {
        Some(t) => builder.connect_timeout(t).read_timeout(t),
        None => builder,
    }
}

pub fn build_client(timeout: Option<Duration>) -> Result<Client> {
    client_builder(timeout)
        .build()
        .context("Failed to build HTTP client")
}

pub fn page_url(base_url: &str, materia: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), materia)
}

/// Fetch the bill page HTML.
pub async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    info!(url, "fetching bill page");
    let resp = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch {url}"))?;
    let status = resp.status();
    if !status.is_success() {
        bail!("HTTP error! status: {} for {}", status.as_u16(), url);
    }
    let html = resp.text().await.context("Failed to read bill page body")?;
    info!(bytes = html.len(), "bill page fetched");
    Ok(html)
}
