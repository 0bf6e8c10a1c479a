use std::path::{Path, PathBuf};

use reqwest::{Client, Url};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::DownloadError;
use crate::model::{pdf_filename, AmendmentRecord};
use crate::progress::{Progress, ProgressSink};

/// Outcome of a download pass over all records.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DownloadStats {
    pub attempted: usize,
    pub ok: usize,
    pub failed: usize,
}

/// Resolve a PDF link as found in the page against the page URL.
pub fn resolve_link(page_url: &str, link: &str) -> Result<Url, DownloadError> {
    Url::parse(page_url)
        .and_then(|base| base.join(link))
        .map_err(|e| DownloadError::InvalidUrl {
            url: link.to_string(),
            reason: e.to_string(),
        })
}

/// Stream `url` into `dest_dir/filename`, reporting progress to `sink`.
pub async fn download(
    client: &Client,
    url: Url,
    dest_dir: &Path,
    filename: &str,
    sink: &mut dyn ProgressSink,
) -> Result<PathBuf, DownloadError> {
    let result = transfer(client, url, dest_dir, filename, sink).await;
    sink.end(result.is_ok());
    result
}

async fn transfer(
    client: &Client,
    url: Url,
    dest_dir: &Path,
    filename: &str,
    sink: &mut dyn ProgressSink,
) -> Result<PathBuf, DownloadError> {
    debug!(url = %url, "requesting PDF");
    let mut resp = client.get(url.clone()).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(DownloadError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let total = resp.content_length();
    let path = dest_dir.join(filename);
    let part = dest_dir.join(format!("{filename}.part"));

    fs::create_dir_all(dest_dir)
        .await
        .map_err(|source| DownloadError::Io {
            path: dest_dir.to_path_buf(),
            source,
        })?;

    sink.begin(filename, total);
    let progress = match stream_to(&mut resp, &part, total, sink).await {
        Ok(progress) => progress,
        Err(e) => {
            if let Err(rm) = fs::remove_file(&part).await {
                debug!(path = %part.display(), error = %rm, "could not remove partial file");
            }
            return Err(e);
        }
    };
    fs::rename(&part, &path)
        .await
        .map_err(|source| DownloadError::Io {
            path: path.clone(),
            source,
        })?;

    debug!(
        path = %path.display(),
        bytes = progress.downloaded,
        total = ?progress.total,
        percentage = ?progress.percentage,
        "PDF written"
    );
    Ok(path)
}

/// Write the body to `part` as it arrives. The final name is only taken
/// once every byte is flushed.
async fn stream_to(
    resp: &mut reqwest::Response,
    part: &Path,
    total: Option<u64>,
    sink: &mut dyn ProgressSink,
) -> Result<Progress, DownloadError> {
    let io_err = |source| DownloadError::Io {
        path: part.to_path_buf(),
        source,
    };

    let mut file = File::create(part).await.map_err(io_err)?;
    let mut progress = Progress::new(0, total);
    while let Some(chunk) = resp.chunk().await? {
        file.write_all(&chunk).await.map_err(io_err)?;
        progress = Progress::new(progress.downloaded + chunk.len() as u64, total);
        sink.update(&progress);
    }
    file.flush().await.map_err(io_err)?;
    Ok(progress)
}

/// Download every record's PDF one after another. A failure is logged and
/// leaves that record's `pdf_filename` unset.
pub async fn download_all(
    client: &Client,
    records: &mut [AmendmentRecord],
    page_url: &str,
    dest_dir: &Path,
    sink: &mut dyn ProgressSink,
) -> DownloadStats {
    let mut stats = DownloadStats::default();

    for record in records.iter_mut() {
        let Some(link) = record.pdf_link.as_deref() else {
            continue;
        };
        stats.attempted += 1;

        let url = match resolve_link(page_url, link) {
            Ok(url) => url,
            Err(e) => {
                warn!(id = %record.id, error = %e, "skipping PDF");
                sink.end(false);
                stats.failed += 1;
                continue;
            }
        };

        let filename = pdf_filename(&record.id);
        match download(client, url, dest_dir, &filename, sink).await {
            Ok(_) => {
                record.pdf_filename = Some(filename);
                stats.ok += 1;
            }
            Err(e) => {
                warn!(id = %record.id, error = %e, "failed to download PDF");
                stats.failed += 1;
            }
        }
    }

    info!(
        attempted = stats.attempted,
        ok = stats.ok,
        failed = stats.failed,
        "PDF downloads finished"
    );
    stats
}
