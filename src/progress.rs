use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Snapshot emitted after each chunk is written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub downloaded: u64,
    pub total: Option<u64>,
    /// Only known when `total` is known and non-zero.
    pub percentage: Option<f64>,
}

impl Progress {
    pub fn new(downloaded: u64, total: Option<u64>) -> Self {
        let percentage = total
            .filter(|&t| t > 0)
            .map(|t| downloaded as f64 / t as f64 * 100.0);
        Self {
            downloaded,
            total,
            percentage,
        }
    }
}

/// Receives transfer events from the downloader.
pub trait ProgressSink {
    fn begin(&mut self, filename: &str, total: Option<u64>);
    fn update(&mut self, progress: &Progress);
    fn end(&mut self, ok: bool);
}

/// Sink that discards everything.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn begin(&mut self, _filename: &str, _total: Option<u64>) {}
    fn update(&mut self, _progress: &Progress) {}
    fn end(&mut self, _ok: bool) {}
}

/// Terminal rendering: one overall bar over all files plus a bar for the
/// file in flight.
pub struct ConsoleProgress {
    multi: MultiProgress,
    overall: ProgressBar,
    current: Option<ProgressBar>,
}

impl ConsoleProgress {
    pub fn new(files: u64) -> Self {
        let multi = MultiProgress::new();
        let overall = multi.add(ProgressBar::new(files));
        overall.set_style(
            ProgressStyle::default_bar()
                .template("PDFs [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Self {
            multi,
            overall,
            current: None,
        }
    }

    pub fn finish(&self) {
        self.overall.finish_and_clear();
    }
}

impl ProgressSink for ConsoleProgress {
    fn begin(&mut self, filename: &str, total: Option<u64>) {
        let bar = match total {
            Some(len) => {
                let bar = ProgressBar::new(len);
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template("  {bar:30} {percent:>3}% {bytes}/{total_bytes} eta {eta} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_bar())
                        .progress_chars("=> "),
                );
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(
                    ProgressStyle::default_spinner()
                        .template("  {spinner} {bytes} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                bar
            }
        };
        bar.set_message(filename.to_string());
        self.current = Some(self.multi.add(bar));
    }

    fn update(&mut self, progress: &Progress) {
        if let Some(bar) = &self.current {
            bar.set_position(progress.downloaded);
        }
    }

    fn end(&mut self, _ok: bool) {
        if let Some(bar) = self.current.take() {
            bar.finish_and_clear();
            self.multi.remove(&bar);
        }
        self.overall.inc(1);
    }
}

/// Spinner shown while a single request is in flight.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_with_known_total() {
        let p = Progress::new(50, Some(200));
        assert_eq!(p.percentage, Some(25.0));
    }

    #[test]
    fn zero_total_has_no_percentage() {
        let p = Progress::new(0, Some(0));
        assert_eq!(p.percentage, None);
    }

    #[test]
    fn unknown_total_has_no_percentage() {
        let p = Progress::new(1024, None);
        assert_eq!(p.total, None);
        assert_eq!(p.percentage, None);
    }
}
