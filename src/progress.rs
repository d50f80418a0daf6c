use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

pub struct ProgressTracker {
    bar: ProgressBar,
}

impl ProgressTracker {
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        // Template is a literal; fall back to the default style if it ever fails to parse
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);

        bar.set_message("Analyzing reports...");

        Self { bar }
    }

    pub fn start(&self, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.bar.set_message(format!("Analyzing {}", name));
    }

    pub fn increment(&self) {
        self.bar.inc(1);
        self.bar.set_message(format!("Analyzed {} reports", self.bar.position()));
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("✅ All reports analyzed!");
    }
}
