use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while a search is in flight.
pub struct Spinner {
    progress_bar: ProgressBar,
}

impl Spinner {
    pub fn start(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .template("{spinner:.yellow} [{elapsed_precise}] {msg}")
        {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { progress_bar: pb }
    }

    pub fn finish(self) {
        self.progress_bar.finish_and_clear();
    }
}
