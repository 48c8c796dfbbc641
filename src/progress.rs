//! Render progress reporting.

use indicatif::{ProgressBar, ProgressStyle};

/// Live progress display for loops with a known iteration count.
///
/// Thread-safe: the underlying bar increments atomically, so worker threads
/// can report completed iterations through a shared reference.
pub struct RenderProgress {
    bar: ProgressBar,
}

impl RenderProgress {
    /// Creates a progress display for `total_steps` iterations of the task
    /// described by `description`.
    pub fn new(total_steps: u64, description: &str) -> Self {
        let bar = ProgressBar::new(total_steps);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg}\n{bar:40} {pos}/{len} ETA: {eta}")
                .unwrap(),
        );
        bar.set_message(description.to_string());
        Self { bar }
    }

    /// Records one completed iteration.
    pub fn complete_iteration(&self) {
        self.bar.inc(1);
    }

    /// Finishes the display once all iterations are done.
    pub fn finish(&self) {
        self.bar.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_iterations() {
        let progress = RenderProgress::new(10, "testing");
        for _ in 0..10 {
            progress.complete_iteration();
        }
        progress.finish();
        assert_eq!(progress.bar.position(), 10);
    }
}
