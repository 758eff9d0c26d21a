use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown on stderr while a long external tool runs.
pub(crate) struct ProgressBarBuilder {
    style_template: &'static str,
    message: String,
    tick: Option<Duration>,
}

impl ProgressBarBuilder {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            style_template: "{spinner:.green} [{elapsed_precise}] {msg}",
            message: message.into(),
            tick: None,
        }
    }

    pub(crate) fn with_tick(mut self, interval: Duration) -> Self {
        self.tick = Some(interval);
        self
    }

    pub(crate) fn build(self) -> Result<ProgressBar> {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template(self.style_template)?);
        pb.set_message(self.message);

        if let Some(interval) = self.tick {
            pb.enable_steady_tick(interval);
        }

        Ok(pb)
    }
}

/// Runs `task` under a ticking spinner, clearing it whether or not the task succeeds.
pub(crate) fn with_spinner<T, E>(
    message: impl Into<String>,
    task: impl FnOnce() -> Result<T, E>,
) -> Result<T>
where
    E: Into<anyhow::Error>,
{
    let progress = ProgressBarBuilder::new(message)
        .with_tick(Duration::from_millis(200))
        .build()?;
    let result = task();
    progress.finish_and_clear();
    result.map_err(Into::into)
}
