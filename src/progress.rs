//! Terminal progress bars for the three stages of every archive.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use rechapter_library::{Progress, Stage};
use std::io::IsTerminal;

const TEMPLATE: &str = "{msg:>15} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}";

/// One `indicatif` bar per stage, drawn on stderr.
pub struct BarProgress {
    visible: bool,
    current: Option<(Stage, ProgressBar)>,
}
impl BarProgress {
    /// Bars are only drawn when stderr is a terminal.
    pub fn stderr() -> Self {
        Self::new(std::io::stderr().is_terminal())
    }

    pub fn new(visible: bool) -> Self {
        Self { visible, current: None }
    }

    fn start(&self, stage: Stage, total: usize) -> ProgressBar {
        let target = match self.visible {
            true => ProgressDrawTarget::stderr(),
            false => ProgressDrawTarget::hidden(),
        };
        let bar = ProgressBar::with_draw_target(Some(total as u64), target);
        if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar.set_message(stage.to_string());
        bar
    }
}
impl Progress for BarProgress {
    fn update(&mut self, stage: Stage, done: usize, total: usize) {
        let same_stage = matches!(&self.current, Some((current, _)) if *current == stage);
        if !same_stage {
            self.finish();
            self.current = Some((stage, self.start(stage, total)));
        }
        if let Some((_, bar)) = &self.current {
            bar.set_length(total as u64);
            bar.set_position(done as u64);
        }
    }

    fn finish(&mut self) {
        if let Some((_, bar)) = self.current.take() {
            bar.finish();
        }
    }
}
