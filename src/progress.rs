use crate::types::OutcomeLabel;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::fmt;

/// Games between two progress refreshes.
pub const PROGRESS_INTERVAL: u64 = 256;

/// Per-outcome game counts.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Tally {
    pub wins: u64,
    pub draws: u64,
    pub losses: u64,
}

impl Tally {
    pub fn record(&mut self, label: OutcomeLabel) {
        match label {
            OutcomeLabel::WhiteWin => self.wins += 1,
            OutcomeLabel::Draw => self.draws += 1,
            OutcomeLabel::BlackWin => self.losses += 1,
        }
    }

    pub fn games(&self) -> u64 {
        self.wins + self.draws + self.losses
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Wins:   {}", self.wins)?;
        writeln!(f, "Draws:  {}", self.draws)?;
        writeln!(f, "Losses: {}", self.losses)
    }
}

/// Spinner on stdout counting processed games. Nothing is drawn when stdout
/// is not a terminal.
pub struct Progress {
    bar: ProgressBar,
}

impl Progress {
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stdout());
        bar.set_style(
            ProgressStyle::with_template("{spinner} {pos} games [{elapsed_precise}, {per_sec}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        Self { bar }
    }

    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Called after each finished game; redraws every `PROGRESS_INTERVAL` games.
    pub fn game_done(&self, games: u64) {
        if games.is_multiple_of(PROGRESS_INTERVAL) {
            self.bar.set_position(games);
        }
    }

    #[cfg(test)]
    fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}
