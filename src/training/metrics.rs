use std::fmt;
use std::time::{Duration, Instant};

use crate::game::Color;

/// Results of a series of games, counted for one side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchResult {
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
}

impl MatchResult {
    /// Count one finished game for the agent that played `color`.
    pub fn record(&mut self, winner: Option<Color>, color: Color) {
        match winner {
            Some(w) if w == color => self.wins += 1,
            Some(_) => self.losses += 1,
            None => self.draws += 1,
        }
    }

    pub fn games(&self) -> usize {
        self.wins + self.losses + self.draws
    }

    /// Fraction of games won; draws count as non-wins.
    pub fn win_rate(&self) -> f64 {
        let games = self.games();
        if games == 0 {
            return 0.0;
        }
        self.wins as f64 / games as f64
    }
}

/// Outcome of one training epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochReport {
    pub epoch: usize,
    /// First network vs second network, learning on.
    pub adversarial: MatchResult,
    /// First network vs the validation opponent, learning off.
    pub testing: MatchResult,
    pub duration: Duration,
}

impl EpochReport {
    pub fn adversarial_rate(&self) -> f64 {
        self.adversarial.win_rate()
    }

    pub fn testing_rate(&self) -> f64 {
        self.testing.win_rate()
    }
}

/// Report-stream line: `<adversarialRate> <testingRate>`.
impl fmt::Display for EpochReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.adversarial_rate(), self.testing_rate())
    }
}

/// Win rates of both networks against a minimax opponent of one depth.
#[derive(Debug, Clone, PartialEq)]
pub struct PlyReport {
    pub ply: usize,
    pub rates: [f64; 2],
}

/// Report-stream line: `<ply> <rate0> <rate1>`.
impl fmt::Display for PlyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.ply, self.rates[0], self.rates[1])
    }
}

/// Running average of epoch wall-clock time, used to estimate how long the
/// rest of a session will take.
pub struct EpochTimer {
    epoch_start: Instant,
    epochs: u32,
    average: Duration,
}

impl EpochTimer {
    pub fn new() -> Self {
        EpochTimer {
            epoch_start: Instant::now(),
            epochs: 0,
            average: Duration::ZERO,
        }
    }

    /// Close the current epoch and start timing the next one. Returns the
    /// duration of the epoch that just ended.
    pub fn finish_epoch(&mut self) -> Duration {
        let elapsed = self.epoch_start.elapsed();
        self.epoch_start = Instant::now();
        self.record(elapsed);
        elapsed
    }

    pub fn record(&mut self, duration: Duration) {
        self.average = (self.average * self.epochs + duration) / (self.epochs + 1);
        self.epochs += 1;
    }

    pub fn average(&self) -> Duration {
        self.average
    }

    pub fn estimate_remaining(&self, epochs_left: usize) -> Duration {
        self.average * epochs_left as u32
    }
}

impl Default for EpochTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Report-stream line for a remaining-time estimate, truncated to minutes.
pub fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!(
        "% Estimated remaining time: {} hours, {:02} minutes",
        secs / 3600,
        (secs % 3600) / 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_result_record() {
        let mut m = MatchResult::default();
        m.record(Some(Color::Black), Color::Black);
        m.record(Some(Color::Black), Color::White);
        m.record(None, Color::White);
        m.record(Some(Color::White), Color::White);
        assert_eq!(
            m,
            MatchResult {
                wins: 2,
                losses: 1,
                draws: 1
            }
        );
        assert_eq!(m.games(), 4);
        assert!((m.win_rate() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_win_rate_without_games() {
        assert_eq!(MatchResult::default().win_rate(), 0.0);
    }

    #[test]
    fn test_epoch_report_line() {
        let report = EpochReport {
            epoch: 0,
            adversarial: MatchResult {
                wins: 3,
                losses: 1,
                draws: 0,
            },
            testing: MatchResult {
                wins: 1,
                losses: 4,
                draws: 0,
            },
            duration: Duration::from_secs(1),
        };
        assert_eq!(report.to_string(), "0.75 0.2");
    }

    #[test]
    fn test_ply_report_line() {
        let row = PlyReport {
            ply: 3,
            rates: [0.5, 0.25],
        };
        assert_eq!(row.to_string(), "3 0.5 0.25");
    }

    #[test]
    fn test_timer_running_average() {
        let mut t = EpochTimer::new();
        t.record(Duration::from_secs(10));
        t.record(Duration::from_secs(20));
        t.record(Duration::from_secs(30));
        assert_eq!(t.average(), Duration::from_secs(20));
        assert_eq!(t.estimate_remaining(5), Duration::from_secs(100));
        assert_eq!(t.estimate_remaining(0), Duration::ZERO);
    }

    #[test]
    fn test_finish_epoch_measures_elapsed() {
        let mut t = EpochTimer::new();
        std::thread::sleep(Duration::from_millis(5));
        let elapsed = t.finish_epoch();
        assert!(elapsed >= Duration::from_millis(5));
        assert_eq!(t.average(), elapsed);
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(
            format_remaining(Duration::from_secs(2 * 3600 + 5 * 60 + 59)),
            "% Estimated remaining time: 2 hours, 05 minutes"
        );
        assert_eq!(
            format_remaining(Duration::ZERO),
            "% Estimated remaining time: 0 hours, 00 minutes"
        );
        assert_eq!(
            format_remaining(Duration::from_secs(30 * 3600 + 59 * 60)),
            "% Estimated remaining time: 30 hours, 59 minutes"
        );
    }
}
