use core::fmt;
use core::time::Duration;
use serde::{Deserialize, Serialize};
use web_time::Instant;

/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InProgress => "in progress",
            Self::Won => "won",
            Self::Lost => "lost",
        })
    }
}

/// Turn count and session clock, mutated only by the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionStats {
    status: GameStatus,
    turns_taken: u32,
    started_at: Instant,
    ended_at: Option<Instant>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::started_at(Instant::now())
    }

    pub fn started_at(started_at: Instant) -> Self {
        Self {
            status: GameStatus::InProgress,
            turns_taken: 0,
            started_at,
            ended_at: None,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn turns_taken(&self) -> u32 {
        self.turns_taken
    }

    pub fn start_time(&self) -> Instant {
        self.started_at
    }

    pub fn end_time(&self) -> Option<Instant> {
        self.ended_at
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }

    /// Time played as seen at `now`, frozen once the game has ended.
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        self.ended_at
            .unwrap_or(now)
            .saturating_duration_since(self.started_at)
    }

    pub fn summary(&self) -> GameStatistics {
        self.summary_at(Instant::now())
    }

    pub fn summary_at(&self, now: Instant) -> GameStatistics {
        GameStatistics {
            status: self.status,
            turns_taken: self.turns_taken,
            elapsed_millis: self
                .elapsed_at(now)
                .as_millis()
                .try_into()
                .unwrap_or(u64::MAX),
        }
    }

    pub(crate) fn count_turn(&mut self) {
        self.turns_taken = self.turns_taken.saturating_add(1);
    }

    /// Records a terminal status. Only the first call has any effect.
    pub(crate) fn finish(&mut self, status: GameStatus, now: Instant) {
        if self.status.is_finished() || !status.is_finished() {
            return;
        }

        self.status = status;
        self.ended_at = Some(now);
        log::debug!(
            "Game {} after {} turns in {:?}",
            status,
            self.turns_taken,
            self.elapsed_at(now)
        );
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain-value report of a session, for collaborators to print or store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatistics {
    pub status: GameStatus,
    pub turns_taken: u32,
    pub elapsed_millis: u64,
}

impl fmt::Display for GameStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Game status: {}", self.status)?;
        writeln!(f, "Turns taken: {}", self.turns_taken)?;
        write!(f, "Time elapsed: {} ms", self.elapsed_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_advances_while_in_progress() {
        let t0 = Instant::now();
        let stats = SessionStats::started_at(t0);

        assert_eq!(stats.elapsed_at(t0 + Duration::from_secs(3)), Duration::from_secs(3));
        assert_eq!(stats.elapsed_at(t0 + Duration::from_secs(7)), Duration::from_secs(7));
    }

    #[test]
    fn finish_freezes_clock_and_is_idempotent() {
        let t0 = Instant::now();
        let mut stats = SessionStats::started_at(t0);

        stats.finish(GameStatus::Lost, t0 + Duration::from_millis(1500));
        stats.finish(GameStatus::Won, t0 + Duration::from_secs(9));

        assert_eq!(stats.status(), GameStatus::Lost);
        assert_eq!(stats.end_time(), Some(t0 + Duration::from_millis(1500)));
        assert_eq!(
            stats.summary_at(t0 + Duration::from_secs(60)).elapsed_millis,
            1500
        );
    }

    #[test]
    fn in_progress_is_not_a_finish() {
        let t0 = Instant::now();
        let mut stats = SessionStats::started_at(t0);

        stats.finish(GameStatus::InProgress, t0);

        assert_eq!(stats.end_time(), None);
        assert_eq!(stats.status(), GameStatus::InProgress);
    }

    #[test]
    fn statistics_report() {
        let report = GameStatistics {
            status: GameStatus::Won,
            turns_taken: 12,
            elapsed_millis: 3400,
        };
        assert_eq!(
            report.to_string(),
            "Game status: won\nTurns taken: 12\nTime elapsed: 3400 ms"
        );
    }
}
