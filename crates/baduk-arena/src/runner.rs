//! Replaying recorded moves against a game.

use baduk_core::Submission;
use baduk_engine::{Game, GameError, GameEvent, Outcome, Score};
use serde::Serialize;

/// A move the engine refused.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejection {
    /// 1-based position in the move list.
    pub index: usize,
    pub submission: Submission,
    pub reason: String,
}

/// What happened while replaying a match.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub variant: String,
    pub accepted: usize,
    pub rejected: Vec<Rejection>,
    pub events: Vec<GameEvent>,
    pub outcome: Option<Outcome>,
    pub score: Score,
}

/// Feeds moves to a game, one at a time.
pub struct MatchRunner {
    game: Game,
    /// Stop at the first rejected move instead of skipping it.
    strict: bool,
}

impl MatchRunner {
    pub fn new(game: Game, strict: bool) -> Self {
        MatchRunner { game, strict }
    }

    /// Replays `moves` and reports the result.
    ///
    /// # Errors
    ///
    /// In strict mode, returns the first rejection.
    pub fn run(&mut self, moves: &[Submission]) -> Result<MatchReport, GameError> {
        let mut accepted = 0;
        let mut rejected = Vec::new();
        let mut events = Vec::new();

        for (i, &submission) in moves.iter().enumerate() {
            match self.game.submit(submission) {
                Ok(new_events) => {
                    accepted += 1;
                    events.extend(new_events);
                }
                Err(e) if self.strict => {
                    tracing::error!(index = i + 1, %submission, error = %e, "move rejected");
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!(index = i + 1, %submission, error = %e, "skipping rejected move");
                    rejected.push(Rejection {
                        index: i + 1,
                        submission,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(MatchReport {
            variant: self.game.kind().to_string(),
            accepted,
            rejected,
            events,
            outcome: self.game.state().outcome().cloned(),
            score: self.game.score(),
        })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn into_game(self) -> Game {
        self.game
    }
}
