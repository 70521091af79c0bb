//! Cancellable step scheduler
//!
//! The driver (animation frame loop, headless demo, tests) asks the clock for
//! a [`TickToken`] before queueing a step and hands the token back when the
//! step runs. Stopping the clock bumps its generation, so a token queued
//! before a game over or reset can never fire afterwards.

/// Permission to run one simulation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickToken {
    generation: u64,
}

/// Repeating ticker with synchronous cancellation
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    running: bool,
    generation: u64,
    pending: Option<TickToken>,
}

impl SimClock {
    /// Begin a new run of ticks. Earlier tokens stay invalid.
    pub fn start(&mut self) {
        self.running = true;
        self.generation += 1;
        self.pending = None;
    }

    /// Stop ticking and return the cancelled pending tick, if any
    pub fn stop(&mut self) -> Option<TickToken> {
        self.running = false;
        self.generation += 1;
        self.pending.take()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether a tick has been issued and not yet fired or cancelled
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Issue the next tick. `None` while stopped or when one is already queued.
    pub fn schedule(&mut self) -> Option<TickToken> {
        if !self.running || self.pending.is_some() {
            return None;
        }
        let token = TickToken {
            generation: self.generation,
        };
        self.pending = Some(token);
        Some(token)
    }

    /// Consume a delivered tick. Returns false for stale or unexpected tokens.
    pub fn fire(&mut self, token: TickToken) -> bool {
        if self.running && token.generation == self.generation && self.pending == Some(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}
