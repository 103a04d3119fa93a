//! Fault-recovery state machine.
//!
//! Drives the nSLEEP reset pulse that clears a latched DRV8874 fault:
//!
//! ```text
//!  NORMAL ──[fault or force]──▶ RESETTING_PHASE1   (nSLEEP low)
//!    ▲                              │
//!    │                     [elapsed > hold_ms]
//!    │                              ▼
//!    └──[elapsed > min_recovery]── RESETTING_PHASE2 (nSLEEP high)
//! ```
//!
//! The machine is pure: it never touches a pin or a clock. Callers pass
//! the current time in and apply the returned [`Step`] to the sleep line.
//! Each call performs at most one transition.

use core::fmt;

/// Recovery sequence state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetState {
    /// Not resetting; speed updates are applied.
    Normal,
    /// nSLEEP held low since `since_ms` for at least `hold_ms`.
    ResettingPhase1 { since_ms: u64, hold_ms: u32 },
    /// nSLEEP released at `since_ms`; waiting out the recovery minimum.
    ResettingPhase2 { since_ms: u64 },
}

impl ResetState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::ResettingPhase1 { .. } => "ResettingPhase1",
            Self::ResettingPhase2 { .. } => "ResettingPhase2",
        }
    }
}

impl fmt::Display for ResetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Side effect the caller must perform after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Entered phase 1: drive nSLEEP low.
    Hold { hold_ms: u32 },
    /// Entered phase 2: drive nSLEEP high.
    Release,
    /// Back to normal; no pin change.
    Complete,
}

/// Non-blocking reset sequencer.
#[derive(Debug, Clone)]
pub struct ResetFsm {
    state: ResetState,
    min_recovery_ms: u32,
}

impl ResetFsm {
    pub fn new(min_recovery_ms: u32) -> Self {
        Self {
            state: ResetState::Normal,
            min_recovery_ms,
        }
    }

    pub fn state(&self) -> ResetState {
        self.state
    }

    /// A sequence has started and not yet completed.
    pub fn is_resetting(&self) -> bool {
        !matches!(self.state, ResetState::Normal)
    }

    /// The hold phase is over and the stabilisation wait is running.
    pub fn is_waiting(&self) -> bool {
        matches!(self.state, ResetState::ResettingPhase2 { .. })
    }

    /// Enter phase 1 from `Normal`.
    ///
    /// Returns `None` if a sequence is already running; the existing
    /// timer and hold duration are left alone.
    pub fn begin(&mut self, now_ms: u64, hold_ms: u32) -> Option<Step> {
        if self.is_resetting() {
            return None;
        }
        self.state = ResetState::ResettingPhase1 {
            since_ms: now_ms,
            hold_ms,
        };
        Some(Step::Hold { hold_ms })
    }

    /// Advance by at most one transition based on elapsed time.
    pub fn advance(&mut self, now_ms: u64) -> Option<Step> {
        match self.state {
            ResetState::Normal => None,
            ResetState::ResettingPhase1 { since_ms, hold_ms } => {
                if now_ms.wrapping_sub(since_ms) > u64::from(hold_ms) {
                    self.state = ResetState::ResettingPhase2 { since_ms: now_ms };
                    Some(Step::Release)
                } else {
                    None
                }
            }
            ResetState::ResettingPhase2 { since_ms } => {
                if now_ms.wrapping_sub(since_ms) > u64::from(self.min_recovery_ms) {
                    self.state = ResetState::Normal;
                    Some(Step::Complete)
                } else {
                    None
                }
            }
        }
    }

    /// Leave phase 1 now, whatever the elapsed time. The blocking path
    /// uses this once its own delay has covered the hold.
    pub fn release(&mut self, now_ms: u64) -> Option<Step> {
        match self.state {
            ResetState::ResettingPhase1 { .. } => {
                self.state = ResetState::ResettingPhase2 { since_ms: now_ms };
                Some(Step::Release)
            }
            _ => None,
        }
    }

    /// Return to `Normal` after a sequence completed outside the machine
    /// (the blocking path).
    pub fn finish(&mut self) {
        self.state = ResetState::Normal;
    }
}
