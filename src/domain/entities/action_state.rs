//! Lifecycle of an unsubscribe action.
//!
//! ```text
//! Issued ──construct──▶ Valid ──time ≥ exp──▶ Expired
//!                         │
//!                         ├──mark used (proxy only)──▶ Consumed
//!                         └──verification failure───▶ Invalid
//! ```
//!
//! `Consumed`, `Expired` and `Invalid` are absorbing. Expiry needs no explicit
//! event: it is derived from the clock whenever a state is observed.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    Issued,
    Valid,
    Consumed,
    Expired,
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEvent {
    Constructed,
    MarkUsed,
    VerificationFailed,
}

impl ActionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ActionState::Consumed | ActionState::Expired | ActionState::Invalid
        )
    }

    /// Applies an explicit event. Events that have no edge from the current
    /// state leave it unchanged, which makes a repeated `MarkUsed` a no-op.
    pub fn apply(self, event: ActionEvent) -> ActionState {
        match (self, event) {
            (ActionState::Issued, ActionEvent::Constructed) => ActionState::Valid,
            (ActionState::Valid, ActionEvent::MarkUsed) => ActionState::Consumed,
            (ActionState::Issued | ActionState::Valid, ActionEvent::VerificationFailed) => {
                ActionState::Invalid
            }
            (state, _) => state,
        }
    }

    /// Observes the state at `now`; a `Valid` action past `expires_at` is `Expired`.
    pub fn at(self, expires_at: i64, now: i64) -> ActionState {
        match self {
            ActionState::Valid if expires_at <= now => ActionState::Expired,
            state => state,
        }
    }
}
