//! Registration lifecycle of a uinput device.
//!
//! ```text
//! Unopened ──open──▶ Opened ──declare──▶ CapabilitiesDeclared ──identity──▶ IdentitySet
//!                                                                               │
//!                                   Closed ◀──close── Active ◀──activate────────┘
//! ```
//!
//! Every transition is forward-only and happens at most once.  `close` is legal
//! from any state (it is also how a failed registration is rolled back) and is
//! a no-op once `Closed`.  Anything else, such as activating twice or declaring
//! capabilities after activation, is an invalid transition and is refused
//! before any request reaches the kernel.

use std::fmt;

use thiserror::Error;

/// Where a device is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    Unopened,
    Opened,
    CapabilitiesDeclared,
    IdentitySet,
    Active,
    Closed,
}

/// A lifecycle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStep {
    Open,
    DeclareCapabilities,
    SetIdentity,
    Activate,
    Close,
}

impl fmt::Display for RegistrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RegistrationState::Unopened => "unopened",
            RegistrationState::Opened => "opened",
            RegistrationState::CapabilitiesDeclared => "capabilities declared",
            RegistrationState::IdentitySet => "identity set",
            RegistrationState::Active => "active",
            RegistrationState::Closed => "closed",
        };
        f.write_str(s)
    }
}

impl fmt::Display for RegistrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RegistrationStep::Open => "open",
            RegistrationStep::DeclareCapabilities => "declare capabilities",
            RegistrationStep::SetIdentity => "set identity",
            RegistrationStep::Activate => "activate",
            RegistrationStep::Close => "close",
        };
        f.write_str(s)
    }
}

/// A step was attempted from a state that does not allow it.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("cannot {step} a device that is {from}")]
pub struct TransitionError {
    pub from: RegistrationState,
    pub step: RegistrationStep,
}

impl RegistrationState {
    /// Returns the state reached by performing `step`, or the reason it is refused.
    pub fn advance(self, step: RegistrationStep) -> Result<Self, TransitionError> {
        use RegistrationState as S;
        use RegistrationStep as Step;

        match (self, step) {
            (S::Unopened, Step::Open) => Ok(S::Opened),
            (S::Opened, Step::DeclareCapabilities) => Ok(S::CapabilitiesDeclared),
            (S::CapabilitiesDeclared, Step::SetIdentity) => Ok(S::IdentitySet),
            (S::IdentitySet, Step::Activate) => Ok(S::Active),
            (_, Step::Close) => Ok(S::Closed),
            (from, step) => Err(TransitionError { from, step }),
        }
    }

    /// Only an active device accepts event records.
    pub fn accepts_events(self) -> bool {
        self == RegistrationState::Active
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
