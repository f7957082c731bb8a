//! Gate that keeps the form step behind a completed upload.
//!
//! The guard is a two-state machine owned by the [`WorkflowSession`]:
//!
//! ```text
//! NoUpload --(extraction succeeded)--> Uploaded
//! Uploaded --(upload step entered | submission succeeded)--> NoUpload
//! ```
//!
//! The form step consults it once when it is mounted.

use chrono::{DateTime, Utc};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardState {
    NoUpload,
    Uploaded { armed_at: DateTime<Utc> },
}

#[derive(Clone, Debug)]
pub struct NavigationGuard {
    state: GuardState,
}

impl Default for NavigationGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationGuard {
    pub fn new() -> Self {
        Self {
            state: GuardState::NoUpload,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// True while the form step may be shown.
    pub fn permits_form(&self) -> bool {
        matches!(self.state, GuardState::Uploaded { .. })
    }

    pub(crate) fn arm(&mut self) {
        let armed_at = Utc::now();
        tracing::debug!(%armed_at, "navigation guard armed");
        self.state = GuardState::Uploaded { armed_at };
    }

    pub(crate) fn disarm(&mut self) {
        if self.permits_form() {
            tracing::debug!("navigation guard disarmed");
        }
        self.state = GuardState::NoUpload;
    }
}

/// State that lives for one browser-session equivalent: created when the application starts and
/// shared by both steps.
#[derive(Clone, Debug)]
pub struct WorkflowSession {
    guard: NavigationGuard,
    started_at: DateTime<Utc>,
}

impl Default for WorkflowSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowSession {
    pub fn new() -> Self {
        Self {
            guard: NavigationGuard::new(),
            started_at: Utc::now(),
        }
    }

    pub fn guard(&self) -> &NavigationGuard {
        &self.guard
    }

    pub(crate) fn guard_mut(&mut self) -> &mut NavigationGuard {
        &mut self.guard
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}
