//! Explicit analysis state owned by whoever drives the pipeline.
//!
//! Closed set of states; transitions happen only through the methods below and
//! only `finish` consumes an `analyze` outcome.
//!
//! The HTTP handler drives one short-lived session per request; `dismiss`,
//! `reset` and `report` serve long-lived callers that keep a session around.

use thiserror::Error;
use tracing::debug;

use crate::analysis::error::{AnalysisError, AnalysisFailure};
use crate::analysis::report::Report;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum AnalysisState {
    #[default]
    Idle,
    Analyzing,
    Failed(AnalysisFailure),
    Ready(Box<Report>),
}

impl AnalysisState {
    pub fn name(&self) -> &'static str {
        match self {
            AnalysisState::Idle => "idle",
            AnalysisState::Analyzing => "analyzing",
            AnalysisState::Failed(_) => "error",
            AnalysisState::Ready(_) => "ready",
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("An analysis is already in progress")]
    AlreadyAnalyzing,

    #[error("No analysis is in progress")]
    NotAnalyzing,
}

/// At most one in-flight analysis per session.
#[derive(Debug, Default)]
pub struct AnalysisSession {
    state: AnalysisState,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self {
            state: AnalysisState::Idle,
        }
    }

    #[allow(dead_code)]
    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    #[allow(dead_code)]
    pub fn report(&self) -> Option<&Report> {
        match &self.state {
            AnalysisState::Ready(report) => Some(&**report),
            _ => None,
        }
    }

    /// Idle, Failed or Ready → Analyzing. A new submission replaces any previous report.
    pub fn begin(&mut self) -> Result<(), SessionError> {
        if self.state == AnalysisState::Analyzing {
            return Err(SessionError::AlreadyAnalyzing);
        }
        self.transition(AnalysisState::Analyzing);
        Ok(())
    }

    /// Analyzing → Ready | Failed, from the outcome of `analyze`.
    pub fn finish(&mut self, outcome: Result<Report, AnalysisError>) -> Result<(), SessionError> {
        if self.state != AnalysisState::Analyzing {
            return Err(SessionError::NotAnalyzing);
        }
        let next = match outcome {
            Ok(report) => AnalysisState::Ready(Box::new(report)),
            Err(err) => AnalysisState::Failed(AnalysisFailure::from(&err)),
        };
        self.transition(next);
        Ok(())
    }

    /// Failed → Idle (the "try again" action). Other states are left unchanged.
    #[allow(dead_code)]
    pub fn dismiss(&mut self) {
        if matches!(self.state, AnalysisState::Failed(_)) {
            self.transition(AnalysisState::Idle);
        }
    }

    /// Drops any report or error. An in-flight analysis cannot be reset.
    #[allow(dead_code)]
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if self.state == AnalysisState::Analyzing {
            return Err(SessionError::AlreadyAnalyzing);
        }
        self.transition(AnalysisState::Idle);
        Ok(())
    }

    /// Consumes the session, handing the final state to the caller.
    pub fn into_state(self) -> AnalysisState {
        self.state
    }

    fn transition(&mut self, next: AnalysisState) {
        debug!(from = self.state.name(), to = next.name(), "Analysis state change");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::report::fixtures::sample_report;

    #[test]
    fn test_starts_idle() {
        let session = AnalysisSession::new();
        assert_eq!(session.state(), &AnalysisState::Idle);
        assert!(session.report().is_none());
    }

    #[test]
    fn test_success_path_reaches_ready() {
        let mut session = AnalysisSession::new();
        session.begin().unwrap();
        assert_eq!(session.state().name(), "analyzing");
        session.finish(Ok(sample_report())).unwrap();
        assert_eq!(session.report(), Some(&sample_report()));
    }

    #[test]
    fn test_failure_path_records_message() {
        let mut session = AnalysisSession::new();
        session.begin().unwrap();
        session.finish(Err(AnalysisError::MalformedResponse)).unwrap();
        match session.state() {
            AnalysisState::Failed(failure) => {
                assert_eq!(failure.code, "MALFORMED_RESPONSE");
                assert!(failure.message.contains("not valid JSON"));
            }
            other => panic!("Expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn test_second_begin_while_analyzing_is_rejected() {
        let mut session = AnalysisSession::new();
        session.begin().unwrap();
        assert_eq!(session.begin(), Err(SessionError::AlreadyAnalyzing));
    }

    #[test]
    fn test_finish_without_begin_is_rejected() {
        let mut session = AnalysisSession::new();
        assert_eq!(
            session.finish(Ok(sample_report())),
            Err(SessionError::NotAnalyzing)
        );
        assert_eq!(session.state(), &AnalysisState::Idle);
    }

    #[test]
    fn test_dismiss_returns_failed_to_idle() {
        let mut session = AnalysisSession::new();
        session.begin().unwrap();
        session.finish(Err(AnalysisError::NoContent)).unwrap();
        session.dismiss();
        assert_eq!(session.state(), &AnalysisState::Idle);
    }

    #[test]
    fn test_dismiss_keeps_ready_report() {
        let mut session = AnalysisSession::new();
        session.begin().unwrap();
        session.finish(Ok(sample_report())).unwrap();
        session.dismiss();
        assert!(session.report().is_some());
    }

    #[test]
    fn test_reset_discards_report() {
        let mut session = AnalysisSession::new();
        session.begin().unwrap();
        session.finish(Ok(sample_report())).unwrap();
        session.reset().unwrap();
        assert_eq!(session.into_state(), AnalysisState::Idle);
    }

    #[test]
    fn test_reset_while_analyzing_is_rejected() {
        let mut session = AnalysisSession::new();
        session.begin().unwrap();
        assert_eq!(session.reset(), Err(SessionError::AlreadyAnalyzing));
    }

    #[test]
    fn test_new_analysis_replaces_previous_report() {
        let mut session = AnalysisSession::new();
        session.begin().unwrap();
        session.finish(Ok(sample_report())).unwrap();
        session.begin().unwrap();
        assert!(session.report().is_none());
    }
}
