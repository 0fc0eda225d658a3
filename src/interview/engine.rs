//! Flow engine — sequencing, progress, and answer application.

use std::sync::Arc;

use tracing::debug;

use crate::catalog::{Catalog, Flow, Question};
use crate::error::FlowError;

use super::state::{InterviewPhase, InterviewSession};

/// What an accepted answer did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Advanced to the next question.
    Next,
    /// That was the last question — the session is now complete and the
    /// caller should fire guidance generation exactly once.
    Completed,
}

/// What backward navigation did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackOutcome {
    /// Moved to the previous question.
    Previous,
    /// Already at the first question — the caller should route away from
    /// the interview. Not an error.
    Exit,
}

/// Drives one session through the questions of its flow.
///
/// Methods take the session explicitly; the engine itself holds only the
/// immutable catalog and is freely shareable.
#[derive(Clone)]
pub struct FlowEngine {
    catalog: Arc<Catalog>,
}

impl FlowEngine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Begin a named flow: index 0, empty answer set.
    pub fn start(&self, flow_id: &str) -> Result<InterviewSession, FlowError> {
        if self.catalog.flow(flow_id).is_none() {
            return Err(FlowError::UnknownFlow {
                flow_id: flow_id.to_string(),
            });
        }
        debug!(flow_id, "Interview started");
        Ok(InterviewSession::new(flow_id))
    }

    /// The question the session currently sits on.
    pub fn current_question<'a>(
        &'a self,
        session: &InterviewSession,
    ) -> Result<&'a Question, FlowError> {
        let flow = self.active_flow(session)?;
        flow.question(session.index).ok_or(FlowError::NoActiveFlow)
    }

    /// Fraction of the flow reached, in (0, 1]. A complete session reports 1.
    pub fn progress(&self, session: &InterviewSession) -> Result<f64, FlowError> {
        let flow = self.flow(session)?;
        if session.is_complete() {
            return Ok(1.0);
        }
        Ok((session.index + 1) as f64 / flow.question_count() as f64)
    }

    /// Record a choice for the current question and advance.
    ///
    /// Re-answering the same question before advancing overwrites the prior
    /// entry. The completing transition is one-directional: once
    /// `Completed` is returned the session accepts no further navigation.
    pub fn answer(
        &self,
        session: &mut InterviewSession,
        value: &str,
    ) -> Result<AnswerOutcome, FlowError> {
        let flow = self.active_flow(session)?;
        let question = flow.question(session.index).ok_or(FlowError::NoActiveFlow)?;

        if question.option(value).is_none() {
            return Err(FlowError::InvalidOption {
                question_id: question.id.clone(),
                value: value.to_string(),
            });
        }

        session
            .answers
            .insert(question.id.clone(), value.to_string());

        match flow.next_question_index(session.index, &session.answers) {
            Some(next) => {
                session.index = next;
                Ok(AnswerOutcome::Next)
            }
            None => {
                session.phase = InterviewPhase::Complete;
                debug!(flow_id = %session.flow_id, "Interview complete");
                Ok(AnswerOutcome::Completed)
            }
        }
    }

    /// Step back one question. The answer for the question being left is
    /// retained, so returning forward later does not force re-answering.
    pub fn back(&self, session: &mut InterviewSession) -> Result<BackOutcome, FlowError> {
        self.active_flow(session)?;
        if session.index > 0 {
            session.index -= 1;
            Ok(BackOutcome::Previous)
        } else {
            Ok(BackOutcome::Exit)
        }
    }

    /// The session's flow, whatever its phase.
    fn flow(&self, session: &InterviewSession) -> Result<&Flow, FlowError> {
        self.catalog
            .flow(&session.flow_id)
            .ok_or(FlowError::NoActiveFlow)
    }

    /// The session's flow, only while navigation is still allowed.
    fn active_flow(&self, session: &InterviewSession) -> Result<&Flow, FlowError> {
        if session.is_complete() {
            return Err(FlowError::NoActiveFlow);
        }
        self.flow(session)
    }
}
