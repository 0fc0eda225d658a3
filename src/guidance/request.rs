//! Guidance request builder — validates and packages a completed interview.

use serde::{Deserialize, Serialize};

use crate::catalog::{Flow, Language};
use crate::error::RequestError;
use crate::interview::AnswerSet;

/// The payload sent to the generation service.
///
/// Built only from a complete answer set; the builder never calls the
/// service itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidanceRequest {
    pub flow_id: String,
    pub answers: AnswerSet,
    pub language: Language,
}

impl GuidanceRequest {
    /// Validate `answers` against `flow` and package the request.
    ///
    /// Fails with `IncompleteAnswers` if any of the flow's questions is
    /// unanswered, and with `UnsupportedLanguage` for a code outside the
    /// supported set. Answers are carried verbatim.
    pub fn build(flow: &Flow, answers: &AnswerSet, language: &str) -> Result<Self, RequestError> {
        let language = Language::parse(language).ok_or_else(|| RequestError::UnsupportedLanguage {
            code: language.to_string(),
        })?;

        let missing: Vec<String> = flow
            .questions
            .iter()
            .filter(|q| !answers.contains_key(&q.id))
            .map(|q| q.id.clone())
            .collect();
        if !missing.is_empty() {
            return Err(RequestError::IncompleteAnswers {
                flow_id: flow.id.clone(),
                missing,
            });
        }

        Ok(Self {
            flow_id: flow.id.clone(),
            answers: answers.clone(),
            language,
        })
    }
}
