//! Flow catalog — the authored interview content.
//!
//! Flows, their questions, and the discrete answer options are read-only
//! data: loaded once at startup from JSON, validated, and never mutated.
//! The engine walks this structure; it never invents content.

pub mod language;

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

pub use language::{Language, LocalizedText, SUPPORTED_LANGUAGES};

/// One selectable answer. The `value` token is stable and
/// language-independent; only the label is localized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerOption {
    pub value: String,
    pub label: LocalizedText,
}

/// One interview step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: LocalizedText,
    pub options: Vec<AnswerOption>,
}

impl Question {
    /// Find the option carrying `value`, if any.
    pub fn option(&self, value: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.value == value)
    }
}

/// A named, ordered interview template for one user goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flow {
    pub id: String,
    pub title: LocalizedText,
    pub questions: Vec<Question>,
}

impl Flow {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Select the question that follows `current`, or `None` when the flow
    /// is finished. Extension point for conditional branching — a future
    /// selector may consult `answers`; today the order is strictly linear.
    pub fn next_question_index(
        &self,
        current: usize,
        _answers: &HashMap<String, String>,
    ) -> Option<usize> {
        let next = current + 1;
        (next < self.questions.len()).then_some(next)
    }
}

/// The full set of authored flows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    flows: Vec<Flow>,
}

impl Catalog {
    /// Wrap flows without validating. Callers loading authored content
    /// should go through `from_json`/`from_file`, which validate.
    pub fn new(flows: Vec<Flow>) -> Self {
        Self { flows }
    }

    /// Parse and validate a catalog from JSON text.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load and validate a catalog from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The catalog shipped with the binary.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(include_str!("../../data/flows.json"))
    }

    pub fn flows(&self) -> &[Flow] {
        &self.flows
    }

    pub fn flow(&self, id: &str) -> Option<&Flow> {
        self.flows.iter().find(|f| f.id == id)
    }

    /// Structural validation: unique ids, non-empty option lists, and full
    /// translation coverage. Fails loudly — a catalog that does not pass is
    /// never served.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.flows.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut flow_ids = HashSet::new();
        for flow in &self.flows {
            if !flow_ids.insert(flow.id.as_str()) {
                return Err(CatalogError::DuplicateFlowId {
                    flow_id: flow.id.clone(),
                });
            }
            if flow.questions.is_empty() {
                return Err(CatalogError::NoQuestions {
                    flow_id: flow.id.clone(),
                });
            }
            check_translations(&flow.id, "title", &flow.title)?;

            let mut question_ids = HashSet::new();
            for question in &flow.questions {
                if !question_ids.insert(question.id.as_str()) {
                    return Err(CatalogError::DuplicateQuestionId {
                        flow_id: flow.id.clone(),
                        question_id: question.id.clone(),
                    });
                }
                if question.options.is_empty() {
                    return Err(CatalogError::NoOptions {
                        flow_id: flow.id.clone(),
                        question_id: question.id.clone(),
                    });
                }
                check_translations(
                    &flow.id,
                    &format!("question {}", question.id),
                    &question.prompt,
                )?;

                let mut values = HashSet::new();
                for option in &question.options {
                    if !values.insert(option.value.as_str()) {
                        return Err(CatalogError::DuplicateOptionValue {
                            flow_id: flow.id.clone(),
                            question_id: question.id.clone(),
                            value: option.value.clone(),
                        });
                    }
                    check_translations(
                        &flow.id,
                        &format!("option {} of question {}", option.value, question.id),
                        &option.label,
                    )?;
                }
            }
        }
        Ok(())
    }
}

fn check_translations(
    flow_id: &str,
    item: &str,
    text: &LocalizedText,
) -> Result<(), CatalogError> {
    if let Some(language) = text.missing_languages().first() {
        return Err(CatalogError::MissingTranslation {
            flow_id: flow_id.to_string(),
            item: item.to_string(),
            language: *language,
        });
    }
    Ok(())
}
