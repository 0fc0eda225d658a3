//! Error types for ClearPath.

use uuid::Uuid;

use crate::catalog::Language;

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    #[error("Guidance error: {0}")]
    Guidance(#[from] GuidanceError),

    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("Presentation error: {0}")]
    Presentation(#[from] PresentationError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Catalog loading/validation errors.
///
/// All of these indicate malformed authored content and abort startup —
/// a catalog that fails validation is never served.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(String),

    #[error("Catalog contains no flows")]
    Empty,

    #[error("Duplicate flow id: {flow_id}")]
    DuplicateFlowId { flow_id: String },

    #[error("Flow {flow_id} has no questions")]
    NoQuestions { flow_id: String },

    #[error("Duplicate question id {question_id} in flow {flow_id}")]
    DuplicateQuestionId { flow_id: String, question_id: String },

    #[error("Question {question_id} in flow {flow_id} has no options")]
    NoOptions { flow_id: String, question_id: String },

    #[error("Duplicate option value {value} in question {question_id} of flow {flow_id}")]
    DuplicateOptionValue {
        flow_id: String,
        question_id: String,
        value: String,
    },

    #[error("Missing {language} translation for {item} in flow {flow_id}")]
    MissingTranslation {
        flow_id: String,
        item: String,
        language: Language,
    },
}

/// Flow engine errors.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Unknown flow: {flow_id}")]
    UnknownFlow { flow_id: String },

    #[error("No active flow")]
    NoActiveFlow,

    #[error("Invalid option {value} for question {question_id}")]
    InvalidOption { question_id: String, value: String },
}

/// Guidance request builder errors.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Incomplete answers for flow {flow_id}: missing {missing:?}")]
    IncompleteAnswers {
        flow_id: String,
        missing: Vec<String>,
    },

    #[error("Unsupported language: {code}")]
    UnsupportedLanguage { code: String },
}

/// Guidance generation/parsing errors.
#[derive(Debug, thiserror::Error)]
pub enum GuidanceError {
    #[error("Malformed guidance response: {reason}")]
    Malformed { reason: String },

    #[error("Guidance generation failed: {reason}")]
    GenerationFailed { reason: String },
}

/// Audio synthesis errors.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("No guidance result to narrate")]
    NoGuidance,

    #[error("Audio synthesis failed: {reason}")]
    SynthesisFailed { reason: String },
}

/// Result presentation errors.
#[derive(Debug, thiserror::Error)]
pub enum PresentationError {
    #[error("Unknown tab: {name}")]
    UnknownTab { name: String },
}

/// Session lifecycle errors.
///
/// Loss of persisted session state is not a crash: it surfaces as
/// `Unknown`, which the HTTP layer maps to 404 so the client redirects
/// to the start page.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Unknown or expired session: {id}")]
    Unknown { id: Uuid },
}

/// Persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Migration failed: {0}")]
    Migration(String),
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
