//! SessionManager — coordinates interview state, guidance generation, and
//! audio synthesis for every live session.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::catalog::{Catalog, Language};
use crate::error::{AudioError, FlowError, Result, SessionError};
use crate::guidance::{GuidanceRequest, GuidanceResult};
use crate::interview::{AnswerOutcome, BackOutcome, FlowEngine, InterviewSession};
use crate::results::{narration_script, ArtifactState, PresentationState, ResultTab};
use crate::services::{GenerationService, SpeechService};
use crate::store::{PersistedSession, SessionStore};

/// One user's live state: language, interview position, and both remote
/// artifacts.
#[derive(Debug)]
pub struct UserSession {
    pub language: Language,
    pub interview: Option<InterviewSession>,
    pub guidance: ArtifactState<GuidanceResult>,
    pub presentation: PresentationState,
}

impl UserSession {
    fn new(language: Language) -> Self {
        Self {
            language,
            interview: None,
            guidance: ArtifactState::Idle,
            presentation: PresentationState::new(),
        }
    }

    /// Rebuild from the durable fields after the in-memory state was lost.
    /// A persisted guidance result comes back `Ready` so the results view
    /// works without re-generating; interview position does not survive.
    fn from_persisted(persisted: PersistedSession) -> Self {
        Self {
            language: persisted.language,
            interview: None,
            guidance: match persisted.guidance {
                Some(result) => ArtifactState::Ready(result),
                None => ArtifactState::Idle,
            },
            presentation: PresentationState::new(),
        }
    }
}

/// A flow as shown on the picker, localized to the session language.
#[derive(Debug, Clone, Serialize)]
pub struct FlowSummary {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionView {
    pub value: String,
    pub label: String,
}

/// The current question, localized and positioned.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub flow_id: String,
    pub question_id: String,
    pub prompt: String,
    pub options: Vec<OptionView>,
    pub index: usize,
    pub total: usize,
    pub progress: f64,
}

/// What an answer did, as seen by the client.
#[derive(Debug, Clone)]
pub enum AnswerAdvance {
    Question(QuestionView),
    Complete,
}

/// What backward navigation did, as seen by the client.
#[derive(Debug, Clone)]
pub enum BackNav {
    Question(QuestionView),
    Exit,
}

/// Coordinates every live session.
///
/// The engine is pure; this type owns the locking, the persistence calls,
/// and the spawned requests to the external services. Each artifact has at
/// most one request outstanding; an outcome arriving for a session that
/// was restarted or dropped is discarded.
pub struct SessionManager {
    engine: FlowEngine,
    store: Arc<dyn SessionStore>,
    generation: Arc<dyn GenerationService>,
    speech: Arc<dyn SpeechService>,
    sessions: Arc<RwLock<HashMap<Uuid, UserSession>>>,
}

impl SessionManager {
    pub fn new(
        catalog: Arc<Catalog>,
        store: Arc<dyn SessionStore>,
        generation: Arc<dyn GenerationService>,
        speech: Arc<dyn SpeechService>,
    ) -> Self {
        Self {
            engine: FlowEngine::new(catalog),
            store,
            generation,
            speech,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Open a session for a chosen language.
    pub async fn create(&self, language_code: &str) -> Result<Uuid> {
        let language = Language::parse(language_code).ok_or_else(|| {
            crate::error::RequestError::UnsupportedLanguage {
                code: language_code.to_string(),
            }
        })?;

        let id = Uuid::new_v4();
        self.sessions
            .write()
            .await
            .insert(id, UserSession::new(language));
        self.store.save(id, &PersistedSession::new(language)).await?;

        info!(session_id = %id, language = %language, "Session created");
        Ok(id)
    }

    /// Flow picker entries, localized to the session language.
    pub async fn flows(&self, id: Uuid) -> Result<Vec<FlowSummary>> {
        self.ensure_session(id).await?;
        let sessions = self.sessions.read().await;
        let session = sessions.get(&id).ok_or(SessionError::Unknown { id })?;
        Ok(self
            .engine
            .catalog()
            .flows()
            .iter()
            .map(|flow| FlowSummary {
                id: flow.id.clone(),
                title: flow.title.get(session.language).to_string(),
            })
            .collect())
    }

    /// Start the named flow for this session, resetting both artifacts.
    pub async fn select_flow(&self, id: Uuid, flow_id: &str) -> Result<QuestionView> {
        self.ensure_session(id).await?;

        let (view, language) = {
            let mut sessions = self.sessions.write().await;
            let session = sessions.get_mut(&id).ok_or(SessionError::Unknown { id })?;

            let interview = self.engine.start(flow_id)?;
            let view = self.question_view(&interview, session.language)?;
            session.interview = Some(interview);
            session.guidance.reset();
            session.presentation.reset();
            (view, session.language)
        };

        self.store
            .save(
                id,
                &PersistedSession {
                    language,
                    flow_id: Some(flow_id.to_string()),
                    guidance: None,
                },
            )
            .await?;

        Ok(view)
    }

    /// The question the session currently sits on.
    pub async fn question(&self, id: Uuid) -> Result<QuestionView> {
        self.ensure_session(id).await?;
        let sessions = self.sessions.read().await;
        let session = sessions.get(&id).ok_or(SessionError::Unknown { id })?;
        let interview = session.interview.as_ref().ok_or(FlowError::NoActiveFlow)?;
        self.question_view(interview, session.language)
    }

    /// Record an answer. On the completing answer, fires guidance
    /// generation exactly once and reports `Complete`.
    pub async fn answer(&self, id: Uuid, value: &str) -> Result<AnswerAdvance> {
        self.ensure_session(id).await?;

        let (advance, request) = {
            let mut sessions = self.sessions.write().await;
            let session = sessions.get_mut(&id).ok_or(SessionError::Unknown { id })?;
            let language = session.language;
            let interview = session.interview.as_mut().ok_or(FlowError::NoActiveFlow)?;

            match self.engine.answer(interview, value)? {
                AnswerOutcome::Next => {
                    let view = self.question_view(interview, language)?;
                    (AnswerAdvance::Question(view), None)
                }
                AnswerOutcome::Completed => {
                    let request = self.build_request(interview, language)?;
                    let fire = session.guidance.begin();
                    (AnswerAdvance::Complete, fire.then_some(request))
                }
            }
        };

        if let Some(request) = request {
            self.spawn_generation(id, request);
        }
        Ok(advance)
    }

    /// Step back one question, or signal that the interview was exited.
    pub async fn go_back(&self, id: Uuid) -> Result<BackNav> {
        self.ensure_session(id).await?;

        let (nav, language) = {
            let mut sessions = self.sessions.write().await;
            let session = sessions.get_mut(&id).ok_or(SessionError::Unknown { id })?;
            let language = session.language;
            let interview = session.interview.as_mut().ok_or(FlowError::NoActiveFlow)?;

            match self.engine.back(interview)? {
                BackOutcome::Previous => {
                    let view = self.question_view(interview, language)?;
                    (BackNav::Question(view), language)
                }
                BackOutcome::Exit => {
                    session.interview = None;
                    (BackNav::Exit, language)
                }
            }
        };

        if matches!(nav, BackNav::Exit) {
            self.store
                .save(id, &PersistedSession::new(language))
                .await?;
        }
        Ok(nav)
    }

    /// Snapshot of the guidance artifact.
    pub async fn guidance(&self, id: Uuid) -> Result<ArtifactState<GuidanceResult>> {
        self.ensure_session(id).await?;
        let sessions = self.sessions.read().await;
        let session = sessions.get(&id).ok_or(SessionError::Unknown { id })?;
        Ok(session.guidance.clone())
    }

    /// Re-fire generation after a failure. A no-op while a request is in
    /// flight; requires the interview to have completed.
    pub async fn retry_generation(&self, id: Uuid) -> Result<ArtifactState<GuidanceResult>> {
        self.ensure_session(id).await?;

        let (request, snapshot) = {
            let mut sessions = self.sessions.write().await;
            let session = sessions.get_mut(&id).ok_or(SessionError::Unknown { id })?;
            let language = session.language;
            let interview = session.interview.as_ref().ok_or(FlowError::NoActiveFlow)?;
            if !interview.is_complete() {
                return Err(FlowError::NoActiveFlow.into());
            }
            if session.guidance.is_ready() {
                return Ok(session.guidance.clone());
            }
            let request = self.build_request(interview, language)?;
            let fire = session.guidance.begin();
            (fire.then_some(request), session.guidance.clone())
        };
        if let Some(request) = request {
            self.spawn_generation(id, request);
        }
        Ok(snapshot)
    }

    /// Trigger audio synthesis for the ready guidance result. A repeat
    /// trigger while one is loading is a no-op, not a queue.
    pub async fn request_audio(&self, id: Uuid) -> Result<ArtifactState<String>> {
        self.ensure_session(id).await?;

        let job = {
            let mut sessions = self.sessions.write().await;
            let session = sessions.get_mut(&id).ok_or(SessionError::Unknown { id })?;

            let result = session
                .guidance
                .value()
                .cloned()
                .ok_or(AudioError::NoGuidance)?;

            if session.presentation.audio.begin() {
                Some((narration_script(&result, session.language), session.language))
            } else {
                None
            }
        };

        if let Some((text, language)) = job {
            self.spawn_audio(id, text, language);
        }
        self.audio(id).await
    }

    /// Snapshot of the audio artifact.
    pub async fn audio(&self, id: Uuid) -> Result<ArtifactState<String>> {
        self.ensure_session(id).await?;
        let sessions = self.sessions.read().await;
        let session = sessions.get(&id).ok_or(SessionError::Unknown { id })?;
        Ok(session.presentation.audio.clone())
    }

    /// Switch the active results tab.
    pub async fn select_tab(&self, id: Uuid, name: &str) -> Result<ResultTab> {
        self.ensure_session(id).await?;
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or(SessionError::Unknown { id })?;
        Ok(session.presentation.select_tab(name)?)
    }

    /// Discard the interview and both artifacts, keeping the language.
    pub async fn restart(&self, id: Uuid) -> Result<()> {
        self.ensure_session(id).await?;

        let language = {
            let mut sessions = self.sessions.write().await;
            let session = sessions.get_mut(&id).ok_or(SessionError::Unknown { id })?;
            session.interview = None;
            session.guidance.reset();
            session.presentation.reset();
            session.language
        };

        self.store.clear(id).await?;
        self.store.save(id, &PersistedSession::new(language)).await?;
        info!(session_id = %id, "Session restarted");
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────────

    /// Make sure the session is in memory, resurrecting it from the store
    /// if this process has not seen it yet. A session in neither place is
    /// `SessionError::Unknown` — the 404 the client turns into a redirect.
    async fn ensure_session(&self, id: Uuid) -> Result<()> {
        if self.sessions.read().await.contains_key(&id) {
            return Ok(());
        }
        let persisted = self
            .store
            .load(id)
            .await?
            .ok_or(SessionError::Unknown { id })?;
        self.sessions
            .write()
            .await
            .entry(id)
            .or_insert_with(|| UserSession::from_persisted(persisted));
        Ok(())
    }

    fn question_view(
        &self,
        interview: &InterviewSession,
        language: Language,
    ) -> Result<QuestionView> {
        let question = self.engine.current_question(interview)?;
        let flow = self
            .engine
            .catalog()
            .flow(&interview.flow_id)
            .ok_or(FlowError::NoActiveFlow)?;
        let progress = self.engine.progress(interview)?;

        Ok(QuestionView {
            flow_id: interview.flow_id.clone(),
            question_id: question.id.clone(),
            prompt: question.prompt.get(language).to_string(),
            options: question
                .options
                .iter()
                .map(|option| OptionView {
                    value: option.value.clone(),
                    label: option.label.get(language).to_string(),
                })
                .collect(),
            index: interview.index,
            total: flow.question_count(),
            progress,
        })
    }

    fn build_request(
        &self,
        interview: &InterviewSession,
        language: Language,
    ) -> Result<GuidanceRequest> {
        let flow = self
            .engine
            .catalog()
            .flow(&interview.flow_id)
            .ok_or(FlowError::NoActiveFlow)?;
        Ok(GuidanceRequest::build(
            flow,
            &interview.answers,
            language.code(),
        )?)
    }

    fn spawn_generation(&self, id: Uuid, request: GuidanceRequest) {
        let generation = Arc::clone(&self.generation);
        let store = Arc::clone(&self.store);
        let sessions = Arc::clone(&self.sessions);

        tokio::spawn(async move {
            info!(session_id = %id, flow_id = %request.flow_id, "Generating guidance");

            let outcome = match generation.generate(&request).await {
                Ok(raw) => GuidanceResult::parse(&raw),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(result) => {
                    let persisted = {
                        let mut sessions = sessions.write().await;
                        let Some(session) = sessions.get_mut(&id) else {
                            // Session dropped while we were waiting — discard.
                            return;
                        };
                        if !session.guidance.succeed(result.clone()) {
                            return;
                        }
                        PersistedSession {
                            language: session.language,
                            flow_id: Some(request.flow_id.clone()),
                            guidance: Some(result),
                        }
                    };
                    if let Err(e) = store.save(id, &persisted).await {
                        warn!(session_id = %id, error = %e, "Failed to persist guidance result");
                    }
                }
                Err(e) => {
                    error!(session_id = %id, error = %e, "Guidance generation failed");
                    let mut sessions = sessions.write().await;
                    if let Some(session) = sessions.get_mut(&id) {
                        session.guidance.fail(e.to_string());
                    }
                }
            }
        });
    }

    fn spawn_audio(&self, id: Uuid, text: String, language: Language) {
        let speech = Arc::clone(&self.speech);
        let sessions = Arc::clone(&self.sessions);

        tokio::spawn(async move {
            info!(session_id = %id, "Synthesizing audio");

            match speech.synthesize(&text, language).await {
                Ok(url) => {
                    let mut sessions = sessions.write().await;
                    if let Some(session) = sessions.get_mut(&id) {
                        session.presentation.audio.succeed(url);
                    }
                }
                Err(e) => {
                    error!(session_id = %id, error = %e, "Audio synthesis failed");
                    let mut sessions = sessions.write().await;
                    if let Some(session) = sessions.get_mut(&id) {
                        session.presentation.audio.fail(e.to_string());
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::{Mutex, Notify};

    use super::*;
    use crate::catalog::{AnswerOption, Flow, LocalizedText, Question};
    use crate::error::{Error, GuidanceError};
    use crate::store::LibSqlStore;

    struct StubGeneration {
        calls: AtomicUsize,
        last_request: Mutex<Option<GuidanceRequest>>,
        response: serde_json::Value,
    }

    impl StubGeneration {
        fn new(response: serde_json::Value) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
                response,
            })
        }

        fn well_formed() -> Arc<Self> {
            Self::new(serde_json::json!({
                "summaryText": "You can likely file a family petition.",
                "checklistItems": ["Gather documents", "File Form I-130"],
                "officialLinks": [{
                    "title": "USCIS",
                    "url": "https://www.uscis.gov/i-130",
                    "description": "Petition for Alien Relative"
                }],
                "questionsToAsk": ["What fees apply?"]
            }))
        }
    }

    #[async_trait]
    impl GenerationService for StubGeneration {
        async fn generate(
            &self,
            request: &GuidanceRequest,
        ) -> std::result::Result<serde_json::Value, GuidanceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().await = Some(request.clone());
            Ok(self.response.clone())
        }
    }

    struct FailingGeneration;

    #[async_trait]
    impl GenerationService for FailingGeneration {
        async fn generate(
            &self,
            _request: &GuidanceRequest,
        ) -> std::result::Result<serde_json::Value, GuidanceError> {
            Err(GuidanceError::GenerationFailed {
                reason: "service unavailable".into(),
            })
        }
    }

    struct StubSpeech {
        calls: AtomicUsize,
        gate: Notify,
        gated: bool,
    }

    impl StubSpeech {
        fn immediate() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                gate: Notify::new(),
                gated: false,
            })
        }

        fn gated() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                gate: Notify::new(),
                gated: true,
            })
        }
    }

    #[async_trait]
    impl SpeechService for StubSpeech {
        async fn synthesize(&self, _text: &str, _language: Language) -> std::result::Result<String, AudioError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.gated {
                self.gate.notified().await;
            }
            Ok("https://cdn.example/guide.mp3".to_string())
        }
    }

    async fn manager_with(
        catalog: Catalog,
        generation: Arc<dyn GenerationService>,
        speech: Arc<dyn SpeechService>,
    ) -> SessionManager {
        let store: Arc<dyn SessionStore> = Arc::new(LibSqlStore::new_memory().await.unwrap());
        SessionManager::new(Arc::new(catalog), store, generation, speech)
    }

    async fn wait_for_guidance(
        manager: &SessionManager,
        id: Uuid,
    ) -> ArtifactState<GuidanceResult> {
        for _ in 0..100 {
            let state = manager.guidance(id).await.unwrap();
            if !matches!(state, ArtifactState::Idle | ArtifactState::Loading) {
                return state;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("guidance never settled");
    }

    async fn wait_for_audio(manager: &SessionManager, id: Uuid) -> ArtifactState<String> {
        for _ in 0..100 {
            let state = manager.audio(id).await.unwrap();
            if !matches!(state, ArtifactState::Idle | ArtifactState::Loading) {
                return state;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("audio never settled");
    }

    #[tokio::test]
    async fn end_to_end_family_petition_generates_once() {
        let generation = StubGeneration::well_formed();
        let manager = manager_with(
            Catalog::bundled().unwrap(),
            generation.clone(),
            StubSpeech::immediate(),
        )
        .await;

        let id = manager.create("en").await.unwrap();
        let view = manager.select_flow(id, "family-based-petition").await.unwrap();
        assert_eq!(view.question_id, "relationship");
        assert_eq!(view.total, 2);
        assert_eq!(view.progress, 0.5);

        let advance = manager.answer(id, "spouse").await.unwrap();
        match advance {
            AnswerAdvance::Question(view) => assert_eq!(view.question_id, "location"),
            AnswerAdvance::Complete => panic!("completed too early"),
        }

        let advance = manager.answer(id, "abroad").await.unwrap();
        assert!(matches!(advance, AnswerAdvance::Complete));

        let state = wait_for_guidance(&manager, id).await;
        assert!(state.is_ready());

        assert_eq!(generation.calls.load(Ordering::SeqCst), 1);
        let request = generation.last_request.lock().await.clone().unwrap();
        assert_eq!(request.flow_id, "family-based-petition");
        assert_eq!(request.language, Language::En);
        let expected: crate::interview::AnswerSet = [
            ("relationship".to_string(), "spouse".to_string()),
            ("location".to_string(), "abroad".to_string()),
        ]
        .into();
        assert_eq!(request.answers, expected);
    }

    #[tokio::test]
    async fn generation_failure_is_visible_and_retryable() {
        let manager = manager_with(
            Catalog::bundled().unwrap(),
            Arc::new(FailingGeneration),
            StubSpeech::immediate(),
        )
        .await;

        let id = manager.create("en").await.unwrap();
        manager.select_flow(id, "family-based-petition").await.unwrap();
        manager.answer(id, "spouse").await.unwrap();
        manager.answer(id, "abroad").await.unwrap();

        let state = wait_for_guidance(&manager, id).await;
        assert!(matches!(state, ArtifactState::Failed(_)));

        // One re-click, one more attempt, still failing but never panicking.
        manager.retry_generation(id).await.unwrap();
        let state = wait_for_guidance(&manager, id).await;
        assert!(matches!(state, ArtifactState::Failed(_)));
    }

    #[tokio::test]
    async fn malformed_generation_response_fails_the_artifact() {
        let generation = StubGeneration::new(serde_json::json!({
            "summaryText": "ok",
            "checklistItems": ["a"]
            // officialLinks and questionsToAsk missing
        }));
        let manager = manager_with(
            Catalog::bundled().unwrap(),
            generation,
            StubSpeech::immediate(),
        )
        .await;

        let id = manager.create("en").await.unwrap();
        manager.select_flow(id, "family-based-petition").await.unwrap();
        manager.answer(id, "spouse").await.unwrap();
        manager.answer(id, "abroad").await.unwrap();

        let state = wait_for_guidance(&manager, id).await;
        match state {
            ArtifactState::Failed(message) => assert!(message.contains("Malformed")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn audio_has_at_most_one_outstanding_request() {
        let speech = StubSpeech::gated();
        let manager = manager_with(
            Catalog::bundled().unwrap(),
            StubGeneration::well_formed(),
            speech.clone(),
        )
        .await;

        let id = manager.create("es").await.unwrap();
        manager.select_flow(id, "family-based-petition").await.unwrap();
        manager.answer(id, "spouse").await.unwrap();
        manager.answer(id, "abroad").await.unwrap();
        wait_for_guidance(&manager, id).await;

        let first = manager.request_audio(id).await.unwrap();
        assert!(first.is_loading());

        // Re-click while loading: no second request.
        let second = manager.request_audio(id).await.unwrap();
        assert!(second.is_loading());

        // Give the (single) task a moment to reach the gate, then open it.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(speech.calls.load(Ordering::SeqCst), 1);
        speech.gate.notify_one();

        let settled = wait_for_audio(&manager, id).await;
        assert_eq!(
            settled,
            ArtifactState::Ready("https://cdn.example/guide.mp3".to_string())
        );
        assert_eq!(speech.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn audio_requires_a_ready_guidance_result() {
        let manager = manager_with(
            Catalog::bundled().unwrap(),
            StubGeneration::well_formed(),
            StubSpeech::immediate(),
        )
        .await;

        let id = manager.create("en").await.unwrap();
        let result = manager.request_audio(id).await;
        assert!(matches!(
            result,
            Err(Error::Audio(AudioError::NoGuidance))
        ));
    }

    #[tokio::test]
    async fn restart_discards_artifacts_and_keeps_language() {
        let manager = manager_with(
            Catalog::bundled().unwrap(),
            StubGeneration::well_formed(),
            StubSpeech::immediate(),
        )
        .await;

        let id = manager.create("fr").await.unwrap();
        manager.select_flow(id, "family-based-petition").await.unwrap();
        manager.answer(id, "spouse").await.unwrap();
        manager.answer(id, "abroad").await.unwrap();
        wait_for_guidance(&manager, id).await;
        manager.request_audio(id).await.unwrap();
        wait_for_audio(&manager, id).await;

        manager.restart(id).await.unwrap();

        assert!(matches!(
            manager.guidance(id).await.unwrap(),
            ArtifactState::Idle
        ));
        assert!(matches!(
            manager.audio(id).await.unwrap(),
            ArtifactState::Idle
        ));
        assert!(matches!(
            manager.question(id).await,
            Err(Error::Flow(FlowError::NoActiveFlow))
        ));

        // Language survives: the picker still localizes to French.
        let flows = manager.flows(id).await.unwrap();
        let family = flows.iter().find(|f| f.id == "family-based-petition").unwrap();
        assert_eq!(family.title, "Pétition Familiale");
    }

    #[tokio::test]
    async fn unknown_session_is_a_session_error() {
        let manager = manager_with(
            Catalog::bundled().unwrap(),
            StubGeneration::well_formed(),
            StubSpeech::immediate(),
        )
        .await;

        let result = manager.question(Uuid::new_v4()).await;
        assert!(matches!(result, Err(Error::Session(SessionError::Unknown { .. }))));
    }

    #[tokio::test]
    async fn unsupported_language_is_rejected_at_create() {
        let manager = manager_with(
            Catalog::bundled().unwrap(),
            StubGeneration::well_formed(),
            StubSpeech::immediate(),
        )
        .await;

        let result = manager.create("de").await;
        assert!(matches!(
            result,
            Err(Error::Request(crate::error::RequestError::UnsupportedLanguage { .. }))
        ));
    }

    #[tokio::test]
    async fn session_resurrects_from_the_store() {
        let store: Arc<dyn SessionStore> = Arc::new(LibSqlStore::new_memory().await.unwrap());
        let id = Uuid::new_v4();
        let result = GuidanceResult::parse(&serde_json::json!({
            "summaryText": "Persisted summary.",
            "checklistItems": ["Persisted step"],
            "officialLinks": [{"title": "USCIS", "url": "https://www.uscis.gov", "description": "site"}],
            "questionsToAsk": ["Persisted question?"]
        }))
        .unwrap();
        store
            .save(
                id,
                &PersistedSession {
                    language: Language::Zh,
                    flow_id: Some("family-based-petition".into()),
                    guidance: Some(result.clone()),
                },
            )
            .await
            .unwrap();

        // A fresh manager with the same store has never seen this session.
        let manager = SessionManager::new(
            Arc::new(Catalog::bundled().unwrap()),
            store,
            StubGeneration::well_formed(),
            StubSpeech::immediate(),
        );

        let state = manager.guidance(id).await.unwrap();
        assert_eq!(state.value(), Some(&result));
    }

    #[tokio::test]
    async fn missing_translation_falls_back_instead_of_failing() {
        // English-only catalog, deliberately not validated.
        let option = |value: &str| AnswerOption {
            value: value.into(),
            label: LocalizedText::english(value),
        };
        let catalog = Catalog::new(vec![Flow {
            id: "sparse".into(),
            title: LocalizedText::english("Sparse Flow"),
            questions: vec![Question {
                id: "only".into(),
                prompt: LocalizedText::english("Only question?"),
                options: vec![option("yes"), option("no")],
            }],
        }]);
        let manager = manager_with(
            catalog,
            StubGeneration::well_formed(),
            StubSpeech::immediate(),
        )
        .await;

        let id = manager.create("es").await.unwrap();
        let view = manager.select_flow(id, "sparse").await.unwrap();
        assert_eq!(view.prompt, "Only question?");
        assert_eq!(view.options[0].label, "yes");
    }

    #[tokio::test]
    async fn select_tab_validates_membership() {
        let manager = manager_with(
            Catalog::bundled().unwrap(),
            StubGeneration::well_formed(),
            StubSpeech::immediate(),
        )
        .await;

        let id = manager.create("en").await.unwrap();
        assert_eq!(
            manager.select_tab(id, "resources").await.unwrap(),
            ResultTab::Resources
        );
        assert!(manager.select_tab(id, "nope").await.is_err());
    }

    #[tokio::test]
    async fn back_to_exit_clears_the_interview() {
        let manager = manager_with(
            Catalog::bundled().unwrap(),
            StubGeneration::well_formed(),
            StubSpeech::immediate(),
        )
        .await;

        let id = manager.create("en").await.unwrap();
        manager.select_flow(id, "family-based-petition").await.unwrap();

        let nav = manager.go_back(id).await.unwrap();
        assert!(matches!(nav, BackNav::Exit));
        assert!(matches!(
            manager.question(id).await,
            Err(Error::Flow(FlowError::NoActiveFlow))
        ));
    }
}
