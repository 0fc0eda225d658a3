//! Remote artifact lifecycle — one state machine for guidance and audio.

/// Lifecycle of a value produced by an external service.
///
/// `Idle → Loading → Ready | Failed`. Both remote artifacts (the guidance
/// result and the audio rendering) run on this machine, so their
/// transitions can be asserted independent of timing. Delivery methods
/// only act from `Loading`; a late outcome arriving after a reset is
/// silently discarded, which is what makes abandoned requests safe.
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> ArtifactState<T> {
    /// Try to start a request. Returns `false` without changing state when
    /// one is already in flight — the caller must then not issue a second
    /// request. A failed or ready artifact may be re-triggered.
    pub fn begin(&mut self) -> bool {
        if matches!(self, Self::Loading) {
            return false;
        }
        *self = Self::Loading;
        true
    }

    /// Deliver a successful outcome. Ignored (returns `false`) unless a
    /// request is in flight.
    pub fn succeed(&mut self, value: T) -> bool {
        if !matches!(self, Self::Loading) {
            return false;
        }
        *self = Self::Ready(value);
        true
    }

    /// Deliver a failure. Ignored unless a request is in flight.
    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        if !matches!(self, Self::Loading) {
            return false;
        }
        *self = Self::Failed(message.into());
        true
    }

    /// Drop whatever is held and return to `Idle`. Any outstanding
    /// request's eventual outcome will be discarded.
    pub fn reset(&mut self) {
        *self = Self::Idle;
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Wire name of the current state.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready(_) => "ready",
            Self::Failed(_) => "failed",
        }
    }
}

impl<T> Default for ArtifactState<T> {
    fn default() -> Self {
        Self::Idle
    }
}
