//! Result presentation state — the active tab and the audio artifact.

pub mod artifact;
pub mod narration;

use serde::{Deserialize, Serialize};

use crate::error::PresentationError;

pub use artifact::ArtifactState;
pub use narration::narration_script;

/// Which results tab is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultTab {
    Checklist,
    Resources,
    Questions,
}

impl Default for ResultTab {
    fn default() -> Self {
        Self::Checklist
    }
}

impl std::fmt::Display for ResultTab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Checklist => write!(f, "checklist"),
            Self::Resources => write!(f, "resources"),
            Self::Questions => write!(f, "questions"),
        }
    }
}

impl std::str::FromStr for ResultTab {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "checklist" => Ok(Self::Checklist),
            "resources" => Ok(Self::Resources),
            "questions" => Ok(Self::Questions),
            _ => Err(format!("Unknown tab: {s}")),
        }
    }
}

/// Per-session view state for the results page.
///
/// The audio artifact is ephemeral: derived on demand from a guidance
/// result, discarded whenever a new interview starts.
#[derive(Debug, Clone, Default)]
pub struct PresentationState {
    pub active_tab: ResultTab,
    pub audio: ArtifactState<String>,
}

impl PresentationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch tabs. The only validation is membership in the enum.
    pub fn select_tab(&mut self, name: &str) -> Result<ResultTab, PresentationError> {
        let tab: ResultTab = name.parse().map_err(|_| PresentationError::UnknownTab {
            name: name.to_string(),
        })?;
        self.active_tab = tab;
        Ok(tab)
    }

    /// Back to the default view with no audio.
    pub fn reset(&mut self) {
        self.active_tab = ResultTab::default();
        self.audio.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tab_is_checklist() {
        assert_eq!(PresentationState::new().active_tab, ResultTab::Checklist);
    }

    #[test]
    fn select_tab_accepts_members() {
        let mut state = PresentationState::new();
        assert_eq!(state.select_tab("resources").unwrap(), ResultTab::Resources);
        assert_eq!(state.active_tab, ResultTab::Resources);
        assert_eq!(state.select_tab("questions").unwrap(), ResultTab::Questions);
        assert_eq!(state.select_tab("checklist").unwrap(), ResultTab::Checklist);
    }

    #[test]
    fn select_tab_rejects_unknown_names() {
        let mut state = PresentationState::new();
        let result = state.select_tab("summary");
        assert!(matches!(result, Err(PresentationError::UnknownTab { .. })));
        assert_eq!(state.active_tab, ResultTab::Checklist);
    }

    #[test]
    fn display_matches_serde() {
        for tab in [ResultTab::Checklist, ResultTab::Resources, ResultTab::Questions] {
            let json = serde_json::to_string(&tab).unwrap();
            assert_eq!(json, format!("\"{tab}\""));
            assert_eq!(tab.to_string().parse::<ResultTab>().unwrap(), tab);
        }
    }

    #[test]
    fn reset_discards_audio_and_tab() {
        let mut state = PresentationState::new();
        state.select_tab("questions").unwrap();
        state.audio.begin();
        state.audio.succeed("https://cdn.example/audio.mp3".into());

        state.reset();
        assert_eq!(state.active_tab, ResultTab::Checklist);
        assert_eq!(state.audio, ArtifactState::Idle);
    }
}
