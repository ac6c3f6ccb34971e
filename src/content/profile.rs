// Learner profile captured on the preferences screen

use crate::accessibility::LearningMode;
use crate::content::transform::{Difficulty, FocusDuration, TransformProfile};
use crate::storage::{SessionStore, LEARNER_PROFILE_KEY};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioAssist {
    Yes,
    #[default]
    No,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LearnerProfile {
    pub mode: LearningMode,
    pub audio: AudioAssist,
    pub focus_duration: FocusDuration,
    pub difficulty: Difficulty,
}

impl LearnerProfile {
    /// Profile saved in this session, if any
    pub fn load(store: &SessionStore) -> Option<Self> {
        store.get_as(LEARNER_PROFILE_KEY)
    }

    pub fn save(&self, store: &mut SessionStore) {
        store.set_as(LEARNER_PROFILE_KEY, self);
    }

    /// Badge shown above an optimized lesson, e.g. "Optimized for: Dyslexia + Short focus"
    pub fn badge(&self) -> String {
        format!(
            "Optimized for: {} + {}",
            self.mode.label(),
            self.focus_duration.label()
        )
    }

    pub fn transform_profile(&self) -> TransformProfile {
        TransformProfile {
            focus_duration: Some(self.focus_duration),
            difficulty: Some(self.difficulty),
        }
    }
}
