//! Tracker configuration.

use serde::{Deserialize, Serialize};

use crate::Result;

/// Knobs for how the tracker presents its output.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Style attached to highlight decorations.
    pub highlight_class: String,
    /// Message for commits created by a revert; `{message}` is replaced by the reverted commit's message.
    pub revert_message: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            highlight_class: "blame-marker".to_string(),
            revert_message: "Revert '{message}'".to_string(),
        }
    }
}

impl TrackerConfig {
    pub fn from_json(json: &str) -> Result<TrackerConfig> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn revert_message_for(&self, message: &str) -> String {
        self.revert_message.replace("{message}", message)
    }
}
