use crate::form::FormError;
use crate::text::capitalize_first;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Tone modifier sent with the screenshot to steer the generated reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[default]
    Casual,
    Friendly,
    Flirty,
    Random,
}

impl Mood {
    /// Every selectable mood, in display order.
    pub const ALL: [Mood; 4] = [Mood::Casual, Mood::Friendly, Mood::Flirty, Mood::Random];

    /// Wire value for the `mood` form field.
    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Casual => "casual",
            Mood::Friendly => "friendly",
            Mood::Flirty => "flirty",
            Mood::Random => "random",
        }
    }

    pub fn label(self) -> String {
        capitalize_first(self.as_str())
    }

    pub fn icon(self) -> &'static str {
        match self {
            Mood::Casual => "coffee",
            Mood::Friendly => "smile",
            Mood::Flirty => "heart",
            Mood::Random => "sparkles",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| FormError::UnknownMood(s.to_string()))
    }
}
