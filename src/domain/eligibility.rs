//! Eligibility verdicts for single-condition cross-venue matching.

use std::fmt;

use serde::Serialize;

/// Origin of an eligibility decision, in classifier priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EligibilitySource {
    #[serde(rename = "event-group")]
    EventGroup,
    #[serde(rename = "series-group")]
    SeriesGroup,
    #[serde(rename = "declared-field")]
    DeclaredField,
    #[serde(rename = "title_pattern")]
    TitlePattern,
    /// Nothing matched; eligible by default.
    #[serde(rename = "default")]
    Default,
}

impl EligibilitySource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EventGroup => "event-group",
            Self::SeriesGroup => "series-group",
            Self::DeclaredField => "declared-field",
            Self::TitlePattern => "title_pattern",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for EligibilitySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-candidate eligibility decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EligibilityVerdict {
    pub is_eligible: bool,
    pub source: EligibilitySource,
    pub reason: Option<String>,
}

impl EligibilityVerdict {
    /// Eligible with no reason: nothing flagged the candidate.
    #[must_use]
    pub const fn eligible() -> Self {
        Self {
            is_eligible: true,
            source: EligibilitySource::Default,
            reason: None,
        }
    }

    #[must_use]
    pub fn ineligible(source: EligibilitySource, reason: impl Into<String>) -> Self {
        Self {
            is_eligible: false,
            source,
            reason: Some(reason.into()),
        }
    }
}

impl Default for EligibilityVerdict {
    fn default() -> Self {
        Self::eligible()
    }
}
