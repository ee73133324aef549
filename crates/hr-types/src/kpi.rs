use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{money::parse_amount, validation::ValidationError};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiRecord {
    pub id: String,
    pub employee_id: String,
    pub employee_name: String,
    pub score: f64,
    pub target: f64,
    pub period: String,
    pub last_updated: String,
}

impl KpiRecord {
    /// score / target. A zero target yields an infinite or NaN ratio.
    pub fn ratio(&self) -> f64 {
        self.score / self.target
    }

    /// Progress shown next to the bar, rounded to whole percent.
    pub fn percentage(&self) -> f64 {
        (self.ratio() * 100.0).round()
    }

    /// Bar fill in whole percent, capped at 100; an undefined ratio shows as empty.
    pub fn progress(&self) -> f64 {
        let pct = self.percentage();
        if pct.is_nan() { 0.0 } else { pct.min(100.0) }
    }

    pub fn performance(&self) -> PerformanceLabel {
        PerformanceLabel::from_ratio(self.ratio())
    }
}

/// Performance bucket for a score/target ratio.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PerformanceLabel {
    Exceeding,
    OnTrack,
    NeedsAttention,
    BelowTarget,
}

impl PerformanceLabel {
    /// `r >= 1.0` Exceeding, `>= 0.8` On Track, `>= 0.6` Needs Attention,
    /// anything lower (including NaN) Below Target.
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= 1.0 {
            Self::Exceeding
        } else if ratio >= 0.8 {
            Self::OnTrack
        } else if ratio >= 0.6 {
            Self::NeedsAttention
        } else {
            Self::BelowTarget
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exceeding => "Exceeding",
            Self::OnTrack => "On Track",
            Self::NeedsAttention => "Needs Attention",
            Self::BelowTarget => "Below Target",
        }
    }
}

impl fmt::Display for PerformanceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Body of `PUT /kpi/:id`.
pub struct KpiScoreUpdate {
    pub score: f64,
}

/// Parse the score typed into the edit dialog.
pub fn parse_score(input: &str) -> Result<f64, ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::Required);
    }
    parse_amount(input).ok_or_else(|| ValidationError::InvalidFormat("score must be a number".to_string()))
}

#[cfg(test)]
#[path = "kpi_tests.rs"]
mod tests;
