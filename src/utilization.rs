use crate::workload::WEEKLY_CAPACITY_HOURS;
use serde::{Deserialize, Serialize};

/// Percentage of weekly capacity the given hours represent.
pub fn load_percentage(hours: f64) -> f64 {
    hours / WEEKLY_CAPACITY_HOURS * 100.0
}

/// Banded classification of a weekly hours value against capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilizationBand {
    Empty,
    Underutilized,
    Moderate,
    Optimal,
    Overloaded,
    Critical,
}

impl UtilizationBand {
    /// Band for a weekly hours value. Boundaries read exactly as the
    /// thresholds: 50% is Moderate, 100% is Optimal, 125% is Overloaded.
    pub fn classify(hours: f64) -> Self {
        if hours == 0.0 {
            return UtilizationBand::Empty;
        }
        let percentage = load_percentage(hours);
        if percentage < 50.0 {
            UtilizationBand::Underutilized
        } else if percentage < 80.0 {
            UtilizationBand::Moderate
        } else if percentage <= 100.0 {
            UtilizationBand::Optimal
        } else if percentage <= 125.0 {
            UtilizationBand::Overloaded
        } else {
            UtilizationBand::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UtilizationBand::Empty => "empty",
            UtilizationBand::Underutilized => "underutilized",
            UtilizationBand::Moderate => "moderate",
            UtilizationBand::Optimal => "optimal",
            UtilizationBand::Overloaded => "overloaded",
            UtilizationBand::Critical => "critical",
        }
    }

    /// Heatmap cell color; distinct per band.
    pub fn hex_color(&self) -> &'static str {
        match self {
            UtilizationBand::Empty => "#f5f5f5",
            UtilizationBand::Underutilized => "#a8e6cf",
            UtilizationBand::Moderate => "#ffd93d",
            UtilizationBand::Optimal => "#6bcf7f",
            UtilizationBand::Overloaded => "#ff9f43",
            UtilizationBand::Critical => "#ee5a6f",
        }
    }
}
