//! River history records.
//!
//! All three sequences of a [`RiverHistory`] are expected in ascending year
//! order; the timeline lookups rely on iteration order for tie-breaking.

use serde::{Deserialize, Serialize};

// ---

/// Anything positioned on the river timeline.
pub trait Yearly {
    fn year(&self) -> i32;
}

/// Qualitative pollution level at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutionSnapshot {
    pub year: i32,
    pub level: String,
    pub description: String,
}

/// Water-quality measurement for one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterQuality {
    pub year: i32,
    pub ph: f64,
    /// Biochemical oxygen demand, mg/L.
    pub bod: f64,
    /// Dissolved oxygen, mg/L.
    #[serde(rename = "do")]
    pub dissolved_oxygen: f64,
    /// Fecal coliform, MPN/100ml.
    pub coliform: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConservationEffort {
    pub year: i32,
    pub name: String,
    pub impact: String,
}

impl Yearly for PollutionSnapshot {
    fn year(&self) -> i32 {
        self.year
    }
}

impl Yearly for WaterQuality {
    fn year(&self) -> i32 {
        self.year
    }
}

impl Yearly for ConservationEffort {
    fn year(&self) -> i32 {
        self.year
    }
}

/// Historical record of one river, keyed by a lowercase identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiverHistory {
    // ---
    pub key: String,
    pub name: String,
    pub description: String,
    pub historical_significance: String,
    pub pollution_history: Vec<PollutionSnapshot>,
    pub water_quality: Vec<WaterQuality>,
    pub conservation_efforts: Vec<ConservationEffort>,
}
