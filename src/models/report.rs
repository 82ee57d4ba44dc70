//! Pollution report model.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---

/// Geographic coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Kind of pollution observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollutionType {
    Industrial,
    Sewage,
    Agricultural,
    Plastic,
    Chemical,
    Oil,
    Other,
}

impl PollutionType {
    pub const ALL: [PollutionType; 7] = [
        Self::Industrial,
        Self::Sewage,
        Self::Agricultural,
        Self::Plastic,
        Self::Chemical,
        Self::Oil,
        Self::Other,
    ];

    /// Human readable label used in report cards and select boxes.
    pub fn label(&self) -> &'static str {
        // ---
        match self {
            Self::Industrial => "Industrial Waste",
            Self::Sewage => "Sewage Discharge",
            Self::Agricultural => "Agricultural Runoff",
            Self::Plastic => "Plastic Waste",
            Self::Chemical => "Chemical Pollution",
            Self::Oil => "Oil Spill",
            Self::Other => "Other",
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Industrial => "industrial",
            Self::Sewage => "sewage",
            Self::Agricultural => "agricultural",
            Self::Plastic => "plastic",
            Self::Chemical => "chemical",
            Self::Oil => "oil",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PollutionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PollutionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // ---
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown pollution type '{s}'"))
    }
}

/// Pollution intensity rating, 1 (minor) to 5 (critical).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Severity(u8);

impl Severity {
    pub const MIN: Severity = Severity(1);
    pub const MAX: Severity = Severity(5);

    /// Default slider position on the report form.
    pub const MODERATE: Severity = Severity(3);

    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0)
            .contains(&level)
            .then_some(Self(level))
    }

    /// Clamp an arbitrary integer into the valid range.
    pub fn saturating(level: i64) -> Self {
        Self(level.clamp(Self::MIN.0 as i64, Self::MAX.0 as i64) as u8)
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    /// Marker and badge colour for this severity.
    pub fn color(&self) -> SeverityColor {
        // ---
        match self.0 {
            5 => SeverityColor::Red,
            4 => SeverityColor::Orange,
            3 => SeverityColor::Amber,
            2 => SeverityColor::Yellow,
            _ => SeverityColor::Green,
        }
    }

    /// Legend text, e.g. "Severity 5 (Critical)".
    pub fn legend_label(&self) -> String {
        // ---
        let name = match self.0 {
            5 => "Critical",
            4 => "High",
            3 => "Medium",
            2 => "Low",
            _ => "Minor",
        };
        format!("Severity {} ({})", self.0, name)
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::MODERATE
    }
}

impl TryFrom<u8> for Severity {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level).ok_or_else(|| format!("severity must be between 1 and 5, got {level}"))
    }
}

impl From<Severity> for u8 {
    fn from(s: Severity) -> u8 {
        s.0
    }
}

/// Palette used for severity markers and legend swatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityColor {
    Red,
    Orange,
    Amber,
    Yellow,
    Green,
}

impl SeverityColor {
    /// Utility class name, e.g. `bg-red-500`.
    pub fn class(&self) -> &'static str {
        // ---
        match self {
            Self::Red => "bg-red-500",
            Self::Orange => "bg-orange-500",
            Self::Amber => "bg-amber-500",
            Self::Yellow => "bg-yellow-500",
            Self::Green => "bg-green-500",
        }
    }

    pub fn hex(&self) -> &'static str {
        // ---
        match self {
            Self::Red => "#ef4444",
            Self::Orange => "#f97316",
            Self::Amber => "#f59e0b",
            Self::Yellow => "#eab308",
            Self::Green => "#22c55e",
        }
    }
}

/// A citizen-submitted pollution report as shown on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollutionReport {
    // ---
    pub id: u32,
    pub river: String,
    pub location: String,
    pub coordinates: GeoPoint,
    #[serde(rename = "type")]
    pub pollution_type: PollutionType,
    pub severity: Severity,
    pub date: NaiveDate,
    pub verified: bool,
    pub description: String,
    pub reported_by: String,
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_severity_bounds() {
        // ---
        assert!(Severity::new(0).is_none());
        assert!(Severity::new(6).is_none());
        assert_eq!(Severity::new(1), Some(Severity::MIN));
        assert_eq!(Severity::new(5), Some(Severity::MAX));

        assert_eq!(Severity::saturating(-3), Severity::MIN);
        assert_eq!(Severity::saturating(42), Severity::MAX);
    }

    #[test]
    fn test_severity_rejects_out_of_range_json() {
        // ---
        let err = serde_json::from_str::<Severity>("9");
        assert!(err.is_err());

        let ok: Severity = serde_json::from_str("4").unwrap();
        assert_eq!(ok.level(), 4);
    }

    #[test]
    fn test_severity_colors() {
        // ---
        let hex: Vec<&str> = (1..=5)
            .map(|l| Severity::new(l).unwrap().color().hex())
            .collect();
        assert_eq!(hex, ["#22c55e", "#eab308", "#f59e0b", "#f97316", "#ef4444"]);
        assert_eq!(Severity::MAX.color().class(), "bg-red-500");
        assert_eq!(Severity::MAX.legend_label(), "Severity 5 (Critical)");
    }

    #[test]
    fn test_pollution_type_parse_and_label() {
        // ---
        assert_eq!("Industrial".parse::<PollutionType>(), Ok(PollutionType::Industrial));
        assert_eq!(PollutionType::Oil.label(), "Oil Spill");
        assert!("lava".parse::<PollutionType>().is_err());
    }
}
