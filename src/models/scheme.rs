//! Government river-rejuvenation schemes.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemeScope {
    National,
    State,
    Local,
}

impl FromStr for SchemeScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "national" => Ok(Self::National),
            "state" => Ok(Self::State),
            "local" => Ok(Self::Local),
            other => Err(format!("unknown scheme scope '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheme {
    pub name: String,
    pub summary: String,
    pub scope: SchemeScope,
    /// Badge text, e.g. "Active" or "Ongoing".
    pub status: String,
    pub timeline: String,
    pub agency: String,
    /// Budget, coverage or participation figure shown in the third tile.
    pub scale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}
