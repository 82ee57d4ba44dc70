//! Multi-field filters for map reports and forum discussions.
//!
//! A filter is a set of criteria combined with logical AND. Each criterion
//! can be inactive (the "all" sentinel, an empty query, a full severity
//! range), in which case it never excludes an item. Filtering is recomputed
//! on every request; nothing is cached.

use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{DiscussionSummary, PollutionReport, PollutionType, Severity};

// ---

/// Criteria applied to a slice of items, keeping input order.
pub trait Criteria<T> {
    fn matches(&self, item: &T) -> bool;

    fn apply<'a>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}

/// Either "all" or one specific value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Selector<T> {
    #[default]
    Any,
    Only(T),
}

impl<T> Selector<T> {
    pub fn is_any(&self) -> bool {
        matches!(self, Selector::Any)
    }

    fn admits(&self, pred: impl FnOnce(&T) -> bool) -> bool {
        match self {
            Selector::Any => true,
            Selector::Only(v) => pred(v),
        }
    }
}

impl Selector<String> {
    /// `None`, blank and `"all"` select everything.
    pub fn parse(raw: Option<&str>) -> Self {
        // ---
        match raw.map(str::trim) {
            None | Some("") => Selector::Any,
            Some(v) if v.eq_ignore_ascii_case("all") => Selector::Any,
            Some(v) => Selector::Only(v.to_string()),
        }
    }
}

/// Inclusive severity bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeverityRange {
    lo: Severity,
    hi: Severity,
}

impl SeverityRange {
    /// Bounds given in either order are normalised so `lo <= hi`.
    pub fn new(a: Severity, b: Severity) -> Self {
        Self {
            lo: a.min(b),
            hi: a.max(b),
        }
    }

    pub fn contains(&self, s: Severity) -> bool {
        self.lo <= s && s <= self.hi
    }

    pub fn bounds(&self) -> (Severity, Severity) {
        (self.lo, self.hi)
    }
}

impl Default for SeverityRange {
    fn default() -> Self {
        Self::new(Severity::MIN, Severity::MAX)
    }
}

/// Reporting period relative to an "as of" date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    #[default]
    All,
    Today,
    Week,
    Month,
    Year,
}

impl TimeRange {
    fn window_days(&self) -> Option<i64> {
        match self {
            Self::All => None,
            Self::Today => Some(0),
            Self::Week => Some(7),
            Self::Month => Some(30),
            Self::Year => Some(365),
        }
    }

    /// Whether `date` falls in `[as_of - window, as_of]`.
    pub fn admits(&self, date: NaiveDate, as_of: NaiveDate) -> bool {
        // ---
        match self.window_days() {
            None => true,
            Some(days) => date <= as_of && date >= as_of - Duration::days(days),
        }
    }
}

impl std::str::FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "today" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(format!("unknown time range '{other}'")),
        }
    }
}

/// Map sidebar filters.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportFilter {
    pub river: Selector<String>,
    pub pollution_type: Selector<PollutionType>,
    pub severity: SeverityRange,
    pub verified_only: bool,
    pub time_range: TimeRange,
    pub as_of: NaiveDate,
}

impl Default for ReportFilter {
    fn default() -> Self {
        // ---
        Self {
            river: Selector::Any,
            pollution_type: Selector::Any,
            severity: SeverityRange::default(),
            verified_only: false,
            time_range: TimeRange::All,
            as_of: Utc::now().date_naive(),
        }
    }
}

impl Criteria<PollutionReport> for ReportFilter {
    fn matches(&self, r: &PollutionReport) -> bool {
        // ---
        self.river.admits(|river| r.river.eq_ignore_ascii_case(river))
            && self.pollution_type.admits(|t| r.pollution_type == *t)
            && self.severity.contains(r.severity)
            && (!self.verified_only || r.verified)
            && self.time_range.admits(r.date, self.as_of)
    }
}

/// Raw query parameters for report filtering, as sent by the map screen.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub river: Option<String>,
    #[serde(rename = "type")]
    pub pollution_type: Option<String>,
    pub severity_min: Option<i64>,
    pub severity_max: Option<i64>,
    pub verified_only: Option<bool>,
    pub time_range: Option<String>,
    pub as_of: Option<NaiveDate>,
}

impl ReportQuery {
    /// Interpret the parameters; out-of-range severities are clamped.
    pub fn to_filter(&self) -> Result<ReportFilter> {
        // ---
        let pollution_type = match Selector::parse(self.pollution_type.as_deref()) {
            Selector::Any => Selector::Any,
            Selector::Only(raw) => Selector::Only(
                raw.parse::<PollutionType>()
                    .map_err(|e| AppError::validation("Invalid filter", e))?,
            ),
        };

        let time_range = self
            .time_range
            .as_deref()
            .unwrap_or("all")
            .parse::<TimeRange>()
            .map_err(|e| AppError::validation("Invalid filter", e))?;

        let lo = self.severity_min.map_or(Severity::MIN, Severity::saturating);
        let hi = self.severity_max.map_or(Severity::MAX, Severity::saturating);

        Ok(ReportFilter {
            river: Selector::parse(self.river.as_deref()),
            pollution_type,
            severity: SeverityRange::new(lo, hi),
            verified_only: self.verified_only.unwrap_or(false),
            time_range,
            as_of: self.as_of.unwrap_or_else(|| Utc::now().date_naive()),
        })
    }
}

/// Forum search box plus category and tag filters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiscussionFilter {
    pub query: String,
    pub category: Selector<String>,
    pub tag: Option<String>,
}

impl Criteria<DiscussionSummary> for DiscussionFilter {
    fn matches(&self, d: &DiscussionSummary) -> bool {
        // ---
        let query = self.query.trim().to_lowercase();
        let text_ok = query.is_empty()
            || d.title.to_lowercase().contains(&query)
            || d.category.to_lowercase().contains(&query)
            || d.tags.iter().any(|t| t.to_lowercase().contains(&query));

        let tag_ok = match self.tag.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(tag) => {
                let tag = tag.to_lowercase();
                d.tags.iter().any(|t| t.to_lowercase().contains(&tag))
            }
        };

        text_ok && tag_ok && self.category.admits(|c| d.category.eq_ignore_ascii_case(c))
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::catalog::Catalog;

    fn ids<T>(items: &[&T], id: impl Fn(&T) -> u32) -> Vec<u32> {
        items.iter().map(|i| id(*i)).collect()
    }

    fn sev(level: u8) -> Severity {
        Severity::new(level).unwrap()
    }

    #[test]
    fn test_inactive_report_filter_is_identity() {
        // ---
        let catalog = Catalog::seeded();
        let kept = ReportFilter::default().apply(&catalog.reports);
        assert_eq!(kept.len(), catalog.reports.len());
        assert_eq!(ids(&kept, |r: &PollutionReport| r.id), [1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_ganga_severity_three_to_five() {
        // ---
        let catalog = Catalog::seeded();
        let filter = ReportFilter {
            river: Selector::Only("Ganga".into()),
            severity: SeverityRange::new(sev(3), sev(5)),
            ..ReportFilter::default()
        };

        let kept = filter.apply(&catalog.reports);
        assert_eq!(ids(&kept, |r: &PollutionReport| r.id), [2]);
    }

    #[test]
    fn test_every_criterion_combination_is_a_conjunction() {
        // ---
        let catalog = Catalog::seeded();
        let rivers = [None, Some("Yamuna"), Some("Ganga"), Some("Krishna")];
        let types = [None, Some(PollutionType::Industrial), Some(PollutionType::Oil)];

        for river in rivers {
            for t in types {
                for lo in 1..=5u8 {
                    for hi in lo..=5u8 {
                        for verified_only in [false, true] {
                            let filter = ReportFilter {
                                river: river.map_or(Selector::Any, |r| Selector::Only(r.into())),
                                pollution_type: t.map_or(Selector::Any, Selector::Only),
                                severity: SeverityRange::new(sev(lo), sev(hi)),
                                verified_only,
                                ..ReportFilter::default()
                            };
                            let kept = filter.apply(&catalog.reports);

                            for r in &catalog.reports {
                                let expected = river.map_or(true, |v| r.river == v)
                                    && t.map_or(true, |v| r.pollution_type == v)
                                    && (lo..=hi).contains(&r.severity.level())
                                    && (!verified_only || r.verified);
                                assert_eq!(kept.iter().any(|k| k.id == r.id), expected);
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_time_range_window() {
        // ---
        let catalog = Catalog::seeded();
        let as_of = NaiveDate::from_ymd_opt(2023, 4, 20).unwrap();

        let week = ReportFilter {
            time_range: TimeRange::Week,
            as_of,
            ..ReportFilter::default()
        };
        assert_eq!(ids(&week.apply(&catalog.reports), |r: &PollutionReport| r.id), [1, 4]);

        let today = ReportFilter {
            time_range: TimeRange::Today,
            as_of,
            ..ReportFilter::default()
        };
        assert_eq!(ids(&today.apply(&catalog.reports), |r: &PollutionReport| r.id), [4]);

        let month = ReportFilter {
            time_range: TimeRange::Month,
            as_of,
            ..ReportFilter::default()
        };
        assert_eq!(month.apply(&catalog.reports).len(), 5);
    }

    #[test]
    fn test_query_parsing() {
        // ---
        let q = ReportQuery {
            river: Some("all".into()),
            pollution_type: Some("sewage".into()),
            severity_min: Some(5),
            severity_max: Some(0),
            ..ReportQuery::default()
        };
        let f = q.to_filter().unwrap();
        assert!(f.river.is_any());
        assert_eq!(f.pollution_type, Selector::Only(PollutionType::Sewage));
        assert_eq!(f.severity.bounds(), (Severity::MIN, Severity::MAX));

        let bad = ReportQuery {
            pollution_type: Some("lava".into()),
            ..ReportQuery::default()
        };
        assert!(matches!(bad.to_filter(), Err(AppError::Validation { .. })));
    }

    #[test]
    fn test_discussion_search_is_case_insensitive_or_across_fields() {
        // ---
        let catalog = Catalog::seeded();
        let search = |q: &str| DiscussionFilter {
            query: q.into(),
            ..DiscussionFilter::default()
        };

        // title
        let kept = search("JUHU").apply(&catalog.recent_discussions);
        assert_eq!(ids(&kept, |d: &DiscussionSummary| d.id), [2]);

        // category
        let kept = search("government").apply(&catalog.recent_discussions);
        assert_eq!(ids(&kept, |d: &DiscussionSummary| d.id), [4]);

        // tag
        let kept = search("plastic-w").apply(&catalog.recent_discussions);
        assert_eq!(ids(&kept, |d: &DiscussionSummary| d.id), [5]);

        // blank query keeps everything
        assert_eq!(search("   ").apply(&catalog.recent_discussions).len(), 5);
        assert!(search("zzz").apply(&catalog.popular_discussions).is_empty());
    }

    #[test]
    fn test_discussion_category_and_tag() {
        // ---
        let catalog = Catalog::seeded();
        let filter = DiscussionFilter {
            query: String::new(),
            category: Selector::parse(Some("Technology & Innovation")),
            tag: Some("tech".into()),
        };
        let kept = filter.apply(&catalog.popular_discussions);
        assert_eq!(ids(&kept, |d: &DiscussionSummary| d.id), [10]);

        let industrial = DiscussionFilter {
            tag: Some("industrial".into()),
            ..DiscussionFilter::default()
        };
        let kept = industrial.apply(&catalog.popular_discussions);
        assert_eq!(ids(&kept, |d: &DiscussionSummary| d.id), [8]);
    }
}
