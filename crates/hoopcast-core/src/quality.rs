// Model-quality summary: how the model's errors compare with the 5- and
// 10-game averages, per stat and overall.

use crate::stat::Stat;
use crate::table::{parse_table, CoercionPolicy, RawRecord};
use serde::Serialize;
use tracing::{debug, warn};

pub const POLICY: CoercionPolicy = CoercionPolicy::NoneAsNull;

/// `stat` value of the aggregate row.
pub const OVERALL: &str = "OVERALL";

/// Direction of a signed improvement figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improvement,
    Regression,
}

impl Trend {
    /// Strictly positive is an improvement; zero and below are not.
    pub fn classify(value: f64) -> Trend {
        if value > 0.0 {
            Trend::Improvement
        } else {
            Trend::Regression
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelQualityEntry {
    pub stat: String,
    pub avg_improvement_vs_avg5_pct: Option<f64>,
    pub avg_improvement_vs_avg10_pct: Option<f64>,
    pub success_rate_vs_avg5_pct: Option<f64>,
    pub success_rate_vs_avg10_pct: Option<f64>,
    pub avg_model_error: Option<f64>,
    pub avg_avg5_error: Option<f64>,
    pub avg_avg10_error: Option<f64>,
}

impl ModelQualityEntry {
    fn from_record(stat: String, record: &RawRecord) -> Self {
        ModelQualityEntry {
            stat,
            avg_improvement_vs_avg5_pct: record.number("avg_improvement_vs_avg5_pct"),
            avg_improvement_vs_avg10_pct: record.number("avg_improvement_vs_avg10_pct"),
            success_rate_vs_avg5_pct: record.number("success_rate_vs_avg5_pct"),
            success_rate_vs_avg10_pct: record.number("success_rate_vs_avg10_pct"),
            avg_model_error: record.number("avg_model_error"),
            avg_avg5_error: record.number("avg_avg5_error"),
            avg_avg10_error: record.number("avg_avg10_error"),
        }
    }

    pub fn is_overall(&self) -> bool {
        self.stat == OVERALL
    }

    /// The stat this row describes; `None` for the aggregate or unknown keys.
    pub fn stat_key(&self) -> Option<Stat> {
        Stat::from_key(&self.stat)
    }

    pub fn trend_vs_avg5(&self) -> Option<Trend> {
        self.avg_improvement_vs_avg5_pct.map(Trend::classify)
    }

    pub fn trend_vs_avg10(&self) -> Option<Trend> {
        self.avg_improvement_vs_avg10_pct.map(Trend::classify)
    }
}

/// Per-stat breakdown rows in source order, plus the single aggregate.
#[derive(Debug, Clone, Default)]
pub struct ModelQualityIndex {
    breakdown: Vec<ModelQualityEntry>,
    overall: Option<ModelQualityEntry>,
}

impl ModelQualityIndex {
    pub fn parse(text: &str) -> ModelQualityIndex {
        Self::from_records(&parse_table(text, POLICY))
    }

    pub fn from_records(records: &[RawRecord]) -> ModelQualityIndex {
        let mut index = ModelQualityIndex::default();
        let mut unkeyed = 0usize;

        for record in records {
            let Some(stat) = record.text("stat") else {
                unkeyed += 1;
                continue;
            };
            let entry = ModelQualityEntry::from_record(stat, record);
            if entry.is_overall() {
                if index.overall.is_some() {
                    debug!("ignoring repeated {} row", OVERALL);
                    continue;
                }
                index.overall = Some(entry);
            } else {
                index.breakdown.push(entry);
            }
        }

        if unkeyed > 0 {
            warn!("skipped {} model-quality rows without a stat", unkeyed);
        }
        index
    }

    pub fn overall(&self) -> Option<&ModelQualityEntry> {
        self.overall.as_ref()
    }

    /// Per-stat rows, excluding the aggregate.
    pub fn breakdown(&self) -> &[ModelQualityEntry] {
        &self.breakdown
    }

    /// First breakdown row for `stat`.
    pub fn get(&self, stat: Stat) -> Option<&ModelQualityEntry> {
        self.breakdown.iter().find(|e| e.stat_key() == Some(stat))
    }

    /// Rows held, the aggregate included.
    pub fn len(&self) -> usize {
        self.breakdown.len() + usize::from(self.overall.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "stat,avg_improvement_vs_avg5_pct,avg_improvement_vs_avg10_pct,success_rate_vs_avg5_pct,success_rate_vs_avg10_pct,avg_model_error,avg_avg5_error,avg_avg10_error";

    #[test]
    fn splits_overall_from_breakdown() {
        let idx = ModelQualityIndex::parse(&format!(
            "{HEADER}
points,4.25,-1.5,55.0,48.2,0.21,0.23,0.2
assists,0,2.1,50.0,52.0,0.3,0.3,0.31
OVERALL,3.1,1.2,53.5,51.0,0.25,0.27,0.26"
        ));
        assert_eq!(idx.len(), 3);
        assert_eq!(idx.breakdown().len(), 2);
        assert_eq!(idx.breakdown()[0].stat, "points");
        assert_eq!(idx.breakdown()[1].stat, "assists");

        let overall = idx.overall().unwrap();
        assert!(overall.is_overall());
        assert_eq!(overall.avg_improvement_vs_avg5_pct, Some(3.1));
        assert_eq!(overall.stat_key(), None);
    }

    #[test]
    fn raw_signed_values_and_trends() {
        let idx = ModelQualityIndex::parse(&format!(
            "{HEADER}
points,4.25,-1.5,55.0,48.2,0.21,0.23,0.2
assists,0,2.1,50.0,52.0,0.3,0.3,0.31"
        ));
        let points = idx.get(Stat::Points).unwrap();
        assert_eq!(points.avg_improvement_vs_avg10_pct, Some(-1.5));
        assert_eq!(points.trend_vs_avg5(), Some(Trend::Improvement));
        assert_eq!(points.trend_vs_avg10(), Some(Trend::Regression));

        // Zero is not an improvement.
        let assists = idx.get(Stat::Assists).unwrap();
        assert_eq!(assists.trend_vs_avg5(), Some(Trend::Regression));
    }

    #[test]
    fn none_and_empty_are_null() {
        let idx = ModelQualityIndex::parse(&format!("{HEADER}\nsteals,None,,50,None,0.1,,"));
        let steals = idx.get(Stat::Steals).unwrap();
        assert_eq!(steals.avg_improvement_vs_avg5_pct, None);
        assert_eq!(steals.avg_improvement_vs_avg10_pct, None);
        assert_eq!(steals.success_rate_vs_avg5_pct, Some(50.0));
        assert_eq!(steals.avg_avg10_error, None);
        assert_eq!(steals.trend_vs_avg5(), None);
        assert!(idx.overall().is_none());
    }

    #[test]
    fn empty_source_has_no_entries() {
        let idx = ModelQualityIndex::parse("");
        assert!(idx.is_empty());
        assert_eq!(idx.len(), 0);
        assert!(idx.overall().is_none());
        assert!(idx.get(Stat::Points).is_none());
    }

    #[test]
    fn rows_without_stat_are_skipped() {
        let idx = ModelQualityIndex::parse(&format!("{HEADER}\n,1,1,1,1,1,1,1\nNone,1,1,1,1,1,1,1"));
        assert!(idx.is_empty());
    }
}
