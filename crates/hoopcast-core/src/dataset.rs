// Dataset loading: fetch the four sources in order, degrade any failure to
// an empty collection, and expose the built indices read-only.

use crate::averages::AveragesIndex;
use crate::game_log::GameLog;
use crate::predictions::PredictionIndex;
use crate::quality::ModelQualityIndex;
use crate::source::{SourceError, SourceFetcher};
use crate::view::{self, ViewOutcome, Windows};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Source identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Predictions,
    GameLog,
    Averages,
    ModelQuality,
}

impl SourceKind {
    /// Load order. Each stage runs whether or not the previous one failed.
    pub const LOAD_ORDER: [SourceKind; 4] = [
        SourceKind::Predictions,
        SourceKind::GameLog,
        SourceKind::Averages,
        SourceKind::ModelQuality,
    ];
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            SourceKind::Predictions => "predictions",
            SourceKind::GameLog => "game log",
            SourceKind::Averages => "averages",
            SourceKind::ModelQuality => "model quality",
        })
    }
}

/// Resource names handed to the fetcher, one per source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceNames {
    pub predictions: String,
    pub game_log: String,
    pub averages: String,
    pub model_quality: String,
}

impl SourceNames {
    pub fn name(&self, kind: SourceKind) -> &str {
        match kind {
            SourceKind::Predictions => &self.predictions,
            SourceKind::GameLog => &self.game_log,
            SourceKind::Averages => &self.averages,
            SourceKind::ModelQuality => &self.model_quality,
        }
    }
}

impl Default for SourceNames {
    fn default() -> Self {
        SourceNames {
            predictions: "frontend_predictions.csv".into(),
            game_log: "nba_2025_all_players_full_season_all_games.csv".into(),
            averages: "player_averages_for_frontend.csv".into(),
            model_quality: "model_improvement_analysis.csv".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Load report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceStatus {
    /// Parsed; `rows` counts the records the index holds.
    Loaded { rows: usize },
    /// Fetch or decode failed; the source is empty.
    Unavailable { reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    pub sources: Vec<(SourceKind, SourceStatus)>,
}

impl LoadReport {
    pub fn status(&self, kind: SourceKind) -> Option<&SourceStatus> {
        self.sources.iter().find(|(k, _)| *k == kind).map(|(_, s)| s)
    }

    /// True when no source loaded.
    pub fn all_failed(&self) -> bool {
        self.sources
            .iter()
            .all(|(_, s)| matches!(s, SourceStatus::Unavailable { .. }))
    }
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// Raw text for each source. `None` stands for a source that could not be
/// obtained.
#[derive(Debug, Clone, Default)]
pub struct SourceTexts<'a> {
    pub predictions: Option<&'a str>,
    pub game_log: Option<&'a str>,
    pub averages: Option<&'a str>,
    pub model_quality: Option<&'a str>,
}

impl<'a> SourceTexts<'a> {
    fn get(&self, kind: SourceKind) -> Option<&'a str> {
        match kind {
            SourceKind::Predictions => self.predictions,
            SourceKind::GameLog => self.game_log,
            SourceKind::Averages => self.averages,
            SourceKind::ModelQuality => self.model_quality,
        }
    }
}

/// All indices from one load. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    predictions: PredictionIndex,
    games: GameLog,
    averages: AveragesIndex,
    quality: ModelQualityIndex,
    report: LoadReport,
}

impl Dataset {
    /// Fetch and index every source, strictly in [`SourceKind::LOAD_ORDER`].
    ///
    /// Never fails: a source that cannot be fetched or decoded is logged and
    /// left empty.
    pub async fn load(fetcher: &dyn SourceFetcher, names: &SourceNames) -> Dataset {
        let mut dataset = Dataset::default();
        for kind in SourceKind::LOAD_ORDER {
            let name = names.name(kind);
            let fetched = fetcher.fetch(name).await;
            dataset.ingest(kind, fetched);
        }
        dataset.log_summary();
        dataset
    }

    /// Index already-fetched text. No I/O.
    pub fn from_texts(texts: SourceTexts<'_>) -> Dataset {
        let mut dataset = Dataset::default();
        for kind in SourceKind::LOAD_ORDER {
            let fetched = texts.get(kind).map(str::to_string).ok_or_else(|| SourceError::NotFound {
                name: kind.to_string(),
            });
            dataset.ingest(kind, fetched);
        }
        dataset.log_summary();
        dataset
    }

    fn ingest(&mut self, kind: SourceKind, fetched: Result<String, SourceError>) {
        let status = match fetched.and_then(|text| self.build(kind, &text)) {
            Ok(rows) => {
                info!("loaded {} source: {} rows", kind, rows);
                SourceStatus::Loaded { rows }
            }
            Err(e) => {
                if kind == SourceKind::ModelQuality && e.is_not_found() {
                    info!("{} source not present, continuing without it", kind);
                } else {
                    warn!("{} source unavailable, continuing with it empty: {}", kind, e);
                }
                SourceStatus::Unavailable {
                    reason: e.to_string(),
                }
            }
        };
        self.report.sources.push((kind, status));
    }

    fn build(&mut self, kind: SourceKind, text: &str) -> Result<usize, SourceError> {
        Ok(match kind {
            SourceKind::Predictions => {
                self.predictions = PredictionIndex::parse(text);
                self.predictions.entry_count()
            }
            SourceKind::GameLog => {
                self.games = GameLog::parse(text)?;
                self.games.len()
            }
            SourceKind::Averages => {
                self.averages = AveragesIndex::parse(text);
                self.averages.len()
            }
            SourceKind::ModelQuality => {
                self.quality = ModelQualityIndex::parse(text);
                self.quality.len()
            }
        })
    }

    fn log_summary(&self) {
        if self.report.all_failed() {
            warn!("no source loaded; selection will be empty");
        } else {
            info!(
                "dataset ready: {} prediction groups, {} games, {} averages, {} quality rows",
                self.predictions.len(),
                self.games.len(),
                self.averages.len(),
                self.quality.len()
            );
        }
    }

    pub fn predictions(&self) -> &PredictionIndex {
        &self.predictions
    }

    pub fn games(&self) -> &GameLog {
        &self.games
    }

    pub fn averages(&self) -> &AveragesIndex {
        &self.averages
    }

    pub fn quality(&self) -> &ModelQualityIndex {
        &self.quality
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.predictions.dates()
    }

    pub fn players(&self) -> Vec<&str> {
        self.predictions.players()
    }

    pub fn search_players(&self, query: &str, limit: usize) -> Vec<&str> {
        self.predictions.search_players(query, limit)
    }

    /// Compose the view for a selection with the default 5/10 windows.
    pub fn compose(&self, player: &str, date: NaiveDate) -> ViewOutcome {
        self.compose_with(player, date, Windows::default())
    }

    pub fn compose_with(&self, player: &str, date: NaiveDate, windows: Windows) -> ViewOutcome {
        view::compose(
            &self.predictions,
            &self.averages,
            &self.games,
            player,
            date,
            windows,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryFetcher;

    const PREDICTIONS: &str = "\
player_name,date,stat,predicted,actual,difference,played,team,opponent
X,2025-04-01,points,22.3,25,2.7,True,LAL,BOS";

    const QUALITY: &str = "\
stat,avg_improvement_vs_avg5_pct,avg_improvement_vs_avg10_pct,success_rate_vs_avg5_pct,success_rate_vs_avg10_pct,avg_model_error,avg_avg5_error,avg_avg10_error
OVERALL,1,1,50,50,1,1,1";

    #[tokio::test]
    async fn loads_what_it_can_and_reports_the_rest() {
        let names = SourceNames::default();
        let fetcher = MemoryFetcher::new()
            .with(names.predictions.clone(), PREDICTIONS)
            .with(names.game_log.clone(), "Date,Team\nDate,Team\n")
            .with(names.model_quality.clone(), QUALITY);

        let dataset = Dataset::load(&fetcher, &names).await;
        let report = dataset.report();
        let kinds: Vec<SourceKind> = report.sources.iter().map(|(k, _)| *k).collect();
        assert_eq!(kinds, SourceKind::LOAD_ORDER.to_vec());

        assert_eq!(
            report.status(SourceKind::Predictions),
            Some(&SourceStatus::Loaded { rows: 1 })
        );
        // Narrow header degrades the game log without stopping later stages.
        assert!(matches!(
            report.status(SourceKind::GameLog),
            Some(SourceStatus::Unavailable { .. })
        ));
        assert!(matches!(
            report.status(SourceKind::Averages),
            Some(SourceStatus::Unavailable { .. })
        ));
        assert_eq!(
            report.status(SourceKind::ModelQuality),
            Some(&SourceStatus::Loaded { rows: 1 })
        );
        assert!(!report.all_failed());

        assert!(dataset.games().is_empty());
        assert!(dataset.quality().overall().is_some());
        let date = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let outcome = dataset.compose("X", date);
        let view = outcome.view().unwrap();
        assert!(view.averages.is_none());
        assert!(view.recent.is_empty());
    }

    #[tokio::test]
    async fn nothing_available_is_an_empty_dataset() {
        let dataset = Dataset::load(&MemoryFetcher::new(), &SourceNames::default()).await;
        assert!(dataset.report().all_failed());
        assert!(dataset.dates().is_empty());
        assert!(dataset.players().is_empty());
        assert!(dataset.quality().is_empty());
    }

    #[test]
    fn from_texts_matches_missing_quality_behaviour() {
        let dataset = Dataset::from_texts(SourceTexts {
            predictions: Some(PREDICTIONS),
            ..Default::default()
        });
        assert_eq!(dataset.quality().len(), 0);
        assert!(dataset.quality().overall().is_none());
        let date = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        assert!(dataset.compose("X", date).view().is_some());
        assert_eq!(dataset.search_players("x", 10), vec!["X"]);
    }
}
