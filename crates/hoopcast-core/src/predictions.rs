// Prediction index: per-(player, date) sets of per-stat model predictions.

use crate::stat::Stat;
use crate::table::{parse_table, CoercionPolicy, RawRecord};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, warn};

/// The prediction source keeps non-numeric literals as text.
pub const POLICY: CoercionPolicy = CoercionPolicy::PreserveLiterals;

/// A model prediction for one stat in one game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionEntry {
    pub player: String,
    pub date: NaiveDate,
    pub stat: Stat,
    pub predicted: f64,
    pub actual: Option<f64>,
    pub difference: Option<f64>,
    pub played: bool,
    pub team: String,
    pub opponent: String,
}

/// Every prediction made for one player on one date.
///
/// `played`, `team`, and `opponent` come from the first row of the group.
/// A set may exist with `played == false`, in which case actuals are
/// usually absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionSet {
    pub player: String,
    pub date: NaiveDate,
    pub played: bool,
    pub team: String,
    pub opponent: String,
    pub entries: BTreeMap<Stat, PredictionEntry>,
}

impl PredictionSet {
    pub fn get(&self, stat: Stat) -> Option<&PredictionEntry> {
        self.entries.get(&stat)
    }

    /// Entries in stat order.
    pub fn iter(&self) -> impl Iterator<Item = &PredictionEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lookup from (player, date) to that game's [`PredictionSet`].
#[derive(Debug, Clone, Default)]
pub struct PredictionIndex {
    sets: HashMap<String, BTreeMap<NaiveDate, PredictionSet>>,
    dates: BTreeSet<NaiveDate>,
    entry_count: usize,
}

impl PredictionIndex {
    pub fn parse(text: &str) -> PredictionIndex {
        Self::from_records(&parse_table(text, POLICY))
    }

    pub fn from_records(records: &[RawRecord]) -> PredictionIndex {
        let mut index = PredictionIndex::default();
        let (mut unkeyed, mut unknown_stats) = (0usize, 0usize);

        for record in records {
            let (Some(player), Some(date)) = (record.text("player_name"), record.date("date")) else {
                unkeyed += 1;
                continue;
            };

            let set = index
                .sets
                .entry(player.clone())
                .or_default()
                .entry(date)
                .or_insert_with(|| PredictionSet {
                    player: player.clone(),
                    date,
                    played: record.get("played").is_some_and(|v| v.is_truthy_flag()),
                    team: record.text("team").unwrap_or_default(),
                    opponent: record.text("opponent").unwrap_or_default(),
                    entries: BTreeMap::new(),
                });
            index.dates.insert(date);

            let Some(stat_key) = record.text("stat") else {
                continue;
            };
            let Some(stat) = Stat::from_key(&stat_key) else {
                debug!("ignoring prediction for unknown stat '{}'", stat_key);
                unknown_stats += 1;
                continue;
            };

            let entry = PredictionEntry {
                player,
                date,
                stat,
                predicted: record.number("predicted").unwrap_or(0.0),
                actual: record.number("actual"),
                difference: record.number("difference"),
                played: set.played,
                team: set.team.clone(),
                opponent: set.opponent.clone(),
            };
            if set.entries.insert(stat, entry).is_none() {
                index.entry_count += 1;
            }
        }

        if unkeyed > 0 {
            warn!("skipped {} prediction rows without a player or valid date", unkeyed);
        }
        if unknown_stats > 0 {
            debug!("skipped {} prediction rows with unknown stats", unknown_stats);
        }
        index
    }

    pub fn get(&self, player: &str, date: NaiveDate) -> Option<&PredictionSet> {
        self.sets.get(player)?.get(&date)
    }

    /// Distinct prediction dates, ascending.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.dates.iter().copied().collect()
    }

    /// Distinct player names, sorted.
    pub fn players(&self) -> Vec<&str> {
        let mut players: Vec<&str> = self.sets.keys().map(String::as_str).collect();
        players.sort_unstable();
        players
    }

    /// Case-insensitive substring search over [`players`](Self::players).
    pub fn search_players(&self, query: &str, limit: usize) -> Vec<&str> {
        let needle = query.to_lowercase();
        self.players()
            .into_iter()
            .filter(|p| p.to_lowercase().contains(&needle))
            .take(limit)
            .collect()
    }

    /// Number of (player, date) groups.
    pub fn len(&self) -> usize {
        self.sets.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Number of per-stat entries across all groups.
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }
}
