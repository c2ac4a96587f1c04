// Rolling 5- and 10-game averages keyed by (player, date).

use crate::stat::{Stat, StatBag};
use crate::table::{parse_table, CoercionPolicy, RawRecord};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

pub const POLICY: CoercionPolicy = CoercionPolicy::NoneAsNull;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AveragesEntry {
    pub player: String,
    pub date: NaiveDate,
    pub avg5: StatBag,
    pub avg10: StatBag,
}

fn bag(record: &RawRecord, window: u32) -> StatBag {
    StatBag::from_fn(|stat: Stat| record.number(&format!("avg_{window}_{}", stat.key())))
}

#[derive(Debug, Clone, Default)]
pub struct AveragesIndex {
    entries: HashMap<String, BTreeMap<NaiveDate, AveragesEntry>>,
}

impl AveragesIndex {
    pub fn parse(text: &str) -> AveragesIndex {
        Self::from_records(&parse_table(text, POLICY))
    }

    /// One entry per row. When a (player, date) repeats, the first row is kept.
    pub fn from_records(records: &[RawRecord]) -> AveragesIndex {
        let mut entries: HashMap<String, BTreeMap<NaiveDate, AveragesEntry>> = HashMap::new();
        let (mut unkeyed, mut duplicates) = (0usize, 0usize);

        for record in records {
            let (Some(player), Some(date)) = (record.text("player_name"), record.date("date")) else {
                unkeyed += 1;
                continue;
            };
            let by_date = entries.entry(player.clone()).or_default();
            if by_date.contains_key(&date) {
                duplicates += 1;
                continue;
            }
            by_date.insert(
                date,
                AveragesEntry {
                    player,
                    date,
                    avg5: bag(record, 5),
                    avg10: bag(record, 10),
                },
            );
        }

        if unkeyed > 0 {
            warn!("skipped {} averages rows without a player or valid date", unkeyed);
        }
        if duplicates > 0 {
            debug!("ignored {} duplicate averages rows", duplicates);
        }
        AveragesIndex { entries }
    }

    /// `None` means no averages exist for this game, which callers must show
    /// as absent rather than as zeros.
    pub fn get(&self, player: &str, date: NaiveDate) -> Option<&AveragesEntry> {
        self.entries.get(player)?.get(&date)
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
