// View composition: everything presentation needs for one (player, date)
// selection, bundled from the indices and the history selector.

use crate::averages::{AveragesEntry, AveragesIndex};
use crate::format::{game_rows, GameRow};
use crate::game_log::{GameLog, GameRecord};
use crate::history;
use crate::predictions::{PredictionIndex, PredictionSet};
use crate::stat::Stat;
use chrono::NaiveDate;
use serde::Serialize;

/// History window sizes for the short and long views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Windows {
    pub short: usize,
    pub long: usize,
}

impl Default for Windows {
    fn default() -> Self {
        Windows { short: 5, long: 10 }
    }
}

/// Result of composing a view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ViewOutcome {
    /// No prediction group exists for the selection. This is not the same
    /// as a player who did not play, which still has a group.
    NoPrediction { player: String, date: NaiveDate },
    Ready(Box<PlayerView>),
}

impl ViewOutcome {
    pub fn view(&self) -> Option<&PlayerView> {
        match self {
            ViewOutcome::Ready(view) => Some(view),
            ViewOutcome::NoPrediction { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub player: String,
    pub date: NaiveDate,
    pub played: bool,
    pub team: String,
    pub opponent: String,
    pub predictions: PredictionSet,
    /// `None` when no averages row exists for the selection.
    pub averages: Option<AveragesEntry>,
    pub recent: Vec<GameRecord>,
    pub extended: Vec<GameRecord>,
}

/// Prediction, averages, and outcome for one stat side by side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatComparison {
    pub stat: Stat,
    pub predicted: f64,
    pub actual: Option<f64>,
    pub avg5: Option<f64>,
    pub avg10: Option<f64>,
    pub model_error: Option<f64>,
    pub avg5_error: Option<f64>,
    pub avg10_error: Option<f64>,
}

fn abs_error(estimate: Option<f64>, actual: Option<f64>) -> Option<f64> {
    Some((estimate? - actual?).abs())
}

impl PlayerView {
    /// One comparison per predicted stat, in stat order.
    pub fn comparisons(&self) -> Vec<StatComparison> {
        self.predictions
            .iter()
            .map(|entry| {
                let avg5 = self.averages.as_ref().and_then(|a| a.avg5.get(entry.stat));
                let avg10 = self.averages.as_ref().and_then(|a| a.avg10.get(entry.stat));
                StatComparison {
                    stat: entry.stat,
                    predicted: entry.predicted,
                    actual: entry.actual,
                    avg5,
                    avg10,
                    model_error: abs_error(Some(entry.predicted), entry.actual),
                    avg5_error: abs_error(avg5, entry.actual),
                    avg10_error: abs_error(avg10, entry.actual),
                }
            })
            .collect()
    }

    pub fn recent_rows(&self) -> Vec<GameRow> {
        game_rows(&self.recent)
    }

    pub fn extended_rows(&self) -> Vec<GameRow> {
        game_rows(&self.extended)
    }
}

/// Build the view for one selection. Pure read of the indices.
pub fn compose(
    predictions: &PredictionIndex,
    averages: &AveragesIndex,
    games: &GameLog,
    player: &str,
    date: NaiveDate,
    windows: Windows,
) -> ViewOutcome {
    let Some(set) = predictions.get(player, date) else {
        return ViewOutcome::NoPrediction {
            player: player.to_string(),
            date,
        };
    };

    let window = |size: usize| -> Vec<GameRecord> {
        history::select(games, player, date, size)
            .into_iter()
            .cloned()
            .collect()
    };

    ViewOutcome::Ready(Box::new(PlayerView {
        player: set.player.clone(),
        date,
        played: set.played,
        team: set.team.clone(),
        opponent: set.opponent.clone(),
        predictions: set.clone(),
        averages: averages.get(player, date).cloned(),
        recent: window(windows.short),
        extended: window(windows.long),
    }))
}
