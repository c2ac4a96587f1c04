// Stat keys shared by the prediction, averages, and model-quality sources.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the twelve tracked per-game performance fields.
///
/// Variant order is the display order used everywhere a stat set is listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Points,
    TotalRebounds,
    Assists,
    Steals,
    Blocks,
    Turnovers,
    FieldGoalPercentage,
    ThreePointPercentage,
    FreeThrowPercentage,
    MinutesPlayed,
    GameScore,
    PlusMinus,
}

impl Stat {
    pub const ALL: [Stat; 12] = [
        Stat::Points,
        Stat::TotalRebounds,
        Stat::Assists,
        Stat::Steals,
        Stat::Blocks,
        Stat::Turnovers,
        Stat::FieldGoalPercentage,
        Stat::ThreePointPercentage,
        Stat::FreeThrowPercentage,
        Stat::MinutesPlayed,
        Stat::GameScore,
        Stat::PlusMinus,
    ];

    /// Column-name fragment used by the CSV sources (`points`, `total_rebounds`, ...).
    pub fn key(self) -> &'static str {
        match self {
            Stat::Points => "points",
            Stat::TotalRebounds => "total_rebounds",
            Stat::Assists => "assists",
            Stat::Steals => "steals",
            Stat::Blocks => "blocks",
            Stat::Turnovers => "turnovers",
            Stat::FieldGoalPercentage => "field_goal_percentage",
            Stat::ThreePointPercentage => "three_point_percentage",
            Stat::FreeThrowPercentage => "free_throw_percentage",
            Stat::MinutesPlayed => "minutes_played",
            Stat::GameScore => "game_score",
            Stat::PlusMinus => "plus_minus",
        }
    }

    pub fn from_key(key: &str) -> Option<Stat> {
        Stat::ALL.into_iter().find(|s| s.key() == key.trim())
    }

    /// Box-score abbreviation (`PTS`, `3P%`, `+/-`).
    pub fn short_label(self) -> &'static str {
        match self {
            Stat::Points => "PTS",
            Stat::TotalRebounds => "TRB",
            Stat::Assists => "AST",
            Stat::Steals => "STL",
            Stat::Blocks => "BLK",
            Stat::Turnovers => "TOV",
            Stat::FieldGoalPercentage => "FG%",
            Stat::ThreePointPercentage => "3P%",
            Stat::FreeThrowPercentage => "FT%",
            Stat::MinutesPlayed => "MP",
            Stat::GameScore => "GmSc",
            Stat::PlusMinus => "+/-",
        }
    }

    pub fn long_label(self) -> &'static str {
        match self {
            Stat::Points => "Points",
            Stat::TotalRebounds => "Total Rebounds",
            Stat::Assists => "Assists",
            Stat::Steals => "Steals",
            Stat::Blocks => "Blocks",
            Stat::Turnovers => "Turnovers",
            Stat::FieldGoalPercentage => "Field Goal %",
            Stat::ThreePointPercentage => "Three Point %",
            Stat::FreeThrowPercentage => "Free Throw %",
            Stat::MinutesPlayed => "Minutes Played",
            Stat::GameScore => "Game Score",
            Stat::PlusMinus => "Plus/Minus",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The fixed set of twelve nullable stat values carried by a rolling average.
///
/// `None` means the value is unavailable (e.g. not enough prior games), which
/// is distinct from a real zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatBag {
    pub points: Option<f64>,
    pub total_rebounds: Option<f64>,
    pub assists: Option<f64>,
    pub steals: Option<f64>,
    pub blocks: Option<f64>,
    pub turnovers: Option<f64>,
    pub field_goal_percentage: Option<f64>,
    pub three_point_percentage: Option<f64>,
    pub free_throw_percentage: Option<f64>,
    pub minutes_played: Option<f64>,
    pub game_score: Option<f64>,
    pub plus_minus: Option<f64>,
}

impl StatBag {
    /// Build a bag by asking `value` for each stat in turn.
    pub fn from_fn(mut value: impl FnMut(Stat) -> Option<f64>) -> StatBag {
        StatBag {
            points: value(Stat::Points),
            total_rebounds: value(Stat::TotalRebounds),
            assists: value(Stat::Assists),
            steals: value(Stat::Steals),
            blocks: value(Stat::Blocks),
            turnovers: value(Stat::Turnovers),
            field_goal_percentage: value(Stat::FieldGoalPercentage),
            three_point_percentage: value(Stat::ThreePointPercentage),
            free_throw_percentage: value(Stat::FreeThrowPercentage),
            minutes_played: value(Stat::MinutesPlayed),
            game_score: value(Stat::GameScore),
            plus_minus: value(Stat::PlusMinus),
        }
    }

    pub fn get(&self, stat: Stat) -> Option<f64> {
        match stat {
            Stat::Points => self.points,
            Stat::TotalRebounds => self.total_rebounds,
            Stat::Assists => self.assists,
            Stat::Steals => self.steals,
            Stat::Blocks => self.blocks,
            Stat::Turnovers => self.turnovers,
            Stat::FieldGoalPercentage => self.field_goal_percentage,
            Stat::ThreePointPercentage => self.three_point_percentage,
            Stat::FreeThrowPercentage => self.free_throw_percentage,
            Stat::MinutesPlayed => self.minutes_played,
            Stat::GameScore => self.game_score,
            Stat::PlusMinus => self.plus_minus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_from_key() {
        for stat in Stat::ALL {
            assert_eq!(Stat::from_key(stat.key()), Some(stat));
        }
    }

    #[test]
    fn unknown_key_is_none() {
        assert_eq!(Stat::from_key("double_doubles"), None);
        assert_eq!(Stat::from_key(""), None);
    }

    #[test]
    fn labels() {
        assert_eq!(Stat::ThreePointPercentage.short_label(), "3P%");
        assert_eq!(Stat::PlusMinus.short_label(), "+/-");
        assert_eq!(Stat::TotalRebounds.long_label(), "Total Rebounds");
    }

    #[test]
    fn bag_get_matches_from_fn() {
        let bag = StatBag::from_fn(|s| Some(s as usize as f64));
        for stat in Stat::ALL {
            assert_eq!(bag.get(stat), Some(stat as usize as f64));
        }
    }

    #[test]
    fn stat_serializes_as_snake_case_key() {
        let json = serde_json::to_string(&Stat::FreeThrowPercentage).unwrap();
        assert_eq!(json, "\"free_throw_percentage\"");
    }
}
