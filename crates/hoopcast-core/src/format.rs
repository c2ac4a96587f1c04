// Display formatting for history rows and model-quality figures.

use crate::game_log::GameRecord;
use serde::Serialize;

/// Seconds as `M:SS`.
pub fn format_minutes(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// `+1.23%` / `-0.50%`; `-` when absent.
pub fn format_signed_pct(value: Option<f64>) -> String {
    match value {
        Some(v) if v > 0.0 => format!("+{v:.2}%"),
        Some(v) => format!("{v:.2}%"),
        None => "-".to_string(),
    }
}

/// One decimal place, or `-` when absent.
pub fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"))
}

/// A history game laid out for a table row.
///
/// Shooting percentages arrive as fractions and are shown scaled to 0-100.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameRow {
    /// 1-based position within the window, oldest first.
    pub game_number: usize,
    pub date: String,
    pub team: String,
    pub opponent: String,
    pub mp: String,
    pub pts: String,
    pub trb: String,
    pub ast: String,
    pub stl: String,
    pub blk: String,
    pub tov: String,
    pub fg_pct: String,
    pub three_pct: String,
    pub ft_pct: String,
    pub gm_sc: String,
    pub plus_minus: String,
    /// Unformatted points, for charting.
    pub points: f64,
}

impl GameRow {
    pub fn new(game_number: usize, game: &GameRecord) -> GameRow {
        let one = |v: f64| format!("{v:.1}");
        let pct = |v: f64| format!("{:.1}", v * 100.0);
        GameRow {
            game_number,
            date: game.date.format("%Y-%m-%d").to_string(),
            team: game.team.clone(),
            opponent: game.opponent.clone(),
            mp: format_minutes(game.minutes_played),
            pts: one(game.points),
            trb: one(game.total_rebounds),
            ast: one(game.assists),
            stl: one(game.steals),
            blk: one(game.blocks),
            tov: one(game.turnovers),
            fg_pct: pct(game.field_goal_percentage),
            three_pct: pct(game.three_point_percentage),
            ft_pct: pct(game.free_throw_percentage),
            gm_sc: one(game.game_score),
            plus_minus: one(game.plus_minus),
            points: game.points,
        }
    }
}

/// Number the games of a window 1..=n in the order given.
pub fn game_rows<'a>(games: impl IntoIterator<Item = &'a GameRecord>) -> Vec<GameRow> {
    games
        .into_iter()
        .enumerate()
        .map(|(i, g)| GameRow::new(i + 1, g))
        .collect()
}
