// Box-score game log: fixed-layout decoder for the per-game player source.
//
// The source carries two header rows followed by one line per player-game.
// Section labels ("Starters", "Reserves", "Did Not Play") are interleaved
// with real rows in the player-name column.

use crate::source::SourceError;
use crate::table::{parse_date, split_lines, CoercionPolicy};
use chrono::NaiveDate;
use csv::StringRecord;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Number of header rows preceding the first data line.
pub const HEADER_ROWS: usize = 2;

/// Player-name values that label a section instead of naming a player.
pub const SENTINEL_ROWS: [&str; 3] = ["Reserves", "Starters", "Did Not Play"];

/// Column offsets of the fixed layout.
pub mod column {
    pub const DATE: usize = 0;
    pub const TEAM: usize = 1;
    pub const OPPONENT: usize = 2;
    pub const PLAYER: usize = 3;
    pub const MINUTES: usize = 4;
    pub const FIELD_GOALS: usize = 5;
    pub const FIELD_GOAL_ATTEMPTS: usize = 6;
    pub const FIELD_GOAL_PERCENTAGE: usize = 7;
    pub const THREE_POINTERS: usize = 8;
    pub const THREE_POINT_ATTEMPTS: usize = 9;
    pub const THREE_POINT_PERCENTAGE: usize = 10;
    pub const FREE_THROWS: usize = 11;
    pub const FREE_THROW_ATTEMPTS: usize = 12;
    pub const FREE_THROW_PERCENTAGE: usize = 13;
    pub const OFFENSIVE_REBOUNDS: usize = 14;
    pub const DEFENSIVE_REBOUNDS: usize = 15;
    pub const TOTAL_REBOUNDS: usize = 16;
    pub const ASSISTS: usize = 17;
    pub const STEALS: usize = 18;
    pub const BLOCKS: usize = 19;
    pub const TURNOVERS: usize = 20;
    pub const PERSONAL_FOULS: usize = 21;
    pub const POINTS: usize = 22;
    pub const GAME_SCORE: usize = 23;
    pub const PLUS_MINUS: usize = 24;

    /// Minimum header width the layout requires.
    pub const WIDTH: usize = PLUS_MINUS + 1;

    /// Names the second header row must carry at each offset.
    pub const NAMES: [&str; WIDTH] = [
        "Date", "Team", "Opp", "Player", "MP", "FG", "FGA", "FG%", "3P", "3PA", "3P%", "FT", "FTA",
        "FT%", "ORB", "DRB", "TRB", "AST", "STL", "BLK", "TOV", "PF", "PTS", "GmSc", "+/-",
    ];
}

/// Numeric columns read under [`CoercionPolicy::ZeroDefault`].
const POLICY: CoercionPolicy = CoercionPolicy::ZeroDefault;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One player's appearance in one game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameRecord {
    pub date: NaiveDate,
    pub player: String,
    pub team: String,
    pub opponent: String,
    /// Seconds on court, from the `MM:SS` column.
    pub minutes_played: u32,
    pub points: f64,
    pub field_goals: f64,
    pub field_goal_attempts: f64,
    pub field_goal_percentage: f64,
    pub three_pointers: f64,
    pub three_point_attempts: f64,
    pub three_point_percentage: f64,
    pub free_throws: f64,
    pub free_throw_attempts: f64,
    pub free_throw_percentage: f64,
    pub offensive_rebounds: f64,
    pub defensive_rebounds: f64,
    pub total_rebounds: f64,
    pub assists: f64,
    pub steals: f64,
    pub blocks: f64,
    pub turnovers: f64,
    pub personal_fouls: f64,
    pub game_score: f64,
    pub plus_minus: f64,
}

/// Convert `MM:SS` to seconds. Anything malformed or missing is zero.
pub fn parse_minutes(value: &str) -> u32 {
    let Some((mins, secs)) = value.trim().split_once(':') else {
        return 0;
    };
    match (mins.trim().parse::<u32>(), secs.trim().parse::<u32>()) {
        (Ok(m), Ok(s)) => m.saturating_mul(60).saturating_add(s),
        _ => 0,
    }
}

/// Why a data line did not become a [`GameRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skip {
    Sentinel,
    NonAppearance,
    BadDate,
}

fn field(line: &StringRecord, index: usize) -> &str {
    line.get(index).map(str::trim).unwrap_or("")
}

fn num(line: &StringRecord, index: usize) -> f64 {
    POLICY.number(field(line, index)).unwrap_or(0.0)
}

/// Compare the column-name row against [`column::NAMES`].
fn check_header(header: &StringRecord) -> Result<(), SourceError> {
    if header.len() < column::WIDTH {
        return Err(SourceError::HeaderShape {
            expected: column::WIDTH,
            found: header.len(),
        });
    }
    for (index, &expected) in column::NAMES.iter().enumerate() {
        let found = field(header, index);
        if found != expected {
            return Err(SourceError::HeaderMismatch {
                column: index,
                expected,
                found: found.to_string(),
            });
        }
    }
    Ok(())
}

fn decode_line(line: &StringRecord) -> Result<GameRecord, Skip> {
    use column::*;

    let player = field(line, PLAYER);
    if player.is_empty() || SENTINEL_ROWS.contains(&player) {
        return Err(Skip::Sentinel);
    }

    let raw_date = field(line, DATE);
    let points = num(line, POINTS);
    if raw_date.is_empty() || points <= 0.0 {
        return Err(Skip::NonAppearance);
    }
    let date = parse_date(raw_date).ok_or(Skip::BadDate)?;

    Ok(GameRecord {
        date,
        player: player.to_string(),
        team: field(line, TEAM).to_string(),
        opponent: field(line, OPPONENT).to_string(),
        minutes_played: parse_minutes(field(line, MINUTES)),
        points,
        field_goals: num(line, FIELD_GOALS),
        field_goal_attempts: num(line, FIELD_GOAL_ATTEMPTS),
        field_goal_percentage: num(line, FIELD_GOAL_PERCENTAGE),
        three_pointers: num(line, THREE_POINTERS),
        three_point_attempts: num(line, THREE_POINT_ATTEMPTS),
        three_point_percentage: num(line, THREE_POINT_PERCENTAGE),
        free_throws: num(line, FREE_THROWS),
        free_throw_attempts: num(line, FREE_THROW_ATTEMPTS),
        free_throw_percentage: num(line, FREE_THROW_PERCENTAGE),
        offensive_rebounds: num(line, OFFENSIVE_REBOUNDS),
        defensive_rebounds: num(line, DEFENSIVE_REBOUNDS),
        total_rebounds: num(line, TOTAL_REBOUNDS),
        assists: num(line, ASSISTS),
        steals: num(line, STEALS),
        blocks: num(line, BLOCKS),
        turnovers: num(line, TURNOVERS),
        personal_fouls: num(line, PERSONAL_FOULS),
        game_score: num(line, GAME_SCORE),
        plus_minus: num(line, PLUS_MINUS),
    })
}

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

/// All materialised player-games, in source order, with a per-player index.
#[derive(Debug, Clone, Default)]
pub struct GameLog {
    games: Vec<GameRecord>,
    by_player: HashMap<String, Vec<usize>>,
}

impl GameLog {
    /// Decode the box-score text.
    ///
    /// Fails when the column-name header row does not match the fixed
    /// layout, since every offset would then read the wrong field. Text with
    /// fewer lines than the header block decodes to an empty log.
    pub fn parse(text: &str) -> Result<GameLog, SourceError> {
        let lines = split_lines(text);
        if lines.len() < HEADER_ROWS {
            debug!("game log has no data lines ({} lines total)", lines.len());
            return Ok(GameLog::default());
        }
        check_header(&lines[HEADER_ROWS - 1])?;

        let mut games = Vec::new();
        let (mut sentinels, mut absent, mut bad_dates) = (0usize, 0usize, 0usize);
        for line in &lines[HEADER_ROWS..] {
            match decode_line(line) {
                Ok(game) => games.push(game),
                Err(Skip::Sentinel) => sentinels += 1,
                Err(Skip::NonAppearance) => absent += 1,
                Err(Skip::BadDate) => {
                    warn!("skipping game row with unparseable date '{}'", field(line, column::DATE));
                    bad_dates += 1;
                }
            }
        }
        debug!(
            "game log decoded: {} games, {} section rows, {} non-appearances, {} bad dates",
            games.len(),
            sentinels,
            absent,
            bad_dates
        );

        Ok(GameLog::from_games(games))
    }

    pub fn from_games(games: Vec<GameRecord>) -> GameLog {
        let mut by_player: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, game) in games.iter().enumerate() {
            by_player.entry(game.player.clone()).or_default().push(i);
        }
        GameLog { games, by_player }
    }

    pub fn games(&self) -> &[GameRecord] {
        &self.games
    }

    /// A player's games in source order. Exact name match.
    pub fn games_for<'a>(&'a self, player: &str) -> impl Iterator<Item = &'a GameRecord> + 'a {
        self.by_player
            .get(player)
            .into_iter()
            .flatten()
            .map(|&i| &self.games[i])
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
