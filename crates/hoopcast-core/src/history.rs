// History selection: the most recent games a player played before a date.

use crate::game_log::{GameLog, GameRecord};
use chrono::NaiveDate;

/// Up to `window` of `player`'s games dated strictly before `anchor`,
/// oldest first.
///
/// Newest first with a stable sort, cut to `window`, then reversed. When a
/// same-date tie straddles the window boundary the earlier source row is
/// kept, and tied games come out in reverse source order.
pub fn select<'a>(
    log: &'a GameLog,
    player: &str,
    anchor: NaiveDate,
    window: usize,
) -> Vec<&'a GameRecord> {
    let mut prior: Vec<&GameRecord> = log.games_for(player).filter(|g| g.date < anchor).collect();
    prior.sort_by(|a, b| b.date.cmp(&a.date));
    prior.truncate(window);
    prior.reverse();
    prior
}
