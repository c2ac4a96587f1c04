// Plain-text rendering of dataset queries for the terminal.

use hoopcast_core::format::{format_optional, format_signed_pct, GameRow};
use hoopcast_core::quality::{ModelQualityEntry, ModelQualityIndex};
use hoopcast_core::{Dataset, LoadReport, PlayerView, SourceStatus, ViewOutcome};
use std::fmt::Write;

pub fn render_report(report: &LoadReport) -> String {
    let mut out = String::new();
    for (kind, status) in &report.sources {
        let _ = match status {
            SourceStatus::Loaded { rows } => writeln!(out, "{kind:<14} loaded ({rows} rows)"),
            SourceStatus::Unavailable { reason } => {
                writeln!(out, "{kind:<14} unavailable: {reason}")
            }
        };
    }
    out
}

pub fn render_dates(dataset: &Dataset) -> String {
    dataset
        .dates()
        .iter()
        .map(|d| format!("{}\n", d.format("%Y-%m-%d")))
        .collect()
}

pub fn render_players(players: &[&str]) -> String {
    players.iter().map(|p| format!("{p}\n")).collect()
}

pub fn render_outcome(outcome: &ViewOutcome) -> String {
    match outcome {
        ViewOutcome::NoPrediction { player, date } => {
            format!("No prediction available for {player} on {date}.\n")
        }
        ViewOutcome::Ready(view) => render_view(view),
    }
}

fn render_view(view: &PlayerView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}) vs {} on {}",
        view.player, view.team, view.opponent, view.date
    );
    if !view.played {
        let _ = writeln!(out, "Did not play.");
    }
    if view.averages.is_none() {
        let _ = writeln!(out, "No rolling averages available.");
    }

    let _ = writeln!(
        out,
        "\n{:<6} {:>9} {:>8} {:>8} {:>8}",
        "STAT", "PREDICTED", "AVG5", "AVG10", "ACTUAL"
    );
    for row in view.comparisons() {
        let _ = writeln!(
            out,
            "{:<6} {:>9.1} {:>8} {:>8} {:>8}",
            row.stat.short_label(),
            row.predicted,
            format_optional(row.avg5),
            format_optional(row.avg10),
            format_optional(row.actual),
        );
    }

    let _ = writeln!(out, "\nLast {} games:", view.recent.len());
    render_rows(&mut out, &view.recent_rows());
    let _ = writeln!(out, "\nLast {} games:", view.extended.len());
    render_rows(&mut out, &view.extended_rows());
    out
}

fn render_rows(out: &mut String, rows: &[GameRow]) {
    if rows.is_empty() {
        let _ = writeln!(out, "  (no prior games)");
        return;
    }
    let _ = writeln!(
        out,
        "{:>2} {:<10} {:<4} {:<4} {:>6} {:>5} {:>5} {:>5} {:>5} {:>5}",
        "#", "DATE", "TM", "OPP", "MP", "PTS", "TRB", "AST", "FG%", "+/-"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:>2} {:<10} {:<4} {:<4} {:>6} {:>5} {:>5} {:>5} {:>5} {:>5}",
            row.game_number,
            row.date,
            row.team,
            row.opponent,
            row.mp,
            row.pts,
            row.trb,
            row.ast,
            row.fg_pct,
            row.plus_minus
        );
    }
}

pub fn render_quality(quality: &ModelQualityIndex) -> String {
    if quality.is_empty() {
        return "No model-quality data available.\n".to_string();
    }
    let mut out = String::new();
    if let Some(overall) = quality.overall() {
        let _ = writeln!(out, "Overall:");
        render_quality_row(&mut out, "ALL", overall);
        out.push('\n');
    }
    let _ = writeln!(
        out,
        "{:<16} {:>9} {:>9} {:>8} {:>8} {:>7}",
        "STAT", "VS AVG5", "VS AVG10", "WIN5", "WIN10", "ERR"
    );
    for entry in quality.breakdown() {
        let label = entry
            .stat_key()
            .map_or(entry.stat.as_str(), |s| s.long_label());
        render_quality_row(&mut out, label, entry);
    }
    out
}

fn render_quality_row(out: &mut String, label: &str, entry: &ModelQualityEntry) {
    let pct = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.1}%"));
    let err = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.3}"));
    let _ = writeln!(
        out,
        "{:<16} {:>9} {:>9} {:>8} {:>8} {:>7}",
        label,
        format_signed_pct(entry.avg_improvement_vs_avg5_pct),
        format_signed_pct(entry.avg_improvement_vs_avg10_pct),
        pct(entry.success_rate_vs_avg5_pct),
        pct(entry.success_rate_vs_avg10_pct),
        err(entry.avg_model_error),
    );
}
