// Drives config loading, fetching, and command output together against the
// core fixture CSVs, the way the binary wires them.

use std::fs;
use std::path::{Path, PathBuf};

use hoopcast_app::cli::{self, Command};
use hoopcast_app::config::{self, CONFIG_FILE};
use hoopcast_core::{Dataset, FileFetcher};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("hoopcast-core")
        .join("tests")
        .join("fixtures")
}

/// A base dir whose config points a file source at the fixtures.
fn base_dir(name: &str) -> PathBuf {
    let tmp = std::env::temp_dir().join(name);
    let _ = fs::remove_dir_all(&tmp);
    fs::create_dir_all(tmp.join("config")).unwrap();
    let text = format!(
        r#"
[sources]
kind = "file"
root = "{}"
predictions = "predictions.csv"
game_log = "game_log.csv"
averages = "averages.csv"
model_quality = "model_quality.csv"

[view]
short_window = 3
long_window = 6
search_limit = 5
"#,
        fixtures_dir().display()
    );
    fs::write(tmp.join("config").join(CONFIG_FILE), text).unwrap();
    tmp
}

async fn run(base: &Path, command: Command) -> String {
    let config = config::load_config(base).unwrap();
    let fetcher = FileFetcher::new(base.join(&config.sources.root));
    let dataset = Dataset::load(&fetcher, &config.sources.names).await;
    cli::run(&command, &dataset, &config.view).unwrap()
}

#[tokio::test]
async fn lists_dates_and_players() {
    let base = base_dir("hoopcast_cmd_lists");
    assert_eq!(run(&base, Command::Dates).await, "2025-03-30\n2025-04-01\n");
    assert_eq!(
        run(&base, Command::Players { search: None }).await,
        "Jalen Brunson\nLeBron James\nNikola Jokic\n"
    );
    assert_eq!(
        run(
            &base,
            Command::Players {
                search: Some("nikola".into())
            }
        )
        .await,
        "Nikola Jokic\n"
    );
    let _ = fs::remove_dir_all(&base);
}

#[tokio::test]
async fn show_uses_configured_windows() {
    let base = base_dir("hoopcast_cmd_show");
    let text = run(
        &base,
        Command::Show {
            player: "LeBron James".into(),
            date: "2025-04-01".into(),
            json: true,
        },
    )
    .await;
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["status"], "ready");
    assert_eq!(value["recent"].as_array().unwrap().len(), 3);
    assert_eq!(value["extended"].as_array().unwrap().len(), 6);

    let text = run(
        &base,
        Command::Show {
            player: "LeBron James".into(),
            date: "2025-04-01".into(),
            json: false,
        },
    )
    .await;
    assert!(text.starts_with("LeBron James (LAL) vs BOS on 2025-04-01"));
    assert!(text.contains("Last 3 games:"));
    assert!(text.contains("Last 6 games:"));
    let _ = fs::remove_dir_all(&base);
}

#[tokio::test]
async fn quality_and_status() {
    let base = base_dir("hoopcast_cmd_quality");
    let quality = run(&base, Command::Quality).await;
    assert!(quality.contains("Overall:"));
    assert!(quality.contains("+3.18%"));
    assert!(quality.contains("Total Rebounds"));

    let status = run(&base, Command::Status).await;
    assert_eq!(status.lines().count(), 4);
    assert!(status.lines().all(|l| l.contains("loaded")));
    let _ = fs::remove_dir_all(&base);
}

#[tokio::test]
async fn missing_data_gives_empty_selection() {
    let base = base_dir("hoopcast_cmd_missing");
    let text = fs::read_to_string(base.join("config").join(CONFIG_FILE)).unwrap();
    let text = text.replace(&fixtures_dir().display().to_string(), "no-such-dir");
    fs::write(base.join("config").join(CONFIG_FILE), text).unwrap();

    assert_eq!(run(&base, Command::Dates).await, "");
    assert_eq!(run(&base, Command::Players { search: None }).await, "");
    assert_eq!(
        run(&base, Command::Quality).await,
        "No model-quality data available.\n"
    );
    let status = run(&base, Command::Status).await;
    assert!(status.lines().all(|l| l.contains("unavailable")));
    let _ = fs::remove_dir_all(&base);
}
