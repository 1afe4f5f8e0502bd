use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "icetime-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_generates_roster_and_season_sheets() {
    let exe = env!("CARGO_BIN_EXE_icetime-sim");
    let data_dir = temp_path("data");
    let output = Command::new(exe)
        .args(["--teams", "4", "--seed", "11", "--workers", "2", "--data-dir"])
        .arg(&data_dir)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Icetime League Simulator"));
    assert!(stdout.contains("Season 0 Standings"));

    assert!(data_dir.join("roster.json").is_file());
    let players = std::fs::read_to_string(data_dir.join("season_0_player_stats.csv"))
        .expect("player sheet");
    assert_eq!(players.lines().count(), 1 + 24);
    let teams =
        std::fs::read_to_string(data_dir.join("season_0_team_stats.csv")).expect("team sheet");
    assert_eq!(teams.lines().count(), 1 + 4);
    let _ = std::fs::remove_dir_all(data_dir);
}

#[test]
fn cli_reuses_stored_roster_and_writes_json_report() {
    let exe = env!("CARGO_BIN_EXE_icetime-sim");
    let data_dir = temp_path("reuse");
    let report_path = temp_path("report.json");

    let first = Command::new(exe)
        .args(["--teams", "3", "--data-dir"])
        .arg(&data_dir)
        .status()
        .expect("run cli");
    assert!(first.success());

    let second = Command::new(exe)
        .args(["--teams", "8", "--seasons", "2", "--report", "json", "--data-dir"])
        .arg(&data_dir)
        .arg("--output")
        .arg(&report_path)
        .status()
        .expect("run cli");
    assert!(second.success());

    let content = std::fs::read_to_string(&report_path).expect("read report");
    let seasons: serde_json::Value = serde_json::from_str(&content).expect("json report");
    let seasons = seasons.as_array().expect("array of seasons");
    assert_eq!(seasons.len(), 2);
    assert_eq!(seasons[1]["year"], 1);
    assert_eq!(seasons[0]["standings"].as_array().map(Vec::len), Some(3));
    assert!(data_dir.join("season_1_team_stats.csv").is_file());

    let _ = std::fs::remove_dir_all(data_dir);
    let _ = std::fs::remove_file(report_path);
}

#[test]
fn cli_rejects_missing_config_file() {
    let exe = env!("CARGO_BIN_EXE_icetime-sim");
    let output = Command::new(exe)
        .args(["--config"])
        .arg(temp_path("absent.json"))
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read"));
}

#[test]
fn cli_logs_league_progress_when_enabled() {
    let exe = env!("CARGO_BIN_EXE_icetime-sim");
    let data_dir = temp_path("logged");
    let output = Command::new(exe)
        .env("RUST_LOG", "icetime_sim=info")
        .args(["--teams", "2", "--seed", "3", "--report", "json", "--data-dir"])
        .arg(&data_dir)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("league ready: seed 3"));
    assert!(stderr.contains("season 0 sheet written"));
    let _ = std::fs::remove_dir_all(data_dir);
}
