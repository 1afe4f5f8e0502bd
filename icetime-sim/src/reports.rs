use anyhow::{Context, Result};
use colored::Colorize;
use icetime_game::numbers::{ratio, round_hundredths};
use icetime_game::{LeaderRow, SeasonSummary, StandingsRow};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Leaders shown per season in the console report.
pub const CONSOLE_LEADERS: usize = 10;

#[derive(Debug, Serialize)]
struct PlayerCsvRow<'a> {
    id: u32,
    name: &'a str,
    team: &'a str,
    games: u32,
    goals: u32,
    assists: u32,
    points: u32,
    shots: u32,
    faceoffs: u32,
    faceoffs_won: u32,
    faceoff_pct: f64,
}

impl<'a> From<&'a LeaderRow> for PlayerCsvRow<'a> {
    fn from(row: &'a LeaderRow) -> Self {
        Self {
            id: row.competitor.0,
            name: &row.name,
            team: &row.team,
            games: row.line.games,
            goals: row.line.goals,
            assists: row.line.assists,
            points: row.points,
            shots: row.line.shots,
            faceoffs: row.line.faceoffs,
            faceoffs_won: row.line.faceoffs_won,
            faceoff_pct: round_hundredths(ratio(row.line.faceoffs_won, row.line.faceoffs)),
        }
    }
}

#[derive(Debug, Serialize)]
struct TeamCsvRow<'a> {
    team: &'a str,
    games: u32,
    wins: u32,
    losses: u32,
    overtime_losses: u32,
    points: u32,
    goals_for: u32,
    goals_against: u32,
}

impl<'a> From<&'a StandingsRow> for TeamCsvRow<'a> {
    fn from(row: &'a StandingsRow) -> Self {
        Self {
            team: &row.team,
            games: row.games,
            wins: row.record.wins,
            losses: row.record.losses,
            overtime_losses: row.record.overtime_losses,
            points: row.points,
            goals_for: row.record.goals_for,
            goals_against: row.record.goals_against,
        }
    }
}

pub fn player_stats_path(dir: &Path, year: u32) -> PathBuf {
    dir.join(format!("season_{year}_player_stats.csv"))
}

pub fn team_stats_path(dir: &Path, year: u32) -> PathBuf {
    dir.join(format!("season_{year}_team_stats.csv"))
}

pub fn write_player_csv<W: Write>(writer: W, leaders: &[LeaderRow]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in leaders {
        csv.serialize(PlayerCsvRow::from(row))?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_team_csv<W: Write>(writer: W, standings: &[StandingsRow]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in standings {
        csv.serialize(TeamCsvRow::from(row))?;
    }
    csv.flush()?;
    Ok(())
}

/// Write both stat sheets for one season and return their paths.
pub fn write_season_sheets(dir: &Path, summary: &SeasonSummary) -> Result<[PathBuf; 2]> {
    let players = player_stats_path(dir, summary.year);
    let file = std::fs::File::create(&players)
        .with_context(|| format!("failed to create {}", players.display()))?;
    write_player_csv(file, &summary.leaders)
        .with_context(|| format!("failed to write {}", players.display()))?;

    let teams = team_stats_path(dir, summary.year);
    let file = std::fs::File::create(&teams)
        .with_context(|| format!("failed to create {}", teams.display()))?;
    write_team_csv(file, &summary.standings)
        .with_context(|| format!("failed to write {}", teams.display()))?;
    Ok([players, teams])
}

pub fn generate_console_report<W: Write>(
    out: &mut W,
    seasons: &[SeasonSummary],
    total_duration: Duration,
) -> Result<()> {
    for summary in seasons {
        writeln!(out)?;
        writeln!(
            out,
            "{}",
            format!("🏒 Season {} Standings", summary.year)
                .bright_cyan()
                .bold()
        )?;
        writeln!(out, "{}", "=".repeat(30).cyan())?;
        writeln!(
            out,
            "{:<4} {:<20} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4}",
            "#", "Team", "GP", "W", "L", "OTL", "PTS", "GF", "GA"
        )?;
        for (rank, row) in summary.standings.iter().enumerate() {
            let line = format!(
                "{:<4} {:<20} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4}",
                rank + 1,
                row.team,
                row.games,
                row.record.wins,
                row.record.losses,
                row.record.overtime_losses,
                row.points,
                row.record.goals_for,
                row.record.goals_against
            );
            if rank == 0 {
                writeln!(out, "{}", line.green())?;
            } else {
                writeln!(out, "{line}")?;
            }
        }

        writeln!(out)?;
        writeln!(out, "{}", "⭐ Scoring Leaders".bright_yellow().bold())?;
        writeln!(out, "{}", "-".repeat(30).yellow())?;
        writeln!(
            out,
            "{:<14} {:<10} {:>3} {:>3} {:>3} {:>4} {:>4}",
            "Player", "Team", "GP", "G", "A", "PTS", "SOG"
        )?;
        for row in summary.leaders.iter().take(CONSOLE_LEADERS) {
            writeln!(
                out,
                "{:<14} {:<10} {:>3} {:>3} {:>3} {:>4} {:>4}",
                row.name,
                row.team,
                row.line.games,
                row.line.goals,
                row.line.assists,
                row.points,
                row.line.shots
            )?;
        }

        let overtime = summary.results.iter().filter(|r| r.overtime).count();
        writeln!(out)?;
        writeln!(
            out,
            "Matches played: {} ({} decided in overtime)",
            summary.results.len(),
            overtime
        )?;
    }
    writeln!(out)?;
    writeln!(out, "🏁 Total time: {total_duration:?}")?;
    Ok(())
}

pub fn generate_json_report<W: Write>(out: &mut W, seasons: &[SeasonSummary]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, seasons)?;
    writeln!(out)?;
    Ok(())
}

/// Player sheet of the latest season; earlier seasons are in the per-season files.
pub fn generate_csv_report<W: Write>(out: &mut W, seasons: &[SeasonSummary]) -> Result<()> {
    match seasons.last() {
        Some(summary) => write_player_csv(out, &summary.leaders),
        None => Ok(()),
    }
}
