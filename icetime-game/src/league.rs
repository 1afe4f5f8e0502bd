//! Round-robin scheduling, parallel match execution and season tables.
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::boxscore::StatLine;
use crate::config::LeagueConfig;
use crate::constants::{POINTS_PER_OVERTIME_LOSS, POINTS_PER_WIN};
use crate::error::SimError;
use crate::game::{MatchManager, MatchResult, validate_roster};
use crate::rink::ZoneGraph;
use crate::rng::{derive_match_seed, derive_schedule_seed};
use crate::roster::{Competitor, CompetitorId, Team};
use crate::state::Side;

/// One scheduled match, identified by team names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pairing {
    pub home: String,
    pub away: String,
}

/// Every unordered pair of teams once, with random home/away and random order.
pub fn generate_schedule<R: Rng + ?Sized>(teams: &[Team], rng: &mut R) -> Vec<Pairing> {
    let mut schedule = Vec::with_capacity(teams.len() * teams.len().saturating_sub(1) / 2);
    for (i, first) in teams.iter().enumerate() {
        for second in &teams[i + 1..] {
            let (home, away) = if rng.gen_bool(0.5) {
                (first, second)
            } else {
                (second, first)
            };
            schedule.push(Pairing {
                home: home.name.clone(),
                away: away.name.clone(),
            });
        }
    }
    schedule.shuffle(rng);
    schedule
}

/// Cumulative season counters for one competitor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonLine {
    pub games: u32,
    pub goals: u32,
    pub assists: u32,
    pub shots: u32,
    pub faceoffs: u32,
    pub faceoffs_won: u32,
}

impl SeasonLine {
    #[must_use]
    pub const fn points(&self) -> u32 {
        self.goals + self.assists
    }

    /// Add one match worth of counters.
    pub const fn absorb(&mut self, line: &StatLine) {
        self.games += 1;
        self.goals += line.goals;
        self.assists += line.assists;
        self.shots += line.shots;
        self.faceoffs += line.faceoffs;
        self.faceoffs_won += line.faceoffs_won;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub wins: u32,
    pub losses: u32,
    pub overtime_losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl TeamRecord {
    #[must_use]
    pub const fn games(&self) -> u32 {
        self.wins + self.losses + self.overtime_losses
    }

    #[must_use]
    pub const fn points(&self) -> u32 {
        POINTS_PER_WIN * self.wins + POINTS_PER_OVERTIME_LOSS * self.overtime_losses
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub team: String,
    #[serde(flatten)]
    pub record: TeamRecord,
    pub games: u32,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderRow {
    pub competitor: CompetitorId,
    pub name: String,
    pub team: String,
    #[serde(flatten)]
    pub line: SeasonLine,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub year: u32,
    pub schedule: Vec<Pairing>,
    pub results: Vec<MatchResult>,
    pub standings: Vec<StandingsRow>,
    pub leaders: Vec<LeaderRow>,
}

/// Worker pool that runs one match per task and joins results in input order.
#[derive(Debug)]
pub struct MatchPool {
    pool: rayon::ThreadPool,
}

impl MatchPool {
    /// Build a pool with `workers` threads; 0 uses the rayon default.
    ///
    /// # Errors
    ///
    /// Returns `SimError::WorkerPool` when the threads cannot be spawned.
    pub fn new(workers: usize) -> Result<Self, SimError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("icetime-match-{index}"))
            .build()
            .map_err(|err| SimError::WorkerPool(err.to_string()))?;
        Ok(Self { pool })
    }

    #[must_use]
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `task` over every job; output order matches `jobs`.
    pub fn execute<J, T, F>(&self, jobs: &[J], task: F) -> Vec<T>
    where
        J: Sync,
        T: Send,
        F: Fn(&J) -> T + Sync + Send,
    {
        self.pool.install(|| jobs.par_iter().map(task).collect())
    }
}

/// A league of teams playing repeated round-robin seasons.
#[derive(Debug)]
pub struct League {
    teams: Vec<Team>,
    competitors: HashMap<CompetitorId, Competitor>,
    team_of: HashMap<CompetitorId, usize>,
    graph: Arc<ZoneGraph>,
    config: LeagueConfig,
    pool: MatchPool,
    year: u32,
    schedule: Vec<Pairing>,
    players: HashMap<CompetitorId, SeasonLine>,
    records: HashMap<String, TeamRecord>,
}

impl League {
    /// Validate the rosters, seed the tables and schedule the first season.
    ///
    /// # Errors
    ///
    /// Returns `SimError` for fewer than two teams, repeated team names or competitors,
    /// rosters naming unknown competitors, invalid rosters, or an invalid configuration.
    pub fn new(
        teams: Vec<Team>,
        competitors: Vec<Competitor>,
        config: LeagueConfig,
    ) -> Result<Self, SimError> {
        Self::with_graph(teams, competitors, config, Arc::new(ZoneGraph::standard()))
    }

    /// As [`League::new`] on a custom rink.
    ///
    /// # Errors
    ///
    /// See [`League::new`].
    pub fn with_graph(
        teams: Vec<Team>,
        competitors: Vec<Competitor>,
        config: LeagueConfig,
        graph: Arc<ZoneGraph>,
    ) -> Result<Self, SimError> {
        config.validate()?;
        if teams.len() < 2 {
            return Err(SimError::NotEnoughTeams(teams.len()));
        }

        let mut names = HashSet::with_capacity(teams.len());
        for team in &teams {
            if !names.insert(team.name.as_str()) {
                return Err(SimError::DuplicateTeam(team.name.clone()));
            }
        }

        let mut by_id = HashMap::with_capacity(competitors.len());
        for competitor in competitors {
            let id = competitor.id;
            if by_id.insert(id, competitor).is_some() {
                return Err(SimError::DuplicateCompetitor(id));
            }
        }

        let mut team_of = HashMap::with_capacity(by_id.len());
        for (index, team) in teams.iter().enumerate() {
            validate_roster(team, &by_id)?;
            for id in &team.players {
                if team_of.insert(*id, index).is_some() {
                    return Err(SimError::DuplicateCompetitor(*id));
                }
            }
        }

        let players = by_id.keys().map(|id| (*id, SeasonLine::default())).collect();
        let records = teams
            .iter()
            .map(|team| (team.name.clone(), TeamRecord::default()))
            .collect();
        let pool = MatchPool::new(config.workers)?;

        let mut league = Self {
            teams,
            competitors: by_id,
            team_of,
            graph,
            config,
            pool,
            year: 0,
            schedule: Vec::new(),
            players,
            records,
        };
        league.add_season_schedule();
        Ok(league)
    }

    #[must_use]
    pub const fn year(&self) -> u32 {
        self.year
    }

    #[must_use]
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    #[must_use]
    pub fn schedule(&self) -> &[Pairing] {
        &self.schedule
    }

    #[must_use]
    pub const fn pool(&self) -> &MatchPool {
        &self.pool
    }

    /// Replace the schedule with a fresh round-robin for the current year.
    pub fn add_season_schedule(&mut self) {
        let mut rng = ChaCha20Rng::seed_from_u64(derive_schedule_seed(self.config.seed, self.year));
        self.schedule = generate_schedule(&self.teams, &mut rng);
        debug!(
            "season {}: scheduled {} matches",
            self.year,
            self.schedule.len()
        );
    }

    fn team(&self, name: &str) -> Result<&Team, SimError> {
        self.teams
            .iter()
            .find(|team| team.name == name)
            .ok_or_else(|| SimError::UnknownTeam(name.to_string()))
    }

    /// Play the current schedule and fold every result into the season tables.
    ///
    /// Nothing is folded unless every match completes.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any match, in schedule order.
    pub fn run_season(&mut self) -> Result<SeasonSummary, SimError> {
        info!(
            "season {} starting: {} teams, {} matches, {} workers",
            self.year,
            self.teams.len(),
            self.schedule.len(),
            self.pool.workers()
        );
        let jobs = self
            .schedule
            .iter()
            .enumerate()
            .map(|(index, pairing)| -> Result<_, SimError> {
                Ok((
                    self.team(&pairing.home)?,
                    self.team(&pairing.away)?,
                    derive_match_seed(self.config.seed, self.year, index),
                ))
            })
            .collect::<Result<Vec<_>, SimError>>()?;

        let competitors = &self.competitors;
        let graph = &self.graph;
        let match_config = &self.config.match_config;
        let outcomes = self.pool.execute(&jobs, |(home, away, seed)| {
            MatchManager::new(home, away, competitors, Arc::clone(graph), match_config, *seed)?
                .run()
        });
        let results = outcomes.into_iter().collect::<Result<Vec<_>, SimError>>()?;

        for result in &results {
            self.check_result(result)?;
        }
        for result in &results {
            self.fold_match(result)?;
        }

        let summary = SeasonSummary {
            year: self.year,
            schedule: std::mem::take(&mut self.schedule),
            results,
            standings: self.standings(),
            leaders: self.leaders(),
        };
        info!(
            "season {} complete: {} leads with {} points",
            summary.year,
            summary
                .standings
                .first()
                .map_or("nobody", |row| row.team.as_str()),
            summary.standings.first().map_or(0, |row| row.points)
        );
        self.year += 1;
        self.add_season_schedule();
        Ok(summary)
    }

    fn check_result(&self, result: &MatchResult) -> Result<Side, SimError> {
        for name in [&result.home, &result.away] {
            if !self.records.contains_key(name) {
                return Err(SimError::UnknownTeam(name.clone()));
            }
        }
        for row in &result.rows {
            if !self.players.contains_key(&row.competitor) {
                return Err(SimError::UnknownCompetitor(row.competitor));
            }
        }
        result.winner().ok_or_else(|| {
            SimError::InvariantViolation(format!(
                "{} vs {} ended tied",
                result.home, result.away
            ))
        })
    }

    /// Add one completed match to the season tables.
    ///
    /// # Errors
    ///
    /// Returns `SimError` if the result is tied or names teams or competitors outside the
    /// league; the tables are untouched in that case.
    pub fn fold_match(&mut self, result: &MatchResult) -> Result<(), SimError> {
        let winner = self.check_result(result)?;
        let winner_name = result.team(winner);
        let loser_name = result.team(winner.opponent());
        let (winner_goals, loser_goals) = match winner {
            Side::Home => (result.home_score.goals, result.away_score.goals),
            Side::Away => (result.away_score.goals, result.home_score.goals),
        };

        if let Some(record) = self.records.get_mut(winner_name) {
            record.wins += 1;
            record.goals_for += winner_goals;
            record.goals_against += loser_goals;
        }
        if let Some(record) = self.records.get_mut(loser_name) {
            if result.overtime {
                record.overtime_losses += 1;
            } else {
                record.losses += 1;
            }
            record.goals_for += loser_goals;
            record.goals_against += winner_goals;
        }
        for row in &result.rows {
            if let Some(line) = self.players.get_mut(&row.competitor) {
                line.absorb(&row.line);
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn record(&self, team: &str) -> Option<&TeamRecord> {
        self.records.get(team)
    }

    #[must_use]
    pub fn season_line(&self, competitor: CompetitorId) -> Option<&SeasonLine> {
        self.players.get(&competitor)
    }

    /// Team table by points, then wins, then name.
    #[must_use]
    pub fn standings(&self) -> Vec<StandingsRow> {
        let mut rows: Vec<StandingsRow> = self
            .teams
            .iter()
            .map(|team| {
                let record = self.records.get(&team.name).copied().unwrap_or_default();
                StandingsRow {
                    team: team.name.clone(),
                    record,
                    games: record.games(),
                    points: record.points(),
                }
            })
            .collect();
        rows.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then_with(|| b.record.wins.cmp(&a.record.wins))
                .then_with(|| a.team.cmp(&b.team))
        });
        rows
    }

    /// Competitor table by points, then goals, then id.
    #[must_use]
    pub fn leaders(&self) -> Vec<LeaderRow> {
        let mut rows: Vec<LeaderRow> = self
            .players
            .iter()
            .map(|(id, line)| LeaderRow {
                competitor: *id,
                name: self
                    .competitors
                    .get(id)
                    .map(|c| c.name.clone())
                    .unwrap_or_default(),
                team: self
                    .team_of
                    .get(id)
                    .map(|index| self.teams[*index].name.clone())
                    .unwrap_or_default(),
                line: *line,
                points: line.points(),
            })
            .collect();
        rows.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then_with(|| b.line.goals.cmp(&a.line.goals))
                .then_with(|| a.competitor.cmp(&b.competitor))
        });
        rows
    }
}
