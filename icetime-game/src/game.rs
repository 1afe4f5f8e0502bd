//! Match manager: the tick loop and period/overtime state machine.
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::boxscore::{BoxScoreRow, TeamScore};
use crate::config::MatchConfig;
use crate::error::SimError;
use crate::possession::PossessionTracker;
use crate::resolver::{Action, ActionResolver};
use crate::rink::{Formation, ZoneGraph};
use crate::rng::MatchRng;
use crate::roster::{Competitor, CompetitorId, Team};
use crate::state::{MatchState, Side};

/// Minimum competitors per side: a goalie and someone to receive a pass.
pub const MIN_ROSTER: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Puck out of play; the next tick starts with a faceoff.
    FaceoffPending,
    InPlay,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchEvent {
    Faceoff {
        winner: CompetitorId,
        loser: CompetitorId,
    },
    Shot {
        shooter: CompetitorId,
    },
    Goal {
        scorer: CompetitorId,
        assist: Option<CompetitorId>,
        side: Side,
    },
    Save {
        goalie: CompetitorId,
        shooter: CompetitorId,
    },
    Block {
        blocker: CompetitorId,
        shooter: CompetitorId,
    },
    Pass {
        passer: CompetitorId,
        receiver: CompetitorId,
    },
    Interception {
        passer: CompetitorId,
        interceptor: CompetitorId,
    },
    PeriodEnd {
        period: u32,
    },
    OvertimeStart {
        period: u32,
    },
    Final {
        home_goals: u32,
        away_goals: u32,
    },
}

/// A logged event stamped with the game clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub period: u32,
    pub clock: u32,
    pub event: MatchEvent,
}

/// Final record of a completed match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub home: String,
    pub away: String,
    pub home_score: TeamScore,
    pub away_score: TeamScore,
    pub period: u32,
    pub overtime: bool,
    pub rows: Vec<BoxScoreRow>,
    pub ticks: u64,
}

impl MatchResult {
    #[must_use]
    pub const fn winner(&self) -> Option<Side> {
        if self.home_score.goals > self.away_score.goals {
            Some(Side::Home)
        } else if self.away_score.goals > self.home_score.goals {
            Some(Side::Away)
        } else {
            None
        }
    }

    #[must_use]
    pub fn team(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }
}

/// Owns one match: state, possession history, resolver and random stream.
#[derive(Debug, Clone)]
pub struct MatchManager {
    home: String,
    away: String,
    resolver: ActionResolver,
    state: MatchState,
    possession: PossessionTracker,
    rng: MatchRng,
    config: MatchConfig,
    formation: Formation,
    turn_order: Vec<CompetitorId>,
    phase: MatchPhase,
    ticks: u64,
    events: Option<Vec<EventRecord>>,
}

impl MatchManager {
    /// Validate both rosters and place everyone in formation.
    ///
    /// # Errors
    ///
    /// Returns `SimError` when a roster is empty, too small, lacks a goalie, repeats or
    /// shares a competitor, names an unknown competitor, or the configuration is invalid.
    pub fn new(
        home: &Team,
        away: &Team,
        competitors: &HashMap<CompetitorId, Competitor>,
        graph: Arc<ZoneGraph>,
        config: &MatchConfig,
        seed: u64,
    ) -> Result<Self, SimError> {
        config.validate()?;
        let formation = Formation::standard();
        for zone in formation.zones() {
            graph.zone(zone)?;
        }

        let mut lineup = Vec::with_capacity(home.players.len() + away.players.len());
        for team in [home, away] {
            validate_roster(team, competitors)?;
            lineup.extend(team.players.iter().filter_map(|id| competitors.get(id)).cloned());
        }
        let roles: HashMap<CompetitorId, _> = lineup.iter().map(|c| (c.id, c.role)).collect();
        let state = MatchState::new(
            home.players.clone(),
            away.players.clone(),
            config.period_length,
            |id, side| {
                roles
                    .get(&id)
                    .map_or(formation.faceoff_zone, |role| formation.zone_for(*role, side))
            },
        )?;
        let turn_order = state.roster_order().map(|(id, _)| id).collect();

        Ok(Self {
            home: home.name.clone(),
            away: away.name.clone(),
            resolver: ActionResolver::new(lineup, graph, config.resolver.clone()),
            state,
            possession: PossessionTracker::new(),
            rng: MatchRng::from_seed_u64(seed),
            config: config.clone(),
            formation,
            turn_order,
            phase: MatchPhase::FaceoffPending,
            ticks: 0,
            events: config.record_events.then(Vec::new),
        })
    }

    #[must_use]
    pub const fn state(&self) -> &MatchState {
        &self.state
    }

    /// Direct access to the state for scripted scenarios.
    pub const fn state_mut(&mut self) -> &mut MatchState {
        &mut self.state
    }

    #[must_use]
    pub const fn phase(&self) -> MatchPhase {
        self.phase
    }

    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self.phase, MatchPhase::Completed)
    }

    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub const fn possession(&self) -> &PossessionTracker {
        &self.possession
    }

    /// Logged events, empty unless event recording is enabled.
    #[must_use]
    pub fn events(&self) -> &[EventRecord] {
        self.events.as_deref().unwrap_or(&[])
    }

    /// Random draws consumed so far.
    #[must_use]
    pub const fn rng_draws(&self) -> u64 {
        self.rng.draws()
    }

    /// Advance the match by one tick.
    ///
    /// Actions resolve on every tick, including the one played at clock zero; that tick
    /// then closes the period. A regulation period therefore spans `period_length / tick + 1`
    /// ticks.
    ///
    /// # Errors
    ///
    /// Returns `SimError::TickLimitExceeded` once the tick ceiling is reached, or any
    /// error raised while resolving actions.
    pub fn step(&mut self) -> Result<StepOutcome, SimError> {
        if self.is_completed() {
            return Ok(StepOutcome::Completed);
        }
        if self.ticks >= self.config.max_ticks {
            return Err(SimError::TickLimitExceeded {
                limit: self.config.max_ticks,
            });
        }
        self.ticks += 1;

        match self.phase {
            MatchPhase::FaceoffPending => self.faceoff()?,
            MatchPhase::InPlay => self.play_turns()?,
            MatchPhase::Completed => return Ok(StepOutcome::Completed),
        }
        if cfg!(debug_assertions) {
            self.state.check_invariants()?;
        }

        if self.state.clock == 0 {
            return Ok(self.end_period());
        }
        if self.state.overtime && !self.state.is_tied() {
            self.finish();
            return Ok(StepOutcome::Completed);
        }
        self.state.clock = self.state.clock.saturating_sub(self.config.tick);
        Ok(StepOutcome::Continue)
    }

    /// Step until the match completes.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by [`MatchManager::step`].
    pub fn run(&mut self) -> Result<MatchResult, SimError> {
        while self.step()? == StepOutcome::Continue {}
        Ok(self.result())
    }

    /// Snapshot of the score and box score.
    #[must_use]
    pub fn result(&self) -> MatchResult {
        MatchResult {
            home: self.home.clone(),
            away: self.away.clone(),
            home_score: self.state.boxscore.score(Side::Home),
            away_score: self.state.boxscore.score(Side::Away),
            period: self.state.period,
            overtime: self.state.overtime,
            rows: self.state.boxscore.rows().to_vec(),
            ticks: self.ticks,
        }
    }

    fn record(&mut self, event: MatchEvent) {
        if let Some(events) = self.events.as_mut() {
            events.push(EventRecord {
                period: self.state.period,
                clock: self.state.clock,
                event,
            });
        }
    }

    fn end_period(&mut self) -> StepOutcome {
        let period = self.state.period;
        self.record(MatchEvent::PeriodEnd { period });
        if period < self.config.regulation_periods {
            debug!("{} vs {}: end of period {period}", self.home, self.away);
            self.start_period(period + 1);
            StepOutcome::Continue
        } else if self.state.is_tied() {
            debug!("{} vs {}: tied after period {period}, overtime", self.home, self.away);
            self.state.overtime = true;
            self.start_period(period + 1);
            self.record(MatchEvent::OvertimeStart { period: period + 1 });
            StepOutcome::Continue
        } else {
            self.finish();
            StepOutcome::Completed
        }
    }

    fn start_period(&mut self, period: u32) {
        self.state.period = period;
        self.state.clock = self.config.period_length;
        self.stoppage();
    }

    fn stoppage(&mut self) {
        self.state.clear_possession();
        self.possession.reset();
        self.phase = MatchPhase::FaceoffPending;
    }

    fn finish(&mut self) {
        self.phase = MatchPhase::Completed;
        let home_goals = self.state.boxscore.score(Side::Home).goals;
        let away_goals = self.state.boxscore.score(Side::Away).goals;
        self.record(MatchEvent::Final {
            home_goals,
            away_goals,
        });
        debug!(
            "{} {home_goals} - {away_goals} {} final{}",
            self.home,
            self.away,
            if self.state.overtime { " (OT)" } else { "" }
        );
    }

    fn faceoff(&mut self) -> Result<(), SimError> {
        for &id in &self.turn_order {
            let side = self.state.side_of(id)?;
            let role = self.resolver.competitor(id)?.role;
            self.state
                .move_competitor(id, self.formation.zone_for(role, side))?;
        }
        self.state.clear_possession();

        let (a, b) = self.resolver.faceoff_pair(&self.state)?;
        self.state.move_competitor(a, self.formation.faceoff_zone)?;
        self.state.move_competitor(b, self.formation.faceoff_zone)?;
        let outcome = self
            .resolver
            .resolve_faceoff(a, b, &mut self.state, &mut self.rng)?;
        self.take_possession(outcome.winner)?;
        self.phase = MatchPhase::InPlay;
        self.record(MatchEvent::Faceoff {
            winner: outcome.winner,
            loser: outcome.loser,
        });
        Ok(())
    }

    fn take_possession(&mut self, competitor: CompetitorId) -> Result<(), SimError> {
        self.state.set_possession(competitor)?;
        self.possession.push(competitor);
        Ok(())
    }

    fn play_turns(&mut self) -> Result<(), SimError> {
        for index in 0..self.turn_order.len() {
            let id = self.turn_order[index];
            match self.resolver.choose_action(id, &self.state, &mut self.rng)? {
                Action::Nothing => {}
                Action::Skate => {
                    let zone = self.resolver.resolve_skate(id, &self.state, &mut self.rng)?;
                    self.state.move_competitor(id, zone)?;
                }
                Action::Pass => {
                    let pass = self.resolver.resolve_pass(id, &self.state, &mut self.rng)?;
                    self.take_possession(pass.possessor)?;
                    self.record(if pass.intercepted {
                        MatchEvent::Interception {
                            passer: id,
                            interceptor: pass.possessor,
                        }
                    } else {
                        MatchEvent::Pass {
                            passer: id,
                            receiver: pass.receiver,
                        }
                    });
                }
                Action::Shoot => {
                    let shot = self.resolver.resolve_shoot(
                        id,
                        &mut self.state,
                        &self.possession,
                        &mut self.rng,
                    )?;
                    self.record(MatchEvent::Shot { shooter: id });
                    if shot.goal {
                        let side = self.state.side_of(id)?;
                        debug!(
                            "{id} scores for {} in period {} at {}",
                            match side {
                                Side::Home => &self.home,
                                Side::Away => &self.away,
                            },
                            self.state.period,
                            self.state.clock
                        );
                        self.record(MatchEvent::Goal {
                            scorer: id,
                            assist: shot.assist,
                            side,
                        });
                        self.stoppage();
                        return Ok(());
                    }
                    if let Some(possessor) = shot.possessor {
                        self.take_possession(possessor)?;
                        self.record(match shot.blocked_by {
                            Some(blocker) => MatchEvent::Block {
                                blocker,
                                shooter: id,
                            },
                            None => MatchEvent::Save {
                                goalie: shot.goalie,
                                shooter: id,
                            },
                        });
                    }
                }
            }
        }
        trace!("tick done at period {} clock {}", self.state.period, self.state.clock);
        Ok(())
    }
}

/// Check a single roster: non-empty, large enough, no repeats, known ids, has a goalie.
pub(crate) fn validate_roster(
    team: &Team,
    competitors: &HashMap<CompetitorId, Competitor>,
) -> Result<(), SimError> {
    if team.players.is_empty() {
        return Err(SimError::EmptyRoster {
            team: team.name.clone(),
        });
    }
    if team.players.len() < MIN_ROSTER {
        return Err(SimError::RosterTooSmall {
            team: team.name.clone(),
            min: MIN_ROSTER,
            count: team.players.len(),
        });
    }
    if let Some(id) = team.duplicate_player() {
        return Err(SimError::DuplicateCompetitor(id));
    }
    let mut has_goalie = false;
    for id in &team.players {
        let competitor = competitors
            .get(id)
            .ok_or(SimError::UnknownCompetitor(*id))?;
        has_goalie |= competitor.role.is_goalie();
    }
    if !has_goalie {
        return Err(SimError::MissingGoalie {
            team: team.name.clone(),
        });
    }
    Ok(())
}
