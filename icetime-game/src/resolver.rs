//! Action selection and resolution for a single competitor turn.
//!
//! Every resolution reads positions from [`MatchState`], records box-score counters, and
//! returns an outcome describing where the puck ends up. Applying that outcome to
//! possession is left to the match manager.
use log::trace;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ResolverConfig;
use crate::constants::FACEOFF_BASE;
use crate::error::SimError;
use crate::possession::PossessionTracker;
use crate::rink::{ZoneGraph, ZoneId};
use crate::roster::{Competitor, CompetitorId, Role};
use crate::state::{MatchState, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Skate,
    Nothing,
    Shoot,
    Pass,
}

impl Action {
    /// Options in draw order; only the first two are open to competitors without the puck.
    pub const OPTIONS: [Self; 4] = [Self::Skate, Self::Nothing, Self::Shoot, Self::Pass];
    const OFF_PUCK_OPTIONS: usize = 2;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShotOutcome {
    pub goal: bool,
    /// Goalie on a save, blocker on a block, `None` after a goal.
    pub possessor: Option<CompetitorId>,
    /// Zone of the new possessor, `None` after a goal.
    pub zone: Option<ZoneId>,
    pub goalie: CompetitorId,
    pub blocked_by: Option<CompetitorId>,
    pub assist: Option<CompetitorId>,
    /// Final save difficulty the goalie faced.
    pub difficulty: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassOutcome {
    pub possessor: CompetitorId,
    pub zone: ZoneId,
    pub receiver: CompetitorId,
    pub intercepted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceoffOutcome {
    pub winner: CompetitorId,
    pub loser: CompetitorId,
}

/// Decides and resolves competitor actions for one match.
#[derive(Debug, Clone)]
pub struct ActionResolver {
    competitors: HashMap<CompetitorId, Competitor>,
    graph: Arc<ZoneGraph>,
    config: ResolverConfig,
}

impl ActionResolver {
    #[must_use]
    pub fn new(
        competitors: impl IntoIterator<Item = Competitor>,
        graph: Arc<ZoneGraph>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            competitors: competitors.into_iter().map(|c| (c.id, c)).collect(),
            graph,
            config,
        }
    }

    #[must_use]
    pub fn graph(&self) -> &ZoneGraph {
        &self.graph
    }

    /// # Errors
    ///
    /// Returns `SimError::UnknownCompetitor` when the id is not part of this match.
    pub fn competitor(&self, id: CompetitorId) -> Result<&Competitor, SimError> {
        self.competitors
            .get(&id)
            .ok_or(SimError::UnknownCompetitor(id))
    }

    fn roll<R: Rng + ?Sized>(rng: &mut R, chance: f64) -> bool {
        rng.gen_range(0.0..1.0) < chance
    }

    /// Pick the competitor's action for this turn.
    ///
    /// # Errors
    ///
    /// Returns `SimError::UnknownCompetitor` when the id is not part of this match.
    pub fn choose_action<R: Rng + ?Sized>(
        &self,
        id: CompetitorId,
        state: &MatchState,
        rng: &mut R,
    ) -> Result<Action, SimError> {
        let competitor = self.competitor(id)?;
        let action = if state.possessor() == Some(id) {
            Action::OPTIONS[rng.gen_range(0..Action::OPTIONS.len())]
        } else if competitor.role.is_goalie() {
            Action::Nothing
        } else {
            Action::OPTIONS[rng.gen_range(0..Action::OFF_PUCK_OPTIONS)]
        };
        trace!("{id} chooses {action:?}");
        Ok(action)
    }

    fn goalie_of(&self, state: &MatchState, side: Side) -> Result<CompetitorId, SimError> {
        for id in state.roster(side) {
            if self.competitor(*id)?.role.is_goalie() {
                return Ok(*id);
            }
        }
        Err(SimError::InvariantViolation(format!(
            "{side:?} side has no goalie on the ice"
        )))
    }

    /// Resolve a shot from `shooter` at the opposing goalie.
    ///
    /// Teammates along the path may tip the puck and the first opponent may block or
    /// screen; the goalie then saves when the accumulated difficulty is below their save
    /// attribute.
    ///
    /// # Errors
    ///
    /// Returns `SimError` when a competitor or zone lookup fails.
    pub fn resolve_shoot<R: Rng + ?Sized>(
        &self,
        shooter: CompetitorId,
        state: &mut MatchState,
        possession: &PossessionTracker,
        rng: &mut R,
    ) -> Result<ShotOutcome, SimError> {
        let shooter_side = state.side_of(shooter)?;
        let goalie = self.goalie_of(state, shooter_side.opponent())?;
        let path = self
            .graph
            .shortest_path(state.zone_of(shooter)?, state.zone_of(goalie)?)?;
        let Some(&goalie_zone) = path.last() else {
            return Err(SimError::InvariantViolation("empty shot path".to_string()));
        };

        let mut difficulty = self.competitor(shooter)?.stats.shooting;
        let mut block_attempted = false;
        let mut blocked = None;

        'walk: for zone in path.iter().skip(1) {
            for &occupant in state.occupants(*zone) {
                if occupant == shooter || self.competitor(occupant)?.role.is_goalie() {
                    continue;
                }
                if state.side_of(occupant)? == shooter_side {
                    if Self::roll(rng, self.config.tip_chance) {
                        difficulty += self.config.tip_bonus;
                        trace!("{occupant} tips the shot from {shooter}");
                    }
                } else if !block_attempted {
                    block_attempted = true;
                    if Self::roll(rng, self.config.block_chance) {
                        blocked = Some((occupant, *zone));
                        break 'walk;
                    }
                    difficulty += self.config.screen_bonus;
                    trace!("{occupant} screens {goalie}");
                }
            }
        }

        if let Some((blocker, zone)) = blocked {
            state.boxscore.record_shot(shooter, false)?;
            trace!("{blocker} blocks the shot from {shooter}");
            return Ok(ShotOutcome {
                goal: false,
                possessor: Some(blocker),
                zone: Some(zone),
                goalie,
                blocked_by: Some(blocker),
                assist: None,
                difficulty,
            });
        }

        if difficulty < self.competitor(goalie)?.stats.save {
            state.boxscore.record_shot(shooter, false)?;
            trace!("{goalie} saves a shot from {shooter} at difficulty {difficulty:.2}");
            return Ok(ShotOutcome {
                goal: false,
                possessor: Some(goalie),
                zone: Some(goalie_zone),
                goalie,
                blocked_by: None,
                assist: None,
                difficulty,
            });
        }

        state.boxscore.record_shot(shooter, true)?;
        let mut assist = None;
        if let Some(candidate) = possession.assist()
            && candidate != shooter
            && state.side_of(candidate)? == shooter_side
        {
            state.boxscore.record_assist(candidate)?;
            assist = Some(candidate);
        }
        trace!("{shooter} scores on {goalie}");
        Ok(ShotOutcome {
            goal: true,
            possessor: None,
            zone: None,
            goalie,
            blocked_by: None,
            assist,
            difficulty,
        })
    }

    /// Resolve a pass to a random teammate, with interception checks along the path.
    ///
    /// # Errors
    ///
    /// Returns `SimError` when a lookup fails or the passer has no teammates.
    pub fn resolve_pass<R: Rng + ?Sized>(
        &self,
        passer: CompetitorId,
        state: &MatchState,
        rng: &mut R,
    ) -> Result<PassOutcome, SimError> {
        let passer_side = state.side_of(passer)?;
        let teammates = state.teammates(passer)?;
        let Some(&receiver) = teammates.choose(rng) else {
            return Err(SimError::InvariantViolation(format!(
                "{passer} has no teammate to pass to"
            )));
        };
        let receiver_zone = state.zone_of(receiver)?;
        let path = self
            .graph
            .shortest_path(state.zone_of(passer)?, receiver_zone)?;

        for zone in path.iter().skip(1) {
            for &occupant in state.occupants(*zone) {
                if state.side_of(occupant)? == passer_side {
                    continue;
                }
                if Self::roll(rng, self.config.intercept_chance) {
                    trace!("{occupant} intercepts a pass from {passer}");
                    return Ok(PassOutcome {
                        possessor: occupant,
                        zone: *zone,
                        receiver,
                        intercepted: true,
                    });
                }
            }
        }

        trace!("{passer} passes to {receiver}");
        Ok(PassOutcome {
            possessor: receiver,
            zone: receiver_zone,
            receiver,
            intercepted: false,
        })
    }

    /// Pick an adjacent zone uniformly.
    ///
    /// # Errors
    ///
    /// Returns `SimError` when the competitor or their zone is unknown.
    pub fn resolve_skate<R: Rng + ?Sized>(
        &self,
        id: CompetitorId,
        state: &MatchState,
        rng: &mut R,
    ) -> Result<ZoneId, SimError> {
        let from = state.zone_of(id)?;
        let target = self
            .graph
            .connections(from)?
            .choose(rng)
            .copied()
            .unwrap_or(from);
        trace!("{id} skates {from} -> {target}");
        Ok(target)
    }

    /// Contest a faceoff between `a` and `b`; `a` wins when the draw falls under
    /// `0.5 + (strength_a - strength_b)`.
    ///
    /// # Errors
    ///
    /// Returns `SimError::UnknownCompetitor` when either id is not part of this match.
    pub fn resolve_faceoff<R: Rng + ?Sized>(
        &self,
        a: CompetitorId,
        b: CompetitorId,
        state: &mut MatchState,
        rng: &mut R,
    ) -> Result<FaceoffOutcome, SimError> {
        let edge = self.competitor(a)?.stats.strength - self.competitor(b)?.stats.strength;
        let outcome = if Self::roll(rng, FACEOFF_BASE + edge) {
            FaceoffOutcome { winner: a, loser: b }
        } else {
            FaceoffOutcome { winner: b, loser: a }
        };
        state.boxscore.record_faceoff(outcome.winner, true)?;
        state.boxscore.record_faceoff(outcome.loser, false)?;
        trace!("{} wins the faceoff against {}", outcome.winner, outcome.loser);
        Ok(outcome)
    }

    /// Home and away faceoff takers: each side's centre, else its last rostered competitor.
    ///
    /// # Errors
    ///
    /// Returns `SimError` when a side has no competitors or a lookup fails.
    pub fn faceoff_pair(&self, state: &MatchState) -> Result<(CompetitorId, CompetitorId), SimError> {
        Ok((
            self.faceoff_taker(state, Side::Home)?,
            self.faceoff_taker(state, Side::Away)?,
        ))
    }

    fn faceoff_taker(&self, state: &MatchState, side: Side) -> Result<CompetitorId, SimError> {
        let roster = state.roster(side);
        for id in roster {
            if self.competitor(*id)?.role == Role::Centre {
                return Ok(*id);
            }
        }
        roster.last().copied().ok_or_else(|| {
            SimError::InvariantViolation(format!("{side:?} side has no faceoff taker"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rink::Formation;
    use crate::roster::StatBlock;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn lineup(offset: u32, stats: &StatBlock) -> Vec<Competitor> {
        Role::ALL
            .iter()
            .enumerate()
            .map(|(i, role)| {
                let id = CompetitorId(offset + u32::try_from(i).unwrap());
                Competitor::new(id, format!("Player {id}"), *role, stats.clone())
            })
            .collect()
    }

    fn setup(home_stats: &StatBlock, away_stats: &StatBlock) -> (ActionResolver, MatchState) {
        let home = lineup(0, home_stats);
        let away = lineup(10, away_stats);
        let formation = Formation::standard();
        let roles: HashMap<CompetitorId, Role> =
            home.iter().chain(&away).map(|c| (c.id, c.role)).collect();
        let state = MatchState::new(
            home.iter().map(|c| c.id).collect(),
            away.iter().map(|c| c.id).collect(),
            30,
            |id, side| formation.zone_for(roles[&id], side),
        )
        .unwrap();
        let resolver = ActionResolver::new(
            home.into_iter().chain(away),
            Arc::new(ZoneGraph::standard()),
            ResolverConfig::default(),
        );
        (resolver, state)
    }

    #[test]
    fn off_puck_goalie_does_nothing() {
        let (resolver, state) = setup(&StatBlock::uniform(0.5), &StatBlock::uniform(0.5));
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..20 {
            assert_eq!(
                resolver.choose_action(CompetitorId(0), &state, &mut rng).unwrap(),
                Action::Nothing
            );
        }
    }

    #[test]
    fn off_puck_skaters_only_skate_or_wait() {
        let (resolver, mut state) = setup(&StatBlock::uniform(0.5), &StatBlock::uniform(0.5));
        state.set_possession(CompetitorId(1)).unwrap();
        let mut rng = SmallRng::seed_from_u64(2);
        let mut possessor_actions = std::collections::HashSet::new();
        for _ in 0..200 {
            let action = resolver.choose_action(CompetitorId(2), &state, &mut rng).unwrap();
            assert!(matches!(action, Action::Skate | Action::Nothing));
            possessor_actions.insert(resolver.choose_action(CompetitorId(1), &state, &mut rng).unwrap());
        }
        assert_eq!(possessor_actions.len(), 4);
    }

    #[test]
    fn perfect_goalie_stops_unscreened_shots() {
        let mut goalie_stats = StatBlock::uniform(0.5);
        goalie_stats.save = 1.0;
        let (resolver, mut state) = setup(&StatBlock::uniform(0.5), &goalie_stats);
        let config = ResolverConfig {
            block_chance: 0.0,
            screen_bonus: 0.0,
            tip_chance: 0.0,
            ..ResolverConfig::default()
        };
        let resolver = ActionResolver::new(
            resolver.competitors.values().cloned(),
            Arc::new(ZoneGraph::standard()),
            config,
        );
        let mut rng = SmallRng::seed_from_u64(3);
        let tracker = PossessionTracker::new();
        for _ in 0..50 {
            let outcome = resolver
                .resolve_shoot(CompetitorId(1), &mut state, &tracker, &mut rng)
                .unwrap();
            assert!(!outcome.goal);
            assert_eq!(outcome.possessor, Some(CompetitorId(10)));
            assert_eq!(outcome.zone, Some(ZoneId(19)));
        }
        let line = state.boxscore.line(CompetitorId(1)).unwrap();
        assert_eq!(line.shots, 50);
        assert_eq!(line.goals, 0);
    }

    #[test]
    fn goal_credits_teammate_assist() {
        let mut shooter_stats = StatBlock::uniform(0.5);
        shooter_stats.shooting = 1.0;
        let mut weak_goalie = StatBlock::uniform(0.5);
        weak_goalie.save = 0.0;
        let (resolver, mut state) = setup(&shooter_stats, &weak_goalie);
        let config = ResolverConfig {
            block_chance: 0.0,
            ..ResolverConfig::default()
        };
        let resolver = ActionResolver::new(
            resolver.competitors.values().cloned(),
            Arc::new(ZoneGraph::standard()),
            config,
        );
        let mut tracker = PossessionTracker::new();
        tracker.push(CompetitorId(2));
        tracker.push(CompetitorId(1));
        let mut rng = SmallRng::seed_from_u64(4);
        let outcome = resolver
            .resolve_shoot(CompetitorId(1), &mut state, &tracker, &mut rng)
            .unwrap();
        assert!(outcome.goal);
        assert_eq!(outcome.assist, Some(CompetitorId(2)));
        assert_eq!(outcome.possessor, None);
        assert_eq!(state.boxscore.line(CompetitorId(1)).unwrap().goals, 1);
        assert_eq!(state.boxscore.line(CompetitorId(1)).unwrap().shots, 1);
        assert_eq!(state.boxscore.line(CompetitorId(2)).unwrap().assists, 1);
    }

    #[test]
    fn opponent_in_possession_chain_gets_no_assist() {
        let mut shooter_stats = StatBlock::uniform(0.5);
        shooter_stats.shooting = 1.0;
        let mut weak_goalie = StatBlock::uniform(0.5);
        weak_goalie.save = 0.0;
        let (resolver, mut state) = setup(&shooter_stats, &weak_goalie);
        let resolver = ActionResolver::new(
            resolver.competitors.values().cloned(),
            Arc::new(ZoneGraph::standard()),
            ResolverConfig {
                block_chance: 0.0,
                ..ResolverConfig::default()
            },
        );
        let mut tracker = PossessionTracker::new();
        tracker.push(CompetitorId(11));
        tracker.push(CompetitorId(1));
        let mut rng = SmallRng::seed_from_u64(5);
        let outcome = resolver
            .resolve_shoot(CompetitorId(1), &mut state, &tracker, &mut rng)
            .unwrap();
        assert!(outcome.goal);
        assert_eq!(outcome.assist, None);
        assert_eq!(state.boxscore.line(CompetitorId(11)).unwrap().assists, 0);
    }

    #[test]
    fn certain_block_hands_puck_to_first_opponent() {
        let (resolver, mut state) = setup(&StatBlock::uniform(0.5), &StatBlock::uniform(0.5));
        let resolver = ActionResolver::new(
            resolver.competitors.values().cloned(),
            Arc::new(ZoneGraph::standard()),
            ResolverConfig {
                block_chance: 1.0,
                ..ResolverConfig::default()
            },
        );
        let path = resolver
            .graph()
            .shortest_path(ZoneId(10), ZoneId(19))
            .unwrap()
            .to_vec();
        let expected = path
            .iter()
            .skip(1)
            .flat_map(|zone| state.occupants(*zone).iter().map(move |id| (*id, *zone)))
            .find(|(id, _)| {
                state.side_of(*id).unwrap() == Side::Away
                    && !resolver.competitor(*id).unwrap().role.is_goalie()
            })
            .expect("formation leaves an away skater on the lane");
        let mut rng = SmallRng::seed_from_u64(6);
        let outcome = resolver
            .resolve_shoot(CompetitorId(1), &mut state, &PossessionTracker::new(), &mut rng)
            .unwrap();
        assert!(!outcome.goal);
        assert_eq!(outcome.blocked_by, Some(expected.0));
        assert_eq!(outcome.zone, Some(expected.1));
        assert_eq!(state.boxscore.line(CompetitorId(1)).unwrap().shots, 1);
    }

    #[test]
    fn certain_interception_stops_pass() {
        let (resolver, mut state) = setup(&StatBlock::uniform(0.5), &StatBlock::uniform(0.5));
        let resolver = ActionResolver::new(
            resolver.competitors.values().cloned(),
            Arc::new(ZoneGraph::standard()),
            ResolverConfig {
                intercept_chance: 1.0,
                ..ResolverConfig::default()
            },
        );
        // Crowd everyone into zone 3 and leave the passer alone next door.
        for id in 10..16 {
            state.move_competitor(CompetitorId(id), ZoneId(3)).unwrap();
        }
        for id in 0..6 {
            state.move_competitor(CompetitorId(id), ZoneId(3)).unwrap();
        }
        state.move_competitor(CompetitorId(1), ZoneId(0)).unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        let outcome = resolver.resolve_pass(CompetitorId(1), &state, &mut rng).unwrap();
        assert!(outcome.intercepted);
        assert_eq!(state.side_of(outcome.possessor).unwrap(), Side::Away);
        assert_eq!(outcome.zone, ZoneId(3));
    }

    fn reconfigured(resolver: &ActionResolver, config: ResolverConfig) -> ActionResolver {
        ActionResolver::new(
            resolver.competitors.values().cloned(),
            Arc::new(ZoneGraph::standard()),
            config,
        )
    }

    #[test]
    fn failed_blocks_screen_only_once_per_shot() {
        let (resolver, mut state) = setup(&StatBlock::uniform(0.5), &StatBlock::uniform(0.5));
        let resolver = reconfigured(
            &resolver,
            ResolverConfig {
                block_chance: 0.0,
                tip_chance: 0.0,
                ..ResolverConfig::default()
            },
        );
        // Shot lane from centre ice is 10 -> 9 -> 13 -> 16 -> 19.
        for id in 2..6 {
            state.move_competitor(CompetitorId(id), ZoneId(0)).unwrap();
        }
        for (id, zone) in [(11, 9), (12, 9), (13, 13), (14, 13), (15, 16)] {
            state.move_competitor(CompetitorId(id), ZoneId(zone)).unwrap();
        }
        let mut rng = SmallRng::seed_from_u64(12);
        for _ in 0..20 {
            let outcome = resolver
                .resolve_shoot(CompetitorId(1), &mut state, &PossessionTracker::new(), &mut rng)
                .unwrap();
            assert_eq!(outcome.blocked_by, None);
            assert!((outcome.difficulty - (0.5 + 0.5)).abs() < 1e-9);
        }
    }

    #[test]
    fn every_teammate_on_the_lane_may_tip() {
        let (resolver, mut state) = setup(&StatBlock::uniform(0.5), &StatBlock::uniform(0.5));
        let resolver = reconfigured(
            &resolver,
            ResolverConfig {
                block_chance: 0.0,
                screen_bonus: 0.0,
                tip_chance: 1.0,
                ..ResolverConfig::default()
            },
        );
        for id in 11..16 {
            state.move_competitor(CompetitorId(id), ZoneId(0)).unwrap();
        }
        for (id, zone) in [(2, 9), (3, 13), (4, 16), (5, 16)] {
            state.move_competitor(CompetitorId(id), ZoneId(zone)).unwrap();
        }
        let mut rng = SmallRng::seed_from_u64(13);
        let outcome = resolver
            .resolve_shoot(CompetitorId(1), &mut state, &PossessionTracker::new(), &mut rng)
            .unwrap();
        let expected = 0.5 + 4.0 * resolver.config.tip_bonus;
        assert!((outcome.difficulty - expected).abs() < 1e-9);
    }

    #[test]
    fn clean_pass_reaches_a_teammate_in_their_zone() {
        let (resolver, mut state) = setup(&StatBlock::uniform(0.5), &StatBlock::uniform(0.5));
        let resolver = reconfigured(
            &resolver,
            ResolverConfig {
                intercept_chance: 0.0,
                ..ResolverConfig::default()
            },
        );
        state.set_possession(CompetitorId(1)).unwrap();
        let mut rng = SmallRng::seed_from_u64(14);
        let mut receivers = std::collections::HashSet::new();
        for _ in 0..200 {
            let outcome = resolver.resolve_pass(CompetitorId(1), &state, &mut rng).unwrap();
            assert!(!outcome.intercepted);
            assert_eq!(outcome.possessor, outcome.receiver);
            assert_ne!(outcome.receiver, CompetitorId(1));
            assert_eq!(state.side_of(outcome.receiver).unwrap(), Side::Home);
            assert_eq!(outcome.zone, state.zone_of(outcome.receiver).unwrap());
            receivers.insert(outcome.receiver);
        }
        assert_eq!(receivers.len(), 5);
    }

    #[test]
    fn skating_moves_to_adjacent_zone() {
        let (resolver, state) = setup(&StatBlock::uniform(0.5), &StatBlock::uniform(0.5));
        let mut rng = SmallRng::seed_from_u64(8);
        for _ in 0..30 {
            let target = resolver.resolve_skate(CompetitorId(1), &state, &mut rng).unwrap();
            assert!(resolver.graph().connections(ZoneId(10)).unwrap().contains(&target));
        }
    }

    #[test]
    fn faceoff_favours_stronger_centre() {
        let mut strong = StatBlock::uniform(0.5);
        strong.strength = 1.0;
        let mut weak = StatBlock::uniform(0.5);
        weak.strength = 0.0;
        let (resolver, mut state) = setup(&strong, &weak);
        let (a, b) = resolver.faceoff_pair(&state).unwrap();
        assert_eq!((a, b), (CompetitorId(1), CompetitorId(11)));
        let mut rng = SmallRng::seed_from_u64(9);
        for _ in 0..100 {
            let outcome = resolver.resolve_faceoff(a, b, &mut state, &mut rng).unwrap();
            assert_eq!(outcome.winner, a);
        }
        let line = state.boxscore.line(b).unwrap();
        assert_eq!(line.faceoffs, 100);
        assert_eq!(line.faceoffs_won, 0);
    }

    #[test]
    fn even_faceoffs_split_roughly_evenly() {
        let (resolver, mut state) = setup(&StatBlock::uniform(0.5), &StatBlock::uniform(0.5));
        let mut rng = SmallRng::seed_from_u64(10);
        let sample_size = 2000;
        for _ in 0..sample_size {
            resolver
                .resolve_faceoff(CompetitorId(1), CompetitorId(11), &mut state, &mut rng)
                .unwrap();
        }
        let won = f64::from(state.boxscore.line(CompetitorId(1)).unwrap().faceoffs_won);
        let share = won / f64::from(sample_size);
        assert!((share - 0.5).abs() < 0.05, "share {share}");
    }

    #[test]
    fn unknown_competitor_is_reported() {
        let (resolver, state) = setup(&StatBlock::uniform(0.5), &StatBlock::uniform(0.5));
        let mut rng = SmallRng::seed_from_u64(11);
        assert_eq!(
            resolver.choose_action(CompetitorId(99), &state, &mut rng),
            Err(SimError::UnknownCompetitor(CompetitorId(99)))
        );
    }
}
