//! Mutable per-match state: rosters, zone occupancy, possession and the clock.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

use crate::boxscore::BoxScore;
use crate::error::SimError;
use crate::rink::ZoneId;
use crate::roster::CompetitorId;

/// Home or away within a single match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Home => Self::Away,
            Self::Away => Self::Home,
        }
    }
}

type Occupants = SmallVec<[CompetitorId; 4]>;

/// State of one match in progress.
///
/// Occupancy is stored in both directions and kept inverse-consistent by routing every
/// move through [`MatchState::move_competitor`].
#[derive(Debug, Clone)]
pub struct MatchState {
    possessor: Option<CompetitorId>,
    puck_zone: Option<ZoneId>,
    home: Vec<CompetitorId>,
    away: Vec<CompetitorId>,
    side_by_competitor: HashMap<CompetitorId, Side>,
    occupants: HashMap<ZoneId, Occupants>,
    zone_by_competitor: HashMap<CompetitorId, ZoneId>,
    pub boxscore: BoxScore,
    /// Time remaining in the current period.
    pub clock: u32,
    pub period: u32,
    pub overtime: bool,
}

impl MatchState {
    /// Build a state with every competitor placed by `place`; the puck starts out of play.
    ///
    /// # Errors
    ///
    /// Returns `SimError::DuplicateCompetitor` when a competitor appears twice across rosters.
    pub fn new<F>(
        home: Vec<CompetitorId>,
        away: Vec<CompetitorId>,
        clock: u32,
        mut place: F,
    ) -> Result<Self, SimError>
    where
        F: FnMut(CompetitorId, Side) -> ZoneId,
    {
        let mut side_by_competitor = HashMap::with_capacity(home.len() + away.len());
        for (id, side) in home
            .iter()
            .map(|id| (*id, Side::Home))
            .chain(away.iter().map(|id| (*id, Side::Away)))
        {
            if side_by_competitor.insert(id, side).is_some() {
                return Err(SimError::DuplicateCompetitor(id));
            }
        }

        let boxscore = BoxScore::new(&home, &away);
        let mut state = Self {
            possessor: None,
            puck_zone: None,
            home,
            away,
            side_by_competitor,
            occupants: HashMap::new(),
            zone_by_competitor: HashMap::new(),
            boxscore,
            clock,
            period: 1,
            overtime: false,
        };
        let placements: Vec<(CompetitorId, ZoneId)> = state
            .roster_order()
            .map(|(id, side)| (id, place(id, side)))
            .collect();
        for (id, zone) in placements {
            state.place(id, zone);
        }
        Ok(state)
    }

    /// Every competitor with their side, home roster first.
    pub fn roster_order(&self) -> impl Iterator<Item = (CompetitorId, Side)> + '_ {
        self.home
            .iter()
            .map(|id| (*id, Side::Home))
            .chain(self.away.iter().map(|id| (*id, Side::Away)))
    }

    #[must_use]
    pub fn roster(&self, side: Side) -> &[CompetitorId] {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    /// # Errors
    ///
    /// Returns `SimError::UnknownCompetitor` for competitors outside both rosters.
    pub fn side_of(&self, competitor: CompetitorId) -> Result<Side, SimError> {
        self.side_by_competitor
            .get(&competitor)
            .copied()
            .ok_or(SimError::UnknownCompetitor(competitor))
    }

    /// # Errors
    ///
    /// Returns `SimError::UnknownCompetitor` for competitors outside both rosters.
    pub fn zone_of(&self, competitor: CompetitorId) -> Result<ZoneId, SimError> {
        self.zone_by_competitor
            .get(&competitor)
            .copied()
            .ok_or(SimError::UnknownCompetitor(competitor))
    }

    /// Competitors in `zone`, in arrival order.
    #[must_use]
    pub fn occupants(&self, zone: ZoneId) -> &[CompetitorId] {
        self.occupants.get(&zone).map_or(&[], |list| list.as_slice())
    }

    #[must_use]
    pub const fn possessor(&self) -> Option<CompetitorId> {
        self.possessor
    }

    #[must_use]
    pub const fn puck_zone(&self) -> Option<ZoneId> {
        self.puck_zone
    }

    /// Whether the puck is out of play.
    #[must_use]
    pub const fn is_dead_puck(&self) -> bool {
        self.puck_zone.is_none()
    }

    fn place(&mut self, competitor: CompetitorId, zone: ZoneId) {
        self.occupants.entry(zone).or_default().push(competitor);
        self.zone_by_competitor.insert(competitor, zone);
    }

    /// Move a competitor; the puck travels with its possessor.
    ///
    /// # Errors
    ///
    /// Returns `SimError::UnknownCompetitor` for competitors outside both rosters.
    pub fn move_competitor(&mut self, competitor: CompetitorId, zone: ZoneId) -> Result<(), SimError> {
        let from = self.zone_of(competitor)?;
        if from != zone {
            if let Some(list) = self.occupants.get_mut(&from)
                && let Some(slot) = list.iter().position(|id| *id == competitor)
            {
                list.remove(slot);
            }
            self.place(competitor, zone);
        }
        if self.possessor == Some(competitor) {
            self.puck_zone = Some(zone);
        }
        Ok(())
    }

    /// Give the puck to `competitor` at their current zone.
    ///
    /// # Errors
    ///
    /// Returns `SimError::UnknownCompetitor` for competitors outside both rosters.
    pub fn set_possession(&mut self, competitor: CompetitorId) -> Result<ZoneId, SimError> {
        let zone = self.zone_of(competitor)?;
        self.possessor = Some(competitor);
        self.puck_zone = Some(zone);
        Ok(zone)
    }

    /// Put the puck out of play.
    pub fn clear_possession(&mut self) {
        self.possessor = None;
        self.puck_zone = None;
    }

    /// Teammates of `competitor`, excluding themself, in roster order.
    ///
    /// # Errors
    ///
    /// Returns `SimError::UnknownCompetitor` for competitors outside both rosters.
    pub fn teammates(&self, competitor: CompetitorId) -> Result<Vec<CompetitorId>, SimError> {
        let side = self.side_of(competitor)?;
        Ok(self
            .roster(side)
            .iter()
            .copied()
            .filter(|id| *id != competitor)
            .collect())
    }

    /// # Errors
    ///
    /// Returns `SimError::UnknownCompetitor` for competitors outside both rosters.
    pub fn opponents(&self, competitor: CompetitorId) -> Result<&[CompetitorId], SimError> {
        let side = self.side_of(competitor)?;
        Ok(self.roster(side.opponent()))
    }

    #[must_use]
    pub fn is_tied(&self) -> bool {
        self.boxscore.is_tied()
    }

    /// Verify occupancy and possession consistency.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvariantViolation` or `SimError::PossessionDesync` when the state
    /// has drifted.
    pub fn check_invariants(&self) -> Result<(), SimError> {
        if self.zone_by_competitor.len() != self.side_by_competitor.len() {
            return Err(SimError::InvariantViolation(format!(
                "{} competitors rostered but {} placed",
                self.side_by_competitor.len(),
                self.zone_by_competitor.len()
            )));
        }
        let occupied: usize = self.occupants.values().map(SmallVec::len).sum();
        if occupied != self.zone_by_competitor.len() {
            return Err(SimError::InvariantViolation(format!(
                "zone lists hold {occupied} entries for {} competitors",
                self.zone_by_competitor.len()
            )));
        }
        for (zone, list) in &self.occupants {
            for id in list {
                if self.zone_by_competitor.get(id) != Some(zone) {
                    return Err(SimError::InvariantViolation(format!(
                        "{id} listed in {zone} but mapped elsewhere"
                    )));
                }
            }
        }
        match (self.possessor, self.puck_zone) {
            (Some(id), Some(zone)) => {
                if self.zone_of(id)? != zone {
                    return Err(SimError::PossessionDesync {
                        competitor: id,
                        zone,
                    });
                }
            }
            (Some(id), None) => {
                return Err(SimError::InvariantViolation(format!(
                    "{id} holds a puck that is out of play"
                )));
            }
            (None, _) => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> MatchState {
        let home = vec![CompetitorId(1), CompetitorId(2)];
        let away = vec![CompetitorId(3), CompetitorId(4)];
        MatchState::new(home, away, 30, |id, _| ZoneId(u8::try_from(id.0).unwrap())).unwrap()
    }

    #[test]
    fn placement_is_inverse_consistent() {
        let state = sample_state();
        assert_eq!(state.zone_of(CompetitorId(3)).unwrap(), ZoneId(3));
        assert_eq!(state.occupants(ZoneId(3)), &[CompetitorId(3)]);
        assert!(state.is_dead_puck());
        state.check_invariants().unwrap();
    }

    #[test]
    fn puck_travels_with_possessor() {
        let mut state = sample_state();
        state.set_possession(CompetitorId(1)).unwrap();
        state.move_competitor(CompetitorId(1), ZoneId(2)).unwrap();
        assert_eq!(state.puck_zone(), Some(ZoneId(2)));
        assert_eq!(state.occupants(ZoneId(2)), &[CompetitorId(2), CompetitorId(1)]);
        assert!(state.occupants(ZoneId(1)).is_empty());
        state.check_invariants().unwrap();

        state.clear_possession();
        assert_eq!(state.possessor(), None);
        assert!(state.is_dead_puck());
    }

    #[test]
    fn rejects_overlapping_rosters() {
        let err = MatchState::new(vec![CompetitorId(1)], vec![CompetitorId(1)], 30, |_, _| {
            ZoneId(0)
        })
        .unwrap_err();
        assert_eq!(err, SimError::DuplicateCompetitor(CompetitorId(1)));
    }

    #[test]
    fn lookups_of_strangers_fail() {
        let mut state = sample_state();
        assert_eq!(
            state.side_of(CompetitorId(9)),
            Err(SimError::UnknownCompetitor(CompetitorId(9)))
        );
        assert!(state.move_competitor(CompetitorId(9), ZoneId(0)).is_err());
        assert!(state.set_possession(CompetitorId(9)).is_err());
    }

    #[test]
    fn teammates_and_opponents_follow_sides() {
        let state = sample_state();
        assert_eq!(state.teammates(CompetitorId(1)).unwrap(), vec![CompetitorId(2)]);
        assert_eq!(state.opponents(CompetitorId(1)).unwrap(), &[
            CompetitorId(3),
            CompetitorId(4)
        ]);
        assert_eq!(Side::Home.opponent(), Side::Away);
    }
}
