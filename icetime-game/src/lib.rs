//! Icetime Simulation Engine
//!
//! Platform-agnostic core of the Icetime hockey simulator: a zone graph of the rink,
//! probabilistic action resolution, the per-match state machine, and round-robin seasons
//! folded into league standings. This crate has no UI or file-system dependencies.

pub mod body;
pub mod boxscore;
pub mod config;
pub mod constants;
pub mod error;
pub mod game;
pub mod generate;
pub mod league;
pub mod numbers;
pub mod possession;
pub mod resolver;
pub mod rink;
pub mod rng;
pub mod roster;
pub mod save;
pub mod state;

// Re-export commonly used types
pub use body::{Body, BodyPart};
pub use boxscore::{BoxScore, BoxScoreRow, StatLine, TeamScore};
pub use config::{ConfigError, LeagueConfig, MatchConfig, ResolverConfig};
pub use error::SimError;
pub use game::{EventRecord, MatchEvent, MatchManager, MatchPhase, MatchResult, StepOutcome};
pub use generate::{generate_players, generate_roster};
pub use league::{
    League, LeaderRow, MatchPool, Pairing, SeasonLine, SeasonSummary, StandingsRow, TeamRecord,
    generate_schedule,
};
pub use possession::PossessionTracker;
pub use resolver::{Action, ActionResolver, FaceoffOutcome, PassOutcome, ShotOutcome};
pub use rink::{Formation, RinkError, Zone, ZoneGraph, ZoneId};
pub use rng::{CountingRng, MatchRng, derive_stream_seed};
pub use roster::{Competitor, CompetitorId, Hand, Role, StatBlock, Team};
pub use save::{SaveDocument, SaveError};
pub use state::{MatchState, Side};

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Trait for abstracting where the roster document lives
/// Platform-specific implementations should provide this
pub trait RosterStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the stored roster, `None` when nothing has been saved yet
    ///
    /// # Errors
    ///
    /// Returns an error if a stored roster exists but cannot be read or decoded.
    fn load_roster(&self) -> Result<Option<SaveDocument>, Self::Error>;

    /// Persist a roster, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns an error if the roster cannot be written.
    fn save_roster(&self, roster: &SaveDocument) -> Result<(), Self::Error>;
}

/// Entry point tying roster storage to league construction
pub struct LeagueEngine<S>
where
    S: RosterStorage,
{
    storage: S,
}

impl<S> LeagueEngine<S>
where
    S: RosterStorage,
{
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Return the stored roster, generating and saving a fresh one when none exists or
    /// `force_generate` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster cannot be loaded or saved.
    pub fn prepare_roster(
        &self,
        team_count: usize,
        force_generate: bool,
        seed: u64,
    ) -> Result<SaveDocument, S::Error> {
        if !force_generate && let Some(roster) = self.storage.load_roster()? {
            log::info!(
                "loaded roster: {} teams, {} competitors",
                roster.teams.len(),
                roster.competitors.len()
            );
            return Ok(roster);
        }
        let mut rng = ChaCha20Rng::seed_from_u64(derive_stream_seed(seed, b"roster"));
        let roster = generate_roster(team_count, &mut rng);
        self.storage.save_roster(&roster)?;
        log::info!("generated roster: {team_count} teams");
        Ok(roster)
    }

    /// Prepare a roster and build a league from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster cannot be prepared or the league rejects it.
    pub fn create_league(
        &self,
        team_count: usize,
        force_generate: bool,
        config: LeagueConfig,
    ) -> Result<League, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        let roster = self
            .prepare_roster(team_count, force_generate, config.seed)
            .map_err(Into::into)?;
        Ok(League::new(roster.teams, roster.competitors, config)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::convert::Infallible;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct MemoryStorage {
        roster: Rc<RefCell<Option<SaveDocument>>>,
        saves: Rc<RefCell<u32>>,
    }

    impl RosterStorage for MemoryStorage {
        type Error = Infallible;

        fn load_roster(&self) -> Result<Option<SaveDocument>, Self::Error> {
            Ok(self.roster.borrow().clone())
        }

        fn save_roster(&self, roster: &SaveDocument) -> Result<(), Self::Error> {
            *self.roster.borrow_mut() = Some(roster.clone());
            *self.saves.borrow_mut() += 1;
            Ok(())
        }
    }

    #[test]
    fn prepare_roster_generates_once() {
        let storage = MemoryStorage::default();
        let engine = LeagueEngine::new(storage.clone());
        let first = engine.prepare_roster(4, false, 9).unwrap();
        assert_eq!(first.teams.len(), 4);
        let second = engine.prepare_roster(8, false, 9).unwrap();
        assert_eq!(second, first);
        assert_eq!(*storage.saves.borrow(), 1);

        let forced = engine.prepare_roster(3, true, 9).unwrap();
        assert_eq!(forced.teams.len(), 3);
        assert_eq!(*storage.saves.borrow(), 2);
    }

    #[test]
    fn create_league_schedules_first_season() {
        let engine = LeagueEngine::new(MemoryStorage::default());
        let config = LeagueConfig {
            workers: 1,
            ..LeagueConfig::default()
        };
        let league = engine.create_league(5, false, config).unwrap();
        assert_eq!(league.schedule().len(), 10);
        assert_eq!(league.year(), 0);
    }
}
