//! Error taxonomy for match and season simulation.
use thiserror::Error;

use crate::config::ConfigError;
use crate::rink::{RinkError, ZoneId};
use crate::roster::CompetitorId;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    // Configuration errors, raised at construction.
    #[error("team {team} has an empty roster")]
    EmptyRoster { team: String },
    #[error("team {team} needs at least {min} competitors (has {count})")]
    RosterTooSmall {
        team: String,
        min: usize,
        count: usize,
    },
    #[error("team {team} has no goalie")]
    MissingGoalie { team: String },
    #[error("competitor {0} is rostered more than once")]
    DuplicateCompetitor(CompetitorId),
    #[error("team name {0} is used more than once")]
    DuplicateTeam(String),
    #[error("a league needs at least 2 teams (got {0})")]
    NotEnoughTeams(usize),
    #[error("unknown team {0}")]
    UnknownTeam(String),
    #[error(transparent)]
    Rink(#[from] RinkError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to start worker pool: {0}")]
    WorkerPool(String),

    // Lookup errors.
    #[error("competitor {0} is not part of this match")]
    UnknownCompetitor(CompetitorId),

    // Internal consistency.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
    #[error("competitor {competitor} holds the puck outside zone {zone}")]
    PossessionDesync { competitor: CompetitorId, zone: ZoneId },
    #[error("match exceeded {limit} ticks without finishing")]
    TickLimitExceeded { limit: u64 },
}
