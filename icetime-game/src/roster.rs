//! Competitor and team records.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::body::Body;
use crate::numbers::round_hundredths;

/// Identifier of a competitor, unique within a season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompetitorId(pub u32);

impl fmt::Display for CompetitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "GOALIE")]
    Goalie,
    #[serde(rename = "CENTRE")]
    Centre,
    #[serde(rename = "WING_L")]
    WingLeft,
    #[serde(rename = "WING_R")]
    WingRight,
    #[serde(rename = "DEFENCE_L")]
    DefenceLeft,
    #[serde(rename = "DEFENCE_R")]
    DefenceRight,
}

impl Role {
    pub const ALL: [Self; 6] = [
        Self::Goalie,
        Self::Centre,
        Self::WingLeft,
        Self::WingRight,
        Self::DefenceLeft,
        Self::DefenceRight,
    ];

    #[must_use]
    pub const fn is_goalie(self) -> bool {
        matches!(self, Self::Goalie)
    }

    #[must_use]
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::Goalie => "G",
            Self::Centre => "C",
            Self::WingLeft => "LW",
            Self::WingRight => "RW",
            Self::DefenceLeft => "LD",
            Self::DefenceRight => "RD",
        }
    }
}

/// Dominant side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Hand {
    #[default]
    #[serde(rename = "RIGHT")]
    Right,
    #[serde(rename = "LEFT")]
    Left,
}

/// Skill attributes, each in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatBlock {
    pub positioning: f64,
    pub accuracy: f64,
    /// Drives faceoff outcomes.
    pub strength: f64,
    pub iq: f64,
    /// Seeds the save difficulty of this competitor's shots.
    pub shooting: f64,
    /// Difficulty threshold this competitor stops as a goalie.
    pub save: f64,
    pub health: f64,
    pub stability: f64,
    pub speed: f64,
    pub aggressiveness: f64,
    pub shooting_hand: Hand,
}

impl Default for StatBlock {
    fn default() -> Self {
        Self::uniform(0.0)
    }
}

impl StatBlock {
    /// Every attribute set to `value`.
    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self {
            positioning: value,
            accuracy: value,
            strength: value,
            iq: value,
            shooting: value,
            save: value,
            health: value,
            stability: value,
            speed: value,
            aggressiveness: value,
            shooting_hand: Hand::Right,
        }
    }

    /// Random attributes in `[0, 1]`, rounded to two decimals.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut roll = || round_hundredths(rng.gen_range(0.0..=1.0));
        let mut stats = Self {
            positioning: roll(),
            accuracy: roll(),
            strength: roll(),
            iq: roll(),
            shooting: roll(),
            save: roll(),
            health: roll(),
            stability: roll(),
            speed: roll(),
            aggressiveness: roll(),
            shooting_hand: Hand::Right,
        };
        if rng.gen_bool(0.5) {
            stats.shooting_hand = Hand::Left;
        }
        stats
    }

    const fn values(&self) -> [f64; 10] {
        [
            self.positioning,
            self.accuracy,
            self.strength,
            self.iq,
            self.shooting,
            self.save,
            self.health,
            self.stability,
            self.speed,
            self.aggressiveness,
        ]
    }

    /// Mean of all attributes, rounded to two decimals.
    #[must_use]
    pub fn rating(&self) -> f64 {
        let values = self.values();
        let total: f64 = values.iter().sum();
        round_hundredths(total / 10.0)
    }

    /// Whether every attribute lies in `[0, 1]`.
    #[must_use]
    pub fn in_bounds(&self) -> bool {
        self.values().iter().all(|v| (0.0..=1.0).contains(v))
    }
}

/// A simulated player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,
    pub name: String,
    pub jersey_num: u8,
    pub shoots: Hand,
    #[serde(rename = "position")]
    pub role: Role,
    pub stats: StatBlock,
    #[serde(default)]
    pub body: Body,
}

impl Competitor {
    #[must_use]
    pub fn new(id: CompetitorId, name: impl Into<String>, role: Role, stats: StatBlock) -> Self {
        Self {
            id,
            name: name.into(),
            jersey_num: 0,
            shoots: stats.shooting_hand,
            role,
            stats,
            body: Body::default(),
        }
    }

    #[must_use]
    pub fn rating(&self) -> f64 {
        self.stats.rating()
    }
}

impl fmt::Display for Competitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} #{}",
            self.name,
            self.role.abbreviation(),
            self.jersey_num
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub players: Vec<CompetitorId>,
}

impl Team {
    #[must_use]
    pub fn new(name: impl Into<String>, players: Vec<CompetitorId>) -> Self {
        Self {
            name: name.into(),
            players,
        }
    }

    /// First rostered competitor listed twice, if any.
    #[must_use]
    pub fn duplicate_player(&self) -> Option<CompetitorId> {
        self.players
            .iter()
            .enumerate()
            .find(|(i, id)| self.players[..*i].contains(id))
            .map(|(_, id)| *id)
    }
}
