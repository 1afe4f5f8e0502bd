//! Match, resolver and league configuration.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    BLOCK_CHANCE, INTERCEPT_CHANCE, MAX_TICKS, PERIOD_LENGTH, REGULATION_PERIODS, SCREEN_BONUS,
    TICK_SIZE, TIP_BONUS, TIP_CHANCE,
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: f64,
        value: f64,
    },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("tick {tick} exceeds period length {period_length}")]
    TickExceedsPeriod { tick: u32, period_length: u32 },
}

/// Probabilities and difficulty increments used by the action resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Chance a teammate on the shot path deflects the puck.
    pub tip_chance: f64,
    /// Save difficulty added by a successful deflection.
    pub tip_bonus: f64,
    /// Chance the first opponent on the shot path blocks it outright.
    pub block_chance: f64,
    /// Save difficulty added when a block attempt fails and screens the goalie.
    pub screen_bonus: f64,
    /// Chance an opponent on the pass path intercepts it.
    pub intercept_chance: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            tip_chance: TIP_CHANCE,
            tip_bonus: TIP_BONUS,
            block_chance: BLOCK_CHANCE,
            screen_bonus: SCREEN_BONUS,
            intercept_chance: INTERCEPT_CHANCE,
        }
    }
}

impl ResolverConfig {
    /// Validate probability bounds and bonus signs.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a chance leaves `[0, 1]` or a bonus is negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_chance("tip_chance", self.tip_chance)?;
        validate_chance("block_chance", self.block_chance)?;
        validate_chance("intercept_chance", self.intercept_chance)?;
        validate_min("tip_bonus", self.tip_bonus, 0.0)?;
        validate_min("screen_bonus", self.screen_bonus, 0.0)?;
        Ok(())
    }
}

/// Clock and period structure of a single match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub period_length: u32,
    pub tick: u32,
    pub regulation_periods: u32,
    pub max_ticks: u64,
    /// Keep a play-by-play event log on the match manager.
    pub record_events: bool,
    pub resolver: ResolverConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            period_length: PERIOD_LENGTH,
            tick: TICK_SIZE,
            regulation_periods: REGULATION_PERIODS,
            max_ticks: MAX_TICKS,
            record_events: false,
            resolver: ResolverConfig::default(),
        }
    }
}

impl MatchConfig {
    /// Validate clock invariants.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when any field violates the documented bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_min("period_length", f64::from(self.period_length), 1.0)?;
        validate_min("tick", f64::from(self.tick), 1.0)?;
        validate_min("regulation_periods", f64::from(self.regulation_periods), 1.0)?;
        if self.max_ticks == 0 {
            return Err(ConfigError::MinViolation {
                field: "max_ticks",
                min: 1.0,
                value: 0.0,
            });
        }
        if self.tick > self.period_length {
            return Err(ConfigError::TickExceedsPeriod {
                tick: self.tick,
                period_length: self.period_length,
            });
        }
        self.resolver.validate()
    }
}

/// Season-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueConfig {
    /// Root seed for schedules and per-match streams.
    pub seed: u64,
    /// Worker threads for match execution; 0 lets the pool pick.
    pub workers: usize,
    #[serde(rename = "match")]
    pub match_config: MatchConfig,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            seed: 1337,
            workers: 0,
            match_config: MatchConfig::default(),
        }
    }
}

impl LeagueConfig {
    /// Load a configuration from JSON, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// # Errors
    ///
    /// Returns `ConfigError` when the nested match configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.match_config.validate()
    }
}

fn validate_chance(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::RangeViolation {
            field,
            min: 0.0,
            max: 1.0,
            value,
        });
    }
    Ok(())
}

fn validate_min(field: &'static str, value: f64, min: f64) -> Result<(), ConfigError> {
    if value.is_nan() || value < min {
        return Err(ConfigError::MinViolation { field, min, value });
    }
    Ok(())
}
