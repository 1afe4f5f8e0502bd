//! Persisted roster document: every competitor plus the teams that roster them.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::roster::{Competitor, CompetitorId, Team};

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("invalid save json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("competitor {0} is listed more than once")]
    DuplicateCompetitor(CompetitorId),
    #[error("team name {0} is listed more than once")]
    DuplicateTeam(String),
    #[error("team {team} rosters unknown competitor {competitor}")]
    UnknownCompetitor { team: String, competitor: CompetitorId },
    #[error("competitor {competitor} is rostered by more than one team")]
    SharedCompetitor { competitor: CompetitorId },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SaveDocument {
    pub competitors: Vec<Competitor>,
    pub teams: Vec<Team>,
}

impl SaveDocument {
    #[must_use]
    pub const fn new(competitors: Vec<Competitor>, teams: Vec<Team>) -> Self {
        Self { competitors, teams }
    }

    /// Decode and validate a document; body values are clamped back into range.
    ///
    /// # Errors
    ///
    /// Returns `SaveError::Json` for malformed input, or a roster error when ids repeat,
    /// teams name unknown competitors, or two teams share a competitor.
    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        let mut doc: Self = serde_json::from_str(json)?;
        doc.validate()?;
        for competitor in &mut doc.competitors {
            competitor.body.normalize();
        }
        Ok(doc)
    }

    /// # Errors
    ///
    /// Returns `SaveError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check roster consistency without mutating the document.
    ///
    /// # Errors
    ///
    /// Returns the first roster inconsistency found.
    pub fn validate(&self) -> Result<(), SaveError> {
        let mut ids = HashSet::with_capacity(self.competitors.len());
        for competitor in &self.competitors {
            if !ids.insert(competitor.id) {
                return Err(SaveError::DuplicateCompetitor(competitor.id));
            }
        }
        let mut names = HashSet::with_capacity(self.teams.len());
        let mut rostered = HashSet::with_capacity(ids.len());
        for team in &self.teams {
            if !names.insert(team.name.as_str()) {
                return Err(SaveError::DuplicateTeam(team.name.clone()));
            }
            for id in &team.players {
                if !ids.contains(id) {
                    return Err(SaveError::UnknownCompetitor {
                        team: team.name.clone(),
                        competitor: *id,
                    });
                }
                if !rostered.insert(*id) {
                    return Err(SaveError::SharedCompetitor { competitor: *id });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{Role, StatBlock};

    fn doc() -> SaveDocument {
        let a = Competitor::new(CompetitorId(1), "Ana", Role::Goalie, StatBlock::uniform(0.3));
        let b = Competitor::new(CompetitorId(2), "Bo", Role::Centre, StatBlock::uniform(0.7));
        SaveDocument::new(
            vec![a, b],
            vec![Team::new("Pucks", vec![CompetitorId(1), CompetitorId(2)])],
        )
    }

    #[test]
    fn wire_format_uses_record_field_names() {
        let json = doc().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let first = &value["competitors"][0];
        assert_eq!(first["id"], 1);
        assert_eq!(first["position"], "GOALIE");
        assert_eq!(first["shoots"], "RIGHT");
        assert!(first["body"]["leg_l"]["maximum"].is_number());
        assert!(first["stats"]["save"].is_number());
        assert_eq!(value["teams"][0]["players"][1], 2);
    }

    #[test]
    fn rejects_unknown_roster_ids() {
        let mut bad = doc();
        bad.teams[0].players.push(CompetitorId(9));
        let json = serde_json::to_string(&bad).unwrap();
        assert!(matches!(
            SaveDocument::from_json(&json),
            Err(SaveError::UnknownCompetitor { .. })
        ));
    }

    #[test]
    fn rejects_shared_competitors() {
        let mut bad = doc();
        bad.teams.push(Team::new("Sticks", vec![CompetitorId(2)]));
        assert!(matches!(
            bad.validate(),
            Err(SaveError::SharedCompetitor { .. })
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            SaveDocument::from_json("{ not json"),
            Err(SaveError::Json(_))
        ));
    }

    #[test]
    fn decoding_clamps_body_parts() {
        let mut raw = doc();
        raw.competitors[0].body.head.current = 4.0;
        let json = serde_json::to_string(&raw).unwrap();
        let decoded = SaveDocument::from_json(&json).unwrap();
        assert!((decoded.competitors[0].body.head.current - 1.0).abs() < f64::EPSILON);
    }
}
