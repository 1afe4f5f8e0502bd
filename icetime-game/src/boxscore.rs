//! Running per-competitor match statistics.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::SimError;
use crate::roster::CompetitorId;
use crate::state::Side;

/// Counters for one competitor in one match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLine {
    pub goals: u32,
    pub assists: u32,
    pub shots: u32,
    pub faceoffs: u32,
    pub faceoffs_won: u32,
}

impl StatLine {
    #[must_use]
    pub const fn points(&self) -> u32 {
        self.goals + self.assists
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.goals == 0
            && self.assists == 0
            && self.shots == 0
            && self.faceoffs == 0
            && self.faceoffs_won == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxScoreRow {
    pub competitor: CompetitorId,
    pub side: Side,
    #[serde(flatten)]
    pub line: StatLine,
}

/// Aggregate score of one side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamScore {
    pub goals: u32,
    pub shots: u32,
}

/// Box score seeded with every rostered competitor; rows only ever grow their counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxScore {
    rows: Vec<BoxScoreRow>,
    index: HashMap<CompetitorId, usize>,
}

impl BoxScore {
    /// Seed zeroed rows, home roster first.
    #[must_use]
    pub fn new(home: &[CompetitorId], away: &[CompetitorId]) -> Self {
        let rows: Vec<BoxScoreRow> = home
            .iter()
            .map(|id| (*id, Side::Home))
            .chain(away.iter().map(|id| (*id, Side::Away)))
            .map(|(competitor, side)| BoxScoreRow {
                competitor,
                side,
                line: StatLine::default(),
            })
            .collect();
        let index = rows
            .iter()
            .enumerate()
            .map(|(i, row)| (row.competitor, i))
            .collect();
        Self { rows, index }
    }

    fn row_mut(&mut self, competitor: CompetitorId) -> Result<&mut StatLine, SimError> {
        let slot = *self
            .index
            .get(&competitor)
            .ok_or(SimError::UnknownCompetitor(competitor))?;
        Ok(&mut self.rows[slot].line)
    }

    /// Count a shot, and a goal when `goal` is set.
    ///
    /// # Errors
    ///
    /// Returns `SimError::UnknownCompetitor` if the competitor is not in this box score.
    pub fn record_shot(&mut self, competitor: CompetitorId, goal: bool) -> Result<(), SimError> {
        let line = self.row_mut(competitor)?;
        line.shots += 1;
        if goal {
            line.goals += 1;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SimError::UnknownCompetitor` if the competitor is not in this box score.
    pub fn record_assist(&mut self, competitor: CompetitorId) -> Result<(), SimError> {
        self.row_mut(competitor)?.assists += 1;
        Ok(())
    }

    /// Count a faceoff taken, and a faceoff won when `won` is set.
    ///
    /// # Errors
    ///
    /// Returns `SimError::UnknownCompetitor` if the competitor is not in this box score.
    pub fn record_faceoff(&mut self, competitor: CompetitorId, won: bool) -> Result<(), SimError> {
        let line = self.row_mut(competitor)?;
        line.faceoffs += 1;
        if won {
            line.faceoffs_won += 1;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SimError::UnknownCompetitor` if the competitor is not in this box score.
    pub fn line(&self, competitor: CompetitorId) -> Result<&StatLine, SimError> {
        self.index
            .get(&competitor)
            .map(|slot| &self.rows[*slot].line)
            .ok_or(SimError::UnknownCompetitor(competitor))
    }

    #[must_use]
    pub fn score(&self, side: Side) -> TeamScore {
        self.rows
            .iter()
            .filter(|row| row.side == side)
            .fold(TeamScore::default(), |acc, row| TeamScore {
                goals: acc.goals + row.line.goals,
                shots: acc.shots + row.line.shots,
            })
    }

    #[must_use]
    pub fn is_tied(&self) -> bool {
        self.score(Side::Home).goals == self.score(Side::Away).goals
    }

    /// Side with more goals, `None` while tied.
    #[must_use]
    pub fn leader(&self) -> Option<Side> {
        let home = self.score(Side::Home).goals;
        let away = self.score(Side::Away).goals;
        match home.cmp(&away) {
            std::cmp::Ordering::Greater => Some(Side::Home),
            std::cmp::Ordering::Less => Some(Side::Away),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Rows in roster order, home first.
    #[must_use]
    pub fn rows(&self) -> &[BoxScoreRow] {
        &self.rows
    }
}
