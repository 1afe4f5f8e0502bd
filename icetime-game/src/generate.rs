//! Seeded roster generation.
use rand::Rng;

use crate::body::Body;
use crate::constants::MAX_JERSEY_NUMBER;
use crate::numbers::usize_to_u32;
use crate::roster::{Competitor, CompetitorId, Hand, Role, StatBlock, Team};
use crate::save::SaveDocument;

/// Slot order used when filling a generated team.
pub const POSITIONS: [Role; 6] = [
    Role::Goalie,
    Role::DefenceLeft,
    Role::DefenceRight,
    Role::WingLeft,
    Role::WingRight,
    Role::Centre,
];

/// One competitor per slot, ids starting at `offset`.
pub fn generate_players<R: Rng + ?Sized>(offset: u32, rng: &mut R) -> Vec<Competitor> {
    POSITIONS
        .iter()
        .enumerate()
        .map(|(slot, role)| {
            let id = CompetitorId(offset + usize_to_u32(slot));
            let stats = StatBlock::random(rng);
            let shoots = if rng.gen_bool(0.5) {
                Hand::Left
            } else {
                Hand::Right
            };
            Competitor {
                id,
                name: format!("Player {}", id.0),
                jersey_num: rng.gen_range(0..=MAX_JERSEY_NUMBER),
                shoots,
                role: *role,
                stats,
                body: Body::default(),
            }
        })
        .collect()
}

/// A full league roster of `team_count` teams.
pub fn generate_roster<R: Rng + ?Sized>(team_count: usize, rng: &mut R) -> SaveDocument {
    let per_team = usize_to_u32(POSITIONS.len());
    let mut competitors = Vec::with_capacity(team_count * POSITIONS.len());
    let mut teams = Vec::with_capacity(team_count);
    for index in 0..team_count {
        let players = generate_players(usize_to_u32(index) * per_team, rng);
        teams.push(Team::new(
            format!("Team {:02}", index + 1),
            players.iter().map(|c| c.id).collect(),
        ));
        competitors.extend(players);
    }
    SaveDocument::new(competitors, teams)
}
