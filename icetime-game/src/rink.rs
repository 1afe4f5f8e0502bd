//! Zone graph of the rink with a precomputed all-pairs shortest-path table.
//!
//! Edge cost into a zone equals that zone's exposure weight, so a path's cost is the
//! sum of the weights of every zone it enters after the source.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::roster::Role;
use crate::state::Side;

/// Identifier of a rink zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(pub u8);

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "z{}", self.0)
    }
}

/// Adjacency list stored inline; rink zones have at most a handful of neighbours.
pub type Connections = SmallVec<[ZoneId; 6]>;

/// A discrete region of the playing surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub connections: Connections,
    /// Cost of a shot or pass travelling into this zone.
    pub exposure_weight: u32,
}

impl Zone {
    #[must_use]
    pub fn new(id: u8, connections: &[u8], exposure_weight: u32) -> Self {
        Self {
            id: ZoneId(id),
            connections: connections.iter().copied().map(ZoneId).collect(),
            exposure_weight,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RinkError {
    #[error("rink has no zones")]
    Empty,
    #[error("unknown zone {0}")]
    UnknownZone(ZoneId),
    #[error("zone {0} is listed more than once")]
    DuplicateZone(ZoneId),
    #[error("zone {0} must have a positive exposure weight")]
    ZeroWeight(ZoneId),
    #[error("zone {zone} connects to unknown zone {target}")]
    DanglingConnection { zone: ZoneId, target: ZoneId },
    #[error("zone {target} is unreachable from zone {from}")]
    Unreachable { from: ZoneId, target: ZoneId },
}

/// Immutable rink topology plus its shortest-path table.
#[derive(Debug, Clone)]
pub struct ZoneGraph {
    zones: Vec<Zone>,
    index: HashMap<ZoneId, usize>,
    /// `paths[source][target]`, indexed by enumeration order.
    paths: Vec<Vec<Vec<ZoneId>>>,
}

impl ZoneGraph {
    /// Validate the topology and precompute every shortest path.
    ///
    /// # Errors
    ///
    /// Returns `RinkError` for empty rinks, duplicate ids, zero weights, connections to
    /// unknown zones, or zones that cannot reach each other.
    pub fn new(zones: Vec<Zone>) -> Result<Self, RinkError> {
        if zones.is_empty() {
            return Err(RinkError::Empty);
        }
        let mut index = HashMap::with_capacity(zones.len());
        for (position, zone) in zones.iter().enumerate() {
            if zone.exposure_weight == 0 {
                return Err(RinkError::ZeroWeight(zone.id));
            }
            if index.insert(zone.id, position).is_some() {
                return Err(RinkError::DuplicateZone(zone.id));
            }
        }
        for zone in &zones {
            if let Some(target) = zone.connections.iter().find(|c| !index.contains_key(c)) {
                return Err(RinkError::DanglingConnection {
                    zone: zone.id,
                    target: *target,
                });
            }
        }

        let paths = (0..zones.len())
            .map(|source| shortest_paths_from(&zones, &index, source))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            zones,
            index,
            paths,
        })
    }

    /// The 21-zone rink: goal creases at zones 1 and 19, centre ice at zone 10.
    #[must_use]
    pub fn standard() -> Self {
        // The standard topology is connected and fully specified.
        match Self::new(standard_zones()) {
            Ok(graph) => graph,
            Err(err) => unreachable!("standard rink is valid: {err}"),
        }
    }

    #[must_use]
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    #[must_use]
    pub fn contains(&self, zone: ZoneId) -> bool {
        self.index.contains_key(&zone)
    }

    /// Zone record for an id.
    ///
    /// # Errors
    ///
    /// Returns `RinkError::UnknownZone` for ids outside the rink.
    pub fn zone(&self, zone: ZoneId) -> Result<&Zone, RinkError> {
        self.position(zone).map(|position| &self.zones[position])
    }

    /// Adjacent zones of `zone`.
    ///
    /// # Errors
    ///
    /// Returns `RinkError::UnknownZone` for ids outside the rink.
    pub fn connections(&self, zone: ZoneId) -> Result<&[ZoneId], RinkError> {
        self.zone(zone).map(|z| z.connections.as_slice())
    }

    /// Minimum-exposure path from `source` to `target`, both endpoints included.
    ///
    /// # Errors
    ///
    /// Returns `RinkError::UnknownZone` when either endpoint is outside the rink.
    pub fn shortest_path(&self, source: ZoneId, target: ZoneId) -> Result<&[ZoneId], RinkError> {
        let from = self.position(source)?;
        let to = self.position(target)?;
        Ok(self.paths[from][to].as_slice())
    }

    /// Total exposure of a path: weights of every zone after the first.
    #[must_use]
    pub fn path_cost(&self, path: &[ZoneId]) -> u32 {
        path.iter()
            .skip(1)
            .filter_map(|zone| self.zone(*zone).ok())
            .map(|zone| zone.exposure_weight)
            .sum()
    }

    fn position(&self, zone: ZoneId) -> Result<usize, RinkError> {
        self.index
            .get(&zone)
            .copied()
            .ok_or(RinkError::UnknownZone(zone))
    }
}

fn shortest_paths_from(
    zones: &[Zone],
    index: &HashMap<ZoneId, usize>,
    source: usize,
) -> Result<Vec<Vec<ZoneId>>, RinkError> {
    let count = zones.len();
    let mut dist = vec![u32::MAX; count];
    let mut prev: Vec<Option<usize>> = vec![None; count];
    let mut unseen: Vec<usize> = (0..count).collect();
    dist[source] = 0;

    while !unseen.is_empty() {
        // min_by_key keeps the first of equal minima, so ties follow enumeration order.
        let Some((slot, current)) = unseen
            .iter()
            .copied()
            .enumerate()
            .min_by_key(|(_, zone)| dist[*zone])
        else {
            break;
        };
        unseen.remove(slot);
        if dist[current] == u32::MAX {
            continue;
        }
        for next in &zones[current].connections {
            let Some(&next_pos) = index.get(next) else {
                continue;
            };
            let candidate = dist[current].saturating_add(zones[next_pos].exposure_weight);
            if candidate < dist[next_pos] {
                dist[next_pos] = candidate;
                prev[next_pos] = Some(current);
            }
        }
    }

    (0..count)
        .map(|target| {
            if dist[target] == u32::MAX {
                return Err(RinkError::Unreachable {
                    from: zones[source].id,
                    target: zones[target].id,
                });
            }
            let mut path = vec![zones[target].id];
            let mut cursor = target;
            while cursor != source {
                let Some(step) = prev[cursor] else {
                    return Err(RinkError::Unreachable {
                        from: zones[source].id,
                        target: zones[target].id,
                    });
                };
                path.push(zones[step].id);
                cursor = step;
            }
            path.reverse();
            Ok(path)
        })
        .collect()
}

fn standard_zones() -> Vec<Zone> {
    vec![
        Zone::new(0, &[2, 3, 4, 5], 2),
        Zone::new(1, &[3, 4], 1),
        Zone::new(2, &[0, 3, 6, 8], 2),
        Zone::new(3, &[0, 1, 2, 4, 6], 1),
        Zone::new(4, &[0, 1, 3, 5, 7], 1),
        Zone::new(5, &[0, 4, 7, 12], 2),
        Zone::new(6, &[2, 3, 7, 8, 9], 1),
        Zone::new(7, &[4, 5, 6, 11, 12], 1),
        Zone::new(8, &[2, 9, 15], 2),
        Zone::new(9, &[6, 8, 10, 13], 1),
        Zone::new(10, &[9, 11], 1),
        Zone::new(11, &[7, 10, 12, 14], 1),
        Zone::new(12, &[5, 11, 18], 2),
        Zone::new(13, &[9, 14, 15, 16], 1),
        Zone::new(14, &[11, 13, 17, 18], 1),
        Zone::new(15, &[8, 13, 16, 20], 2),
        Zone::new(16, &[13, 15, 17, 19, 20], 1),
        Zone::new(17, &[14, 16, 18, 19, 20], 1),
        Zone::new(18, &[12, 14, 17, 20], 2),
        Zone::new(19, &[16, 17], 1),
        Zone::new(20, &[15, 16, 17, 18], 2),
    ]
}

/// Restart placement of competitors by role.
///
/// Home zones are listed directly; the away side mirrors them through `mirror_total - zone`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formation {
    pub goalie: ZoneId,
    pub centre: ZoneId,
    pub wing_left: ZoneId,
    pub wing_right: ZoneId,
    pub defence_left: ZoneId,
    pub defence_right: ZoneId,
    pub mirror_total: u8,
    /// Zone where the puck is dropped on a faceoff.
    pub faceoff_zone: ZoneId,
}

impl Formation {
    /// Formation matching [`ZoneGraph::standard`].
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            goalie: ZoneId(1),
            centre: ZoneId(10),
            wing_left: ZoneId(9),
            wing_right: ZoneId(11),
            defence_left: ZoneId(6),
            defence_right: ZoneId(7),
            mirror_total: 20,
            faceoff_zone: ZoneId(10),
        }
    }

    /// Restart zone for a competitor of `role` playing on `side`.
    #[must_use]
    pub fn zone_for(&self, role: Role, side: Side) -> ZoneId {
        let home = match role {
            Role::Goalie => self.goalie,
            Role::Centre => self.centre,
            Role::WingLeft => self.wing_left,
            Role::WingRight => self.wing_right,
            Role::DefenceLeft => self.defence_left,
            Role::DefenceRight => self.defence_right,
        };
        match side {
            Side::Home => home,
            Side::Away => ZoneId(self.mirror_total.saturating_sub(home.0)),
        }
    }

    /// Every zone this formation can place a competitor or the puck in.
    #[must_use]
    pub fn zones(&self) -> Vec<ZoneId> {
        let mut zones: Vec<ZoneId> = Role::ALL
            .iter()
            .flat_map(|role| [self.zone_for(*role, Side::Home), self.zone_for(*role, Side::Away)])
            .collect();
        zones.push(self.faceoff_zone);
        zones
    }
}

impl Default for Formation {
    fn default() -> Self {
        Self::standard()
    }
}
