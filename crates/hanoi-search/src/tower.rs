//! Puzzle state types: rings, towers, configurations and moves.
//!
//! A `Configuration` can only be built through validation, so every value of
//! the type satisfies the stacking invariant (rings strictly descend from the
//! bottom of each tower to its top) and holds distinct, positive ring sizes.
//! Configurations serialize as a plain JSON array of towers, e.g.
//! `[[3,2,1],[],[]]`, and deserialization runs the same validation.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{ConfigurationFault, HanoiError, MoveFault, Result};

/// Ring size. Larger value means larger ring.
pub type Ring = u32;

/// One tower, listed bottom to top.
pub type Tower = SmallVec<[Ring; 8]>;

/// A single transfer of the top ring of tower `from` onto tower `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: usize,
    pub to: usize,
}

impl Move {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    /// The move that undoes this one
    pub fn inverse(self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "move ring from tower {} to tower {}", self.from, self.to)
    }
}

/// Check the stacking and uniqueness rules for a raw list of towers.
pub fn check_towers<T: AsRef<[Ring]>>(
    towers: &[T],
) -> std::result::Result<(), ConfigurationFault> {
    if towers.is_empty() {
        return Err(ConfigurationFault::NoTowers);
    }

    let mut seen = HashSet::new();
    for (index, tower) in towers.iter().enumerate() {
        let rings = tower.as_ref();
        for &ring in rings {
            if ring == 0 {
                return Err(ConfigurationFault::ZeroRing);
            }
            if !seen.insert(ring) {
                return Err(ConfigurationFault::DuplicateRing(ring));
            }
        }
        for pair in rings.windows(2) {
            if pair[1] >= pair[0] {
                return Err(ConfigurationFault::RingOrder {
                    tower: index,
                    below: pair[0],
                    above: pair[1],
                });
            }
        }
    }

    Ok(())
}

/// Returns true iff every tower descends strictly from bottom to top and
/// all rings are distinct and positive.
pub fn validate<T: AsRef<[Ring]>>(towers: &[T]) -> bool {
    check_towers(towers).is_ok()
}

/// One state of the puzzle.
///
/// Equality and hashing are structural: two configurations are the same
/// state iff every tower holds the same ring sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Ring>>", into = "Vec<Vec<Ring>>")]
pub struct Configuration {
    towers: Vec<Tower>,
}

impl Configuration {
    /// Build a configuration from towers listed bottom to top.
    pub fn new(towers: Vec<Vec<Ring>>) -> Result<Self> {
        check_towers(&towers)?;
        Ok(Self {
            towers: towers.into_iter().map(Tower::from_vec).collect(),
        })
    }

    /// All rings `1..=ring_count` stacked on `tower`, every other tower empty.
    pub fn stacked(tower_count: usize, ring_count: usize, tower: usize) -> Result<Self> {
        if tower_count == 0 {
            return Err(ConfigurationFault::NoTowers.into());
        }
        if ring_count == 0 {
            return Err(ConfigurationFault::NoRings.into());
        }
        if tower >= tower_count {
            return Err(ConfigurationFault::TowerOutOfRange { tower, tower_count }.into());
        }

        let largest = Ring::try_from(ring_count).map_err(|_| ConfigurationFault::TooManyRings {
            requested: ring_count,
        })?;

        let mut towers = vec![Tower::new(); tower_count];
        towers[tower] = (1..=largest).rev().collect();
        Ok(Self { towers })
    }

    pub fn tower_count(&self) -> usize {
        self.towers.len()
    }

    pub fn towers(&self) -> &[Tower] {
        &self.towers
    }

    /// Rings of one tower, bottom to top
    pub fn tower(&self, index: usize) -> Option<&[Ring]> {
        self.towers.get(index).map(|t| t.as_slice())
    }

    /// Top ring of a tower, if the tower exists and is non-empty
    pub fn top(&self, index: usize) -> Option<Ring> {
        self.towers.get(index).and_then(|t| t.last().copied())
    }

    pub fn ring_count(&self) -> usize {
        self.towers.iter().map(|t| t.len()).sum()
    }

    /// Sorted ring sizes across all towers.
    pub fn ring_set(&self) -> Vec<Ring> {
        let mut rings: Vec<Ring> = self.towers.iter().flatten().copied().collect();
        rings.sort_unstable();
        rings
    }

    /// Re-check the stacking invariant.
    pub fn is_valid(&self) -> bool {
        validate(&self.towers)
    }

    /// Report why `mv` is illegal here, or `Ok(())` if it is legal.
    pub fn check_move(&self, mv: Move) -> std::result::Result<(), MoveFault> {
        let tower_count = self.towers.len();
        if mv.from >= tower_count || mv.to >= tower_count {
            return Err(MoveFault::OutOfRange { tower_count });
        }
        if mv.from == mv.to {
            return Err(MoveFault::SameTower);
        }

        let ring = self.top(mv.from).ok_or(MoveFault::EmptySource)?;
        match self.top(mv.to) {
            Some(top) if top < ring => Err(MoveFault::LargerOnSmaller { ring, top }),
            _ => Ok(()),
        }
    }

    pub fn is_legal(&self, mv: Move) -> bool {
        self.check_move(mv).is_ok()
    }

    /// Apply a move, producing a new configuration.
    pub fn apply(&self, mv: Move) -> Result<Self> {
        self.check_move(mv)
            .map_err(|fault| HanoiError::InvalidMove { mv, fault })?;
        Ok(self.moved(mv))
    }

    /// Transfer the top ring. Callers must have checked legality.
    pub(crate) fn moved(&self, mv: Move) -> Self {
        let mut next = self.clone();
        if let Some(ring) = next.towers[mv.from].pop() {
            next.towers[mv.to].push(ring);
        }
        next
    }
}

impl TryFrom<Vec<Vec<Ring>>> for Configuration {
    type Error = HanoiError;

    fn try_from(towers: Vec<Vec<Ring>>) -> Result<Self> {
        Self::new(towers)
    }
}

impl From<Configuration> for Vec<Vec<Ring>> {
    fn from(config: Configuration) -> Self {
        config.towers.into_iter().map(|t| t.into_vec()).collect()
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, tower) in self.towers.iter().enumerate() {
            if index > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{:?}", tower.as_slice())?;
        }
        Ok(())
    }
}
