//! Internal data structures for representing active stars.
//!
//! This module defines the core data structures used internally to represent
//! stars that survived filtering and location resolution.

use std::fmt;

/// Number of seconds a single star tier takes to deplete.
pub const SECONDS_PER_TIER: i64 = 420;

/// Grid coordinates of a known star location.
///
/// Values are copied out of the [`LocationTable`](crate::stars::LocationTable),
/// a star never owns the table entry itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StarLocation {
    /// World map x coordinate
    pub x: i32,
    /// World map y coordinate
    pub y: i32,
}

impl fmt::Display for StarLocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}_{}", self.x, self.y)
    }
}

/// Identity of a star across polls.
///
/// Two stars are the same star when they share world, location slot and the
/// raw called location text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StarKey {
    pub world: u32,
    pub location: u32,
    pub called_location: String,
}

/// Represents an active star with its resolved location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Star {
    /// Location slot reported by the API
    pub location: u32,
    /// Free text description of where the star landed
    pub called_location: String,
    /// Coordinates resolved from `called_location`
    pub mapped_location: StarLocation,
    /// Star size, 1 to 10
    pub tier: u32,
    /// World the star landed on
    pub world: u32,
    /// Unix timestamp, in seconds, of when the star was called
    pub called_at: i64,
    /// Lower bound of the landing window, in seconds
    pub min_time: i64,
    /// Upper bound of the landing window, in seconds
    pub max_time: i64,
    /// Unix timestamp, in seconds, of the estimated depletion
    pub deplete_time: i64,
}

impl Star {
    /// Returns the identity used to compare stars between two polls.
    pub fn key(&self) -> StarKey {
        StarKey {
            world: self.world,
            location: self.location,
            called_location: self.called_location.clone(),
        }
    }
}

impl fmt::Display for Star {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "world={}, tier={}, location={}, called_location={}, deplete_time={}",
            self.world, self.tier, self.location, self.called_location, self.deplete_time
        )
    }
}

/// Computes the estimated depletion timestamp of a star.
///
/// # Arguments
///
/// * `called_at` - Unix timestamp, in seconds, of when the star was called
/// * `tier` - Star size
///
/// Returns `None` when the timestamp does not fit in an `i64`.
pub fn deplete_time(called_at: i64, tier: u32) -> Option<i64> {
    called_at.checked_add(i64::from(tier) * SECONDS_PER_TIER)
}
