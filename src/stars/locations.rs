//! Static lookup of known star locations.
//!
//! The [`LocationTable`] maps lowercase trigger substrings to grid coordinates.
//! It is built once at startup and passed by reference to whoever resolves
//! called locations.

use log::debug;

use crate::stars::structs::StarLocation;

/// Ordered list of `(trigger, coordinates)` pairs.
///
/// # Resolution
///
/// A called location resolves to the entry whose trigger is contained in its
/// lowercased text. When several triggers match, the longest trigger wins and
/// equal lengths fall back to table order, so resolution never depends on
/// hashing order.
///
/// # Examples
///
/// ```
/// let table = LocationTable::default();
/// assert!(table.resolve("Aldarin mine").is_some());
/// assert!(table.resolve("Somewhere else").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct LocationTable {
    entries: Vec<(String, StarLocation)>,
}

impl LocationTable {
    /// Creates a table from `(trigger, location)` pairs.
    ///
    /// Triggers are lowercased so callers may pass them in any case.
    pub fn new(entries: Vec<(String, StarLocation)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(trigger, location)| (trigger.to_lowercase(), location))
            .collect();

        LocationTable { entries }
    }

    /// Resolves a called location to the coordinates of its best trigger.
    ///
    /// # Returns
    ///
    /// The matching [`StarLocation`], or `None` when the location is unmapped.
    pub fn resolve(&self, called_location: &str) -> Option<StarLocation> {
        let lowercase = called_location.to_lowercase();

        let mut best: Option<&(String, StarLocation)> = None;
        for entry in &self.entries {
            if !lowercase.contains(entry.0.as_str()) {
                continue;
            }
            if best.is_none_or(|(trigger, _)| entry.0.len() > trigger.len()) {
                best = Some(entry);
            }
        }

        match best {
            Some((trigger, location)) => {
                debug!("resolved {} to {} via {}", called_location, location, trigger);
                Some(*location)
            }
            None => None,
        }
    }

    /// Lists trigger pairs where the first trigger is contained in the second.
    ///
    /// Such pairs make resolution depend on the longest-match rule.
    pub fn overlapping_triggers(&self) -> Vec<(&str, &str)> {
        let mut overlaps = Vec::new();
        for (short, _) in &self.entries {
            for (long, _) in &self.entries {
                if short != long && long.contains(short.as_str()) {
                    overlaps.push((short.as_str(), long.as_str()));
                }
            }
        }
        overlaps
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for LocationTable {
    /// Known star locations.
    fn default() -> Self {
        LocationTable::new(vec![
            ("south east".to_owned(), StarLocation { x: 1745, y: 2954 }),
            ("hunter".to_owned(), StarLocation { x: 1487, y: 3090 }),
            ("colosseum".to_owned(), StarLocation { x: 1773, y: 3102 }),
            (
                "salvager overlook".to_owned(),
                StarLocation { x: 1627, y: 3275 },
            ),
            ("aldarin".to_owned(), StarLocation { x: 1422, y: 2874 }),
            ("custodia".to_owned(), StarLocation { x: 1290, y: 3411 }),
        ])
    }
}
