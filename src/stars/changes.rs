//! Detection of stars that appeared since the previous poll.

use std::collections::HashSet;

use log::info;

use crate::stars::structs::{Star, StarKey};

/// Returns the stars of `current` that were not present in `previous`.
///
/// Stars are compared by [`StarKey`]. Without a previous poll nothing is
/// considered new, so a restart never re-announces the stars already listed.
///
/// # Arguments
///
/// * `current` - Stars of this poll
/// * `previous` - Stars of the previous successful poll, if any
///
/// # Returns
///
/// The new stars, in the order of `current`.
pub fn detect_new_stars(current: &[Star], previous: Option<&[Star]>) -> Vec<Star> {
    let Some(previous) = previous else {
        return vec![];
    };

    let known: HashSet<StarKey> = previous.iter().map(Star::key).collect();

    current
        .iter()
        .filter(|star| !known.contains(&star.key()))
        .inspect(|star| info!("new star {}", star))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stars::structs::StarLocation;

    fn create_test_star(world: u32, location: u32, called_location: &str) -> Star {
        Star {
            location,
            called_location: called_location.to_string(),
            mapped_location: StarLocation { x: 1422, y: 2874 },
            tier: 4,
            world,
            called_at: 1_000,
            min_time: 0,
            max_time: 0,
            deplete_time: 2_680,
        }
    }

    #[test]
    fn test_first_poll_has_no_new_stars() {
        let current = vec![create_test_star(420, 302, "Aldarin mine")];

        assert!(detect_new_stars(&current, None).is_empty());
    }

    #[test]
    fn test_unchanged_poll_has_no_new_stars() {
        let current = vec![
            create_test_star(420, 302, "Aldarin mine"),
            create_test_star(330, 4, "Custodia pass"),
        ];

        assert!(detect_new_stars(&current, Some(current.as_slice())).is_empty());
    }

    #[test]
    fn test_detects_star_on_new_location_slot() {
        let previous = vec![create_test_star(420, 302, "Aldarin mine")];
        let current = vec![
            create_test_star(420, 302, "Aldarin mine"),
            create_test_star(420, 4, "Aldarin mine"),
        ];

        let new_stars = detect_new_stars(&current, Some(previous.as_slice()));

        assert_eq!(new_stars, vec![create_test_star(420, 4, "Aldarin mine")]);
    }

    #[test]
    fn test_tier_change_is_not_new() {
        let previous = vec![create_test_star(420, 302, "Aldarin mine")];
        let mut current = previous.clone();
        current[0].tier = 3;

        assert!(detect_new_stars(&current, Some(previous.as_slice())).is_empty());
    }

    #[test]
    fn test_result_is_subset_of_current_in_order() {
        let previous = vec![
            create_test_star(1, 1, "a"),
            create_test_star(2, 2, "b"),
        ];
        let current = vec![
            create_test_star(3, 3, "c"),
            create_test_star(2, 2, "b"),
            create_test_star(1, 1, "changed"),
            create_test_star(4, 4, "d"),
        ];

        let new_stars = detect_new_stars(&current, Some(previous.as_slice()));

        let worlds: Vec<u32> = new_stars.iter().map(|s| s.world).collect();
        assert_eq!(worlds, vec![3, 1, 4]);
        assert!(new_stars.iter().all(|s| current.contains(s)));
        assert!(
            new_stars
                .iter()
                .all(|s| !previous.iter().any(|p| p.key() == s.key()))
        );
    }

    #[test]
    fn test_empty_previous_poll_marks_everything_new() {
        let current = vec![create_test_star(420, 302, "Aldarin mine")];

        assert_eq!(detect_new_stars(&current, Some(&[][..])).len(), 1);
    }
}
