//! Discord markdown formatters for star notifications.
//!
//! Both the listing and the new star messages show stars with the longest
//! lived first, and never exceed the Discord content length limit.

use log::warn;

use crate::stars::{Star, StarLocation};

/// Maximum number of characters of a Discord message content.
pub const LISTING_CHARACTER_LIMIT: usize = 2000;

const EMPTY_LISTING: &str = "No stars at the moment :(\n";
const NEW_STARS_HINT: &str =
    "-# This is a temporary message to get your attention, use the listing";

/// Returns the stars ordered by depletion time, latest first.
///
/// The input slice is left untouched.
pub fn sorted_by_depletion(stars: &[Star]) -> Vec<&Star> {
    let mut sorted: Vec<&Star> = stars.iter().collect();
    sorted.sort_by(|a, b| b.deplete_time.cmp(&a.deplete_time));
    sorted
}

/// Formats the listing of every active star.
///
/// Lines are added until the next one would push the content, footer
/// included, over [`LISTING_CHARACTER_LIMIT`].
///
/// # Returns
///
/// The message content and the distinct locations of the displayed stars, in
/// display order.
///
/// # Examples
///
/// ```
/// let (content, locations) = format_listing(&[], "");
/// assert_eq!(content, "No stars at the moment :(\n");
/// assert!(locations.is_empty());
/// ```
pub fn format_listing(stars: &[Star], footer: &str) -> (String, Vec<StarLocation>) {
    let footer = format_footer(footer);
    let budget = LISTING_CHARACTER_LIMIT - char_count(&footer);

    let mut content = String::new();
    let mut locations: Vec<StarLocation> = Vec::new();

    if stars.is_empty() {
        content.push_str(EMPTY_LISTING);
    }

    for star in sorted_by_depletion(stars) {
        let line = format!(
            "[World {}, tier {}] {} (est. depletion: <t:{}:R>)\n",
            star.world, star.tier, star.called_location, star.deplete_time
        );
        if char_count(&content) + char_count(&line) > budget {
            warn!(
                "listing truncated, {} star(s) displayed out of {}",
                content.lines().count(),
                stars.len()
            );
            break;
        }

        content.push_str(&line);
        if !locations.contains(&star.mapped_location) {
            locations.push(star.mapped_location);
        }
    }

    content.push_str(&footer);
    (content, locations)
}

/// Formats the temporary message announcing new stars.
///
/// # Arguments
///
/// * `stars` - Stars detected since the previous poll
/// * `role_id` - Role mentioned on the first line, if any
pub fn format_new_stars(stars: &[Star], role_id: Option<&str>) -> String {
    let mut content = String::new();
    if let Some(role_id) = role_id {
        content.push_str(&format!("<@&{}>\n", role_id));
    }

    let budget = LISTING_CHARACTER_LIMIT - char_count(NEW_STARS_HINT);
    for star in sorted_by_depletion(stars) {
        let line = format!(
            "[NEW STAR] World {}, tier {}, {} (est. depletion: <t:{}:R>)\n",
            star.world, star.tier, star.called_location, star.deplete_time
        );
        if char_count(&content) + char_count(&line) > budget {
            break;
        }
        content.push_str(&line);
    }

    content.push_str(NEW_STARS_HINT);
    content
}

fn format_footer(footer: &str) -> String {
    if footer.is_empty() {
        return String::new();
    }

    let footer = format!("\n-# {}", footer);
    if char_count(&footer) + char_count(EMPTY_LISTING) > LISTING_CHARACTER_LIMIT {
        warn!("listing footer is too long, ignoring it");
        return String::new();
    }
    footer
}

fn char_count(text: &str) -> usize {
    text.chars().count()
}
