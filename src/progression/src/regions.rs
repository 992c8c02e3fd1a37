//! Regions and towns derived from defeated bosses
//!
//! These are never stored on their own; every caller re-derives them from the
//! boss list so they cannot drift apart.

use std::collections::HashSet;

/// Region that is open from the start
pub const STARTING_REGION: &str = "plains";
/// Town that is open from the start
pub const STARTING_TOWN: &str = "riverside_village";
/// plains, forest, mountains, castle
pub const REGION_COUNT: usize = 4;

const REGION_UNLOCKS: [(&str, &str); 3] = [
    ("forest_guardian", "forest"),
    ("mountain_titan", "mountains"),
    ("castle_lord", "castle"),
];

const TOWN_UNLOCKS: [(&str, &str); 2] = [
    ("forest_guardian", "harbor_city"),
    ("mountain_titan", "stone_peak"),
];

fn derive(start: &str, table: &[(&str, &str)], defeated: &[String]) -> Vec<String> {
    let defeated: HashSet<&str> = defeated.iter().map(String::as_str).collect();
    std::iter::once(start)
        .chain(
            table
                .iter()
                .filter(|(boss, _)| defeated.contains(boss))
                .map(|(_, unlocked)| *unlocked),
        )
        .map(str::to_string)
        .collect()
}

pub fn unlocked_regions(defeated: &[String]) -> Vec<String> {
    derive(STARTING_REGION, &REGION_UNLOCKS, defeated)
}

pub fn unlocked_towns(defeated: &[String]) -> Vec<String> {
    derive(STARTING_TOWN, &TOWN_UNLOCKS, defeated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bosses(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn starting_content_is_always_open() {
        assert_eq!(unlocked_regions(&[]), vec!["plains"]);
        assert_eq!(unlocked_towns(&[]), vec!["riverside_village"]);
    }

    #[test]
    fn order_follows_the_story_not_the_kill_order() {
        let defeated = bosses(&["mountain_titan", "shadow_lord", "forest_guardian"]);
        assert_eq!(
            unlocked_regions(&defeated),
            vec!["plains", "forest", "mountains"]
        );
        assert_eq!(
            unlocked_towns(&defeated),
            vec!["riverside_village", "harbor_city", "stone_peak"]
        );
    }
}
