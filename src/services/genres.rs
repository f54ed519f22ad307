//! Mood text to Spotify seed genres.
//!
//! Substring rules evaluated in a fixed order; the first match wins. The
//! fallback set guarantees the result is never empty.

/// An ordered set of Spotify seed-genre identifiers. Construction goes
/// through [`seed_genres`], so the set always holds at least one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreSeeds(Vec<&'static str>);

impl GenreSeeds {
    pub fn as_slice(&self) -> &[&'static str] {
        &self.0
    }

    /// Comma-joined value for the `seed_genres` query parameter. Spotify
    /// expects literal commas, not `%2C`.
    pub fn as_param(&self) -> String {
        self.0.join(",")
    }
}

/// Map mood text to seed genres, case-insensitively, first rule wins.
pub fn seed_genres(mood: &str) -> GenreSeeds {
    let mood = mood.to_lowercase();
    let contains_any = |words: &[&str]| words.iter().any(|w| mood.contains(w));

    let seeds: &[&'static str] = if contains_any(&["sad", "melancholy"]) {
        &["ambient", "acoustic", "chill"]
    } else if contains_any(&["happy", "joyful", "cheery"]) {
        &["pop", "dance", "chill"]
    } else if contains_any(&["angry", "aggressive", "intense"]) {
        &["rock", "metal", "edm"]
    } else if mood.contains("relaxed") {
        &["chill", "acoustic"]
    } else {
        &["pop", "chill", "acoustic"]
    };

    GenreSeeds(seeds.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sad_moods_lead_with_ambient() {
        for mood in ["sad", "I feel so sad today", "a MELANCHOLY evening"] {
            let seeds = seed_genres(mood);
            assert_eq!(seeds.as_slice()[0], "ambient", "mood: {}", mood);
        }
    }

    #[test]
    fn happy_moods_lead_with_pop() {
        for mood in ["happy", "Joyful and bright", "feeling cheery"] {
            let seeds = seed_genres(mood);
            assert_eq!(seeds.as_slice()[0], "pop", "mood: {}", mood);
        }
    }

    #[test]
    fn angry_moods_map_to_rock_metal_edm() {
        assert_eq!(
            seed_genres("intense workout energy").as_slice(),
            &["rock", "metal", "edm"]
        );
    }

    #[test]
    fn relaxed_maps_to_chill_acoustic() {
        assert_eq!(
            seed_genres("very relaxed tonight").as_slice(),
            &["chill", "acoustic"]
        );
    }

    #[test]
    fn unmatched_moods_get_the_fallback_set() {
        let seeds = seed_genres("contemplative fog");
        assert_eq!(seeds.as_slice(), &["pop", "chill", "acoustic"]);
        assert!(!seeds.as_slice().is_empty());
    }

    #[test]
    fn first_matching_rule_wins() {
        // "sad" is checked before "happy"
        assert_eq!(seed_genres("happy but sad").as_slice()[0], "ambient");
    }

    #[test]
    fn param_joins_with_literal_commas() {
        assert_eq!(seed_genres("joyful").as_param(), "pop,dance,chill");
    }
}
