use anyhow::Result;

use crate::storage::{LocalStore, SAVED_CITIES_KEY};

pub const MAX_RECENT_CITIES: usize = 5;

/// Recently searched cities, most recent first, at most [`MAX_RECENT_CITIES`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentCities {
    cities: Vec<String>,
}

impl RecentCities {
    pub fn from_vec(cities: Vec<String>) -> Self {
        let mut recent = Self::default();
        // Oldest first so the stored order survives re-insertion.
        for city in cities.into_iter().rev() {
            recent.add(city);
        }
        recent
    }

    pub fn load(store: &LocalStore) -> Self {
        match store.get::<Vec<String>>(SAVED_CITIES_KEY) {
            Ok(Some(cities)) => Self::from_vec(cities),
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "ignoring unreadable recent cities");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &LocalStore) -> Result<()> {
        store.set(SAVED_CITIES_KEY, &self.cities)
    }

    pub fn clear(&mut self, store: &LocalStore) -> Result<()> {
        self.cities.clear();
        store.remove(SAVED_CITIES_KEY)
    }

    /// Put `city` at the front. An exact duplicate moves rather than repeats.
    pub fn add(&mut self, city: impl Into<String>) {
        let city = city.into();
        self.cities.retain(|c| *c != city);
        self.cities.insert(0, city);
        self.cities.truncate(MAX_RECENT_CITIES);
    }

    pub fn as_slice(&self) -> &[String] {
        &self.cities
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Case-insensitive substring match; a blank filter returns everything.
    pub fn matching(&self, filter: &str) -> Vec<&str> {
        let needle = filter.trim().to_lowercase();
        self.cities
            .iter()
            .filter(|c| needle.is_empty() || c.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_recent_first_and_bounded() {
        let mut recent = RecentCities::default();
        for city in ["Oslo", "Paris", "Rome", "Lima", "Cairo", "Tokyo", "Quito"] {
            recent.add(city);
        }
        assert_eq!(recent.len(), MAX_RECENT_CITIES);
        assert_eq!(recent.as_slice(), ["Quito", "Tokyo", "Cairo", "Lima", "Rome"]);
    }

    #[test]
    fn repeated_additions_never_duplicate() {
        let mut recent = RecentCities::default();
        for _ in 0..10 {
            recent.add("London");
        }
        recent.add("Paris");
        recent.add("London");
        assert_eq!(recent.as_slice(), ["London", "Paris"]);
    }

    #[test]
    fn dedup_is_exact_match() {
        let mut recent = RecentCities::default();
        recent.add("london");
        recent.add("London");
        assert_eq!(recent.len(), 2);
    }

    #[test]
    fn from_vec_enforces_invariants() {
        let stored = ["A", "B", "A", "C", "D", "E", "F", "G"].map(String::from).to_vec();
        let recent = RecentCities::from_vec(stored);
        assert_eq!(recent.as_slice(), ["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn matching_filters_case_insensitively() {
        let recent = RecentCities::from_vec(vec!["New York".into(), "Newcastle".into(), "Oslo".into()]);
        assert_eq!(recent.matching("new"), ["New York", "Newcastle"]);
        assert_eq!(recent.matching("  ").len(), 3);
        assert!(recent.matching("xyz").is_empty());
    }

    #[test]
    fn persists_through_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        let mut recent = RecentCities::default();
        recent.add("Oslo");
        recent.add("Bergen");
        recent.save(&store).unwrap();

        let stored = std::fs::read_to_string(dir.path().join("savedCities.json")).unwrap();
        assert_eq!(stored, r#"["Bergen","Oslo"]"#);
        assert_eq!(RecentCities::load(&store), recent);

        recent.clear(&store).unwrap();
        assert!(RecentCities::load(&store).is_empty());
    }
}
