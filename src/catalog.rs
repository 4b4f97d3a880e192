use std::collections::HashMap;

use crate::profile::CollegeProfile;

/// Resolves a college identifier to its published statistics.
///
/// Name matching and data loading live behind this seam; the estimator only
/// sees a resolved `CollegeProfile`.
pub trait CollegeResolver {
    fn resolve(&self, key: &str) -> Option<&CollegeProfile>;
}

/// Normalise a lookup key: trimmed, lower-cased, inner whitespace collapsed.
pub fn normalize_key(key: &str) -> String {
    key.split_whitespace()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Explicitly constructed lookup of college profiles, shared read-only once built.
///
/// Keys are stored normalised, so "  Example  College" and "example college"
/// resolve to the same entry. Aliases map alternate names onto a canonical key.
#[derive(Clone, Debug, Default)]
pub struct CollegeCatalog {
    colleges: HashMap<String, CollegeProfile>,
    aliases: HashMap<String, String>,
}

impl CollegeCatalog {
    pub fn new() -> Self {
        CollegeCatalog::default()
    }

    /// Build a catalog keyed by each profile's name.
    pub fn from_profiles(profiles: impl IntoIterator<Item = CollegeProfile>) -> Self {
        let mut catalog = CollegeCatalog::new();
        for profile in profiles {
            catalog.insert(profile);
        }
        catalog
    }

    /// Add or replace a profile under its normalised name.
    pub fn insert(&mut self, profile: CollegeProfile) {
        self.colleges.insert(normalize_key(&profile.name), profile);
    }

    /// Register an alternate name. Returns false if `canonical` is unknown.
    pub fn add_alias(&mut self, alias: &str, canonical: &str) -> bool {
        let canonical = normalize_key(canonical);
        if !self.colleges.contains_key(&canonical) {
            return false;
        }
        self.aliases.insert(normalize_key(alias), canonical);
        true
    }

    pub fn remove(&mut self, name: &str) -> Option<CollegeProfile> {
        let key = normalize_key(name);
        self.aliases.retain(|_, canonical| *canonical != key);
        self.colleges.remove(&key)
    }

    pub fn get(&self, name: &str) -> Option<&CollegeProfile> {
        let key = normalize_key(name);
        self.colleges.get(&key).or_else(|| {
            self.aliases
                .get(&key)
                .and_then(|canonical| self.colleges.get(canonical))
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.colleges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colleges.is_empty()
    }

    pub fn profiles(&self) -> impl Iterator<Item = &CollegeProfile> {
        self.colleges.values()
    }
}

impl CollegeResolver for CollegeCatalog {
    fn resolve(&self, key: &str) -> Option<&CollegeProfile> {
        self.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> CollegeCatalog {
        CollegeCatalog::from_profiles(vec![
            CollegeProfile::new("Example College", 0.2),
            CollegeProfile::new("State University", 0.7),
        ])
    }

    #[test]
    fn test_normalized_lookup() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("example college"));
        assert!(catalog.contains("  EXAMPLE   College "));
        assert!(!catalog.contains("Example"));
    }

    #[test]
    fn test_alias() {
        let mut catalog = catalog();
        assert!(catalog.add_alias("SU", "state university"));
        assert_eq!(catalog.resolve("su").unwrap().name, "State University");
        assert!(!catalog.add_alias("XU", "Unknown U"));
    }

    #[test]
    fn test_remove_drops_aliases() {
        let mut catalog = catalog();
        catalog.add_alias("EC", "Example College");
        assert!(catalog.remove("Example College").is_some());
        assert!(!catalog.contains("EC"));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_insert_replaces() {
        let mut catalog = catalog();
        catalog.insert(CollegeProfile::new("example college", 0.25));
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("Example College").unwrap().acceptance_rate, Some(0.25));
    }
}
