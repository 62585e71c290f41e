use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Maximum number of titles returned by [`Catalog::search`]
pub const SEARCH_LIMIT: usize = 15;

/// A book at a fixed position in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub position: usize,
    pub title: String,
}

/// Ordered, immutable list of book titles.
///
/// Positions are dense over `[0, len)` and double as row/column indices
/// of the similarity matrix. Titles may repeat; lookups resolve to the
/// first position in catalog order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    titles: Vec<String>,
    // lowercased titles, same order as `titles`
    folded: Vec<String>,
    // lowercased title -> first position
    index: AHashMap<String, usize>,
}

impl Catalog {
    pub fn new(titles: Vec<String>) -> Self {
        let folded: Vec<String> = titles.iter().map(|t| t.to_lowercase()).collect();

        let mut index = AHashMap::with_capacity(folded.len());
        for (position, key) in folded.iter().enumerate() {
            index.entry(key.clone()).or_insert(position);
        }

        Self { titles, folded, index }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn title(&self, position: usize) -> Option<&str> {
        self.titles.get(position).map(String::as_str)
    }

    pub fn entry(&self, position: usize) -> Option<CatalogEntry> {
        self.title(position).map(|title| CatalogEntry {
            position,
            title: title.to_string(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = CatalogEntry> + '_ {
        self.titles
            .iter()
            .enumerate()
            .map(|(position, title)| CatalogEntry { position, title: title.clone() })
    }

    /// Resolve a title to the first position whose title is equal
    /// ignoring case. No trimming or other normalization is applied.
    pub fn lookup(&self, title: &str) -> Option<usize> {
        self.index.get(&title.to_lowercase()).copied()
    }

    /// Case-insensitive substring search in catalog order, capped at
    /// [`SEARCH_LIMIT`]. An empty query matches every title.
    pub fn search(&self, query: &str) -> Vec<&str> {
        self.search_with_limit(query, SEARCH_LIMIT)
    }

    pub fn search_with_limit(&self, query: &str, limit: usize) -> Vec<&str> {
        let needle = query.to_lowercase();
        self.folded
            .iter()
            .enumerate()
            .filter(|(_, folded)| folded.contains(needle.as_str()))
            .take(limit)
            .map(|(position, _)| self.titles[position].as_str())
            .collect()
    }
}

impl From<Vec<String>> for Catalog {
    fn from(titles: Vec<String>) -> Self {
        Self::new(titles)
    }
}

impl FromIterator<String> for Catalog {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::new(vec![
            "Dune".to_string(),
            "Foundation".to_string(),
            "Neuromancer".to_string(),
        ])
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = sample();
        assert_eq!(catalog.lookup("Dune"), Some(0));
        assert_eq!(catalog.lookup("dune"), Some(0));
        assert_eq!(catalog.lookup("DUNE"), Some(0));
        assert_eq!(catalog.lookup("neuromancer"), Some(2));
    }

    #[test]
    fn test_lookup_requires_full_match() {
        let catalog = sample();
        assert_eq!(catalog.lookup("Dun"), None);
        assert_eq!(catalog.lookup(" Dune"), None);
        assert_eq!(catalog.lookup("Nonexistent Book"), None);
    }

    #[test]
    fn test_lookup_empty_string() {
        assert_eq!(sample().lookup(""), None);

        let catalog = Catalog::new(vec!["A".to_string(), String::new()]);
        assert_eq!(catalog.lookup(""), Some(1));
    }

    #[test]
    fn test_lookup_duplicate_titles_resolve_to_first() {
        let catalog = Catalog::new(vec![
            "Emma".to_string(),
            "Persuasion".to_string(),
            "EMMA".to_string(),
        ]);
        assert_eq!(catalog.lookup("emma"), Some(0));
    }

    #[test]
    fn test_search_substring_in_catalog_order() {
        let catalog = sample();
        assert_eq!(catalog.search("dun"), vec!["Dune"]);
        assert_eq!(catalog.search("N"), vec!["Dune", "Foundation", "Neuromancer"]);
        assert!(catalog.search("zzz").is_empty());
    }

    #[test]
    fn test_search_is_literal() {
        let catalog = Catalog::new(vec!["C++ Primer".to_string(), "Cat".to_string()]);
        assert_eq!(catalog.search("c++"), vec!["C++ Primer"]);
        assert!(catalog.search(".*").is_empty());
    }

    #[test]
    fn test_search_caps_results() {
        let catalog: Catalog = (0..40).map(|i| format!("Volume {}", i)).collect();

        let results = catalog.search("volume");
        assert_eq!(results.len(), SEARCH_LIMIT);
        assert_eq!(results[0], "Volume 0");
        assert_eq!(results[14], "Volume 14");

        assert_eq!(catalog.search("").len(), SEARCH_LIMIT);
        assert_eq!(catalog.search_with_limit("volume 3", 5).len(), 5);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::default();
        assert!(catalog.is_empty());
        assert!(catalog.search("").is_empty());
        assert_eq!(catalog.lookup("anything"), None);
    }

    #[test]
    fn test_entries() {
        let catalog = sample();
        assert_eq!(
            catalog.entry(1),
            Some(CatalogEntry { position: 1, title: "Foundation".to_string() })
        );
        assert_eq!(catalog.entry(3), None);
        assert_eq!(catalog.iter().count(), 3);
    }
}
