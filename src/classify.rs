//! Road name classification.
//!
//! A [`RoadTypeMap`] is an ordered list of `pattern → label` entries, usually
//! loaded from a flat JSON object such as:
//!
//! ```json
//! { "Autobahn": "motorway", "Straße": "street", "Weg": "path" }
//! ```
//!
//! A road name is classified by the first entry whose pattern occurs anywhere
//! in the name. Names that match nothing are their own label.

use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

/// Ordered substring → road-type label table.
///
/// Entry order is significant: it is the order patterns are tried in. When
/// deserialized from JSON, entries keep document order; a repeated pattern
/// stays at its first position and takes the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoadTypeMap {
    entries: Vec<(String, String)>,
}

impl RoadTypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Later entries only apply if no earlier pattern matches.
    pub fn insert(&mut self, pattern: impl Into<String>, label: impl Into<String>) {
        self.entries.push((pattern.into(), label.into()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in match order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Label of the first entry whose pattern is contained in `road_name`.
    pub fn lookup(&self, road_name: &str) -> Option<&str> {
        self.iter()
            .find(|(pattern, _)| road_name.contains(pattern))
            .map(|(_, label)| label)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RoadTypeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = RoadTypeMap::new();
        for (pattern, label) in iter {
            map.insert(pattern, label);
        }
        map
    }
}

impl<'de> Deserialize<'de> for RoadTypeMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RoadTypeMapVisitor;

        impl<'de> Visitor<'de> for RoadTypeMapVisitor {
            type Value = RoadTypeMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping road name patterns to road type labels")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = RoadTypeMap::new();
                while let Some((pattern, label)) = access.next_entry::<String, String>()? {
                    match map.entries.iter_mut().find(|(existing, _)| *existing == pattern) {
                        Some(entry) => entry.1 = label,
                        None => map.insert(pattern, label),
                    }
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(RoadTypeMapVisitor)
    }
}

/// Classify a road name into a road-type label.
///
/// Returns the label of the first matching entry, or `road_name` itself when the
/// map is empty or nothing matches. Callers without a map pass
/// `&RoadTypeMap::default()`.
///
/// # Example
/// ```
/// use road_matcher::{classify, RoadTypeMap};
///
/// let map: RoadTypeMap = [("Main", "arterial")].into_iter().collect();
/// assert_eq!(classify("Main St", &map), "arterial");
/// assert_eq!(classify("Oak Ave", &map), "Oak Ave");
/// assert_eq!(classify("Oak Ave", &RoadTypeMap::default()), "Oak Ave");
/// ```
pub fn classify<'a>(road_name: &'a str, road_type_map: &'a RoadTypeMap) -> &'a str {
    road_type_map.lookup(road_name).unwrap_or(road_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_match_and_fallback() {
        let map: RoadTypeMap = [("Main", "arterial")].into_iter().collect();
        assert_eq!(classify("Main St", &map), "arterial");
        assert_eq!(classify("Oak Ave", &map), "Oak Ave");
    }

    #[test]
    fn test_empty_map_is_identity() {
        let map = RoadTypeMap::new();
        assert_eq!(classify("Elm Road", &map), "Elm Road");
    }

    #[test]
    fn test_first_entry_wins() {
        let map: RoadTypeMap = [("Ring", "ring"), ("Road", "road")].into_iter().collect();
        assert_eq!(classify("Ring Road", &map), "ring");

        let map: RoadTypeMap = [("Road", "road"), ("Ring", "ring")].into_iter().collect();
        assert_eq!(classify("Ring Road", &map), "road");
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let map: RoadTypeMap = [("street", "residential")].into_iter().collect();
        assert_eq!(classify("Baker Street", &map), "Baker Street");
        assert_eq!(classify("Baker street", &map), "residential");
    }

    #[test]
    fn test_empty_pattern_matches_everything() {
        let map: RoadTypeMap = [("Lane", "lane"), ("", "other")].into_iter().collect();
        assert_eq!(classify("Penny Lane", &map), "lane");
        assert_eq!(classify("Abbey Road", &map), "other");
    }

    #[test]
    fn test_deserialize_keeps_document_order() {
        let map: RoadTypeMap =
            serde_json::from_str(r#"{ "Weg": "path", "Autobahn": "motorway", "Bahn": "rail" }"#)
                .unwrap();
        let patterns: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(patterns, vec!["Weg", "Autobahn", "Bahn"]);

        // "Autobahn" comes before "Bahn", so it wins even though both match
        assert_eq!(classify("Autobahn A9", &map), "motorway");
    }

    #[test]
    fn test_deserialize_rejects_bad_input() {
        assert!(serde_json::from_str::<RoadTypeMap>(r#"{ "Main": 3 }"#).is_err());
        assert!(serde_json::from_str::<RoadTypeMap>(r#"["Main", "arterial"]"#).is_err());
    }

    #[test]
    fn test_deserialize_repeated_pattern_keeps_position_takes_last_label() {
        let map: RoadTypeMap =
            serde_json::from_str(r#"{ "Lane": "lane", "Road": "road", "Lane": "alley" }"#).unwrap();
        let entries: Vec<(&str, &str)> = map.iter().collect();
        assert_eq!(entries, vec![("Lane", "alley"), ("Road", "road")]);
        assert_eq!(classify("Lane Road", &map), "alley");
    }
}
