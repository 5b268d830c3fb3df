//! Bookmarks placed by the user and the text derived from them.

use crate::crs::LatLng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a bookmark marks on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    #[default]
    PlaceOfInterest,
    Lockpick,
    Hacking,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::PlaceOfInterest,
        Category::Lockpick,
        Category::Hacking,
    ];

    /// Identifier as stored with the bookmark (`placeOfInterest`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Category::PlaceOfInterest => "placeOfInterest",
            Category::Lockpick => "lockpick",
            Category::Hacking => "hacking",
        }
    }

    /// Text shown in the category selector.
    pub fn label(self) -> &'static str {
        match self {
            Category::PlaceOfInterest => "Place of Interest",
            Category::Lockpick => "Lockpick",
            Category::Hacking => "Hacking",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Difficulty of a lockpick or hacking spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Level {
    #[default]
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::One, Level::Two, Level::Three];

    pub fn as_str(self) -> &'static str {
        match self {
            Level::One => "1",
            Level::Two => "2",
            Level::Three => "3",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-placed marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub name: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    pub latlng: LatLng,
}

impl Bookmark {
    pub fn description(&self) -> String {
        get_bookmark_description(self)
    }
}

/// Data handed to a bookmark list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkTemplateData {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl From<&Bookmark> for BookmarkTemplateData {
    fn from(bookmark: &Bookmark) -> Self {
        Self {
            id: bookmark.id.clone(),
            name: bookmark.name.clone(),
            description: bookmark.description(),
        }
    }
}

/// Secondary text of a bookmark: "Place of Interest", "Lockpick: 2", "Hacking".
pub fn get_bookmark_description(bookmark: &Bookmark) -> String {
    describe(
        bookmark.category.as_str(),
        bookmark.level.map(Level::as_str),
    )
}

/// Description for a raw category identifier and optional level.
///
/// An empty level counts as absent. Nothing else is validated: an empty
/// category capitalizes to an empty string.
pub fn describe(category: &str, level: Option<&str>) -> String {
    if category == Category::PlaceOfInterest.as_str() {
        return Category::PlaceOfInterest.label().to_owned();
    }

    let capitalized = capitalize_first(category);
    match level.filter(|level| !level.is_empty()) {
        Some(level) => format!("{capitalized}: {level}"),
        None => capitalized,
    }
}

/// Uppercases the first character and leaves the rest untouched.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Bookmark id: the name followed by a random number below 1000.
pub fn generate_id<R: Rng + ?Sized>(name: &str, rng: &mut R) -> String {
    format!("{name}{}", rng.gen_range(0..1000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn bookmark(category: Category, level: Option<Level>) -> Bookmark {
        Bookmark {
            id: "door42".to_owned(),
            name: "Door".to_owned(),
            category,
            level,
            latlng: LatLng::new(-10.0, 20.0),
        }
    }

    #[test]
    fn place_of_interest_ignores_level() {
        for level in [None, Some(Level::One), Some(Level::Two), Some(Level::Three)] {
            assert_eq!(
                bookmark(Category::PlaceOfInterest, level).description(),
                "Place of Interest"
            );
        }
    }

    #[test]
    fn lockpick_with_level() {
        assert_eq!(
            bookmark(Category::Lockpick, Some(Level::Two)).description(),
            "Lockpick: 2"
        );
    }

    #[test]
    fn hacking_without_level() {
        assert_eq!(bookmark(Category::Hacking, None).description(), "Hacking");
    }

    #[test]
    fn only_first_character_is_capitalized() {
        assert_eq!(describe("hacking", None), "Hacking");
        assert_eq!(describe("bigSafe", Some("3")), "BigSafe: 3");
    }

    #[test]
    fn empty_level_counts_as_absent() {
        assert_eq!(describe("lockpick", Some("")), "Lockpick");
    }

    #[test]
    fn empty_category_is_not_validated() {
        assert_eq!(describe("", None), "");
        assert_eq!(describe("", Some("2")), ": 2");
    }

    #[test]
    fn capitalize_handles_non_ascii() {
        assert_eq!(capitalize_first("éclair"), "Éclair");
        assert_eq!(capitalize_first("ß"), "SS");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn template_data_carries_description() {
        let data = BookmarkTemplateData::from(&bookmark(Category::Hacking, Some(Level::Three)));

        assert_eq!(
            data,
            BookmarkTemplateData {
                id: "door42".to_owned(),
                name: "Door".to_owned(),
                description: "Hacking: 3".to_owned(),
            }
        );
    }

    #[test]
    fn generated_id_appends_number_below_thousand() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let id = generate_id("Vault", &mut rng);
            let suffix: u32 = id.strip_prefix("Vault").unwrap().parse().unwrap();
            assert!(suffix < 1000);
        }
    }

    #[test]
    fn serializes_with_camel_case_identifiers() {
        let json = serde_json::to_value(bookmark(Category::PlaceOfInterest, Some(Level::One)))
            .unwrap();

        assert_eq!(json["category"], "placeOfInterest");
        assert_eq!(json["level"], "1");
        assert_eq!(json["latlng"]["lat"], -10.0);
    }
}
