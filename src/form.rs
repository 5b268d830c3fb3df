//! State behind the bookmark creation/edit form.

use crate::bookmark::{Bookmark, Category, Level, generate_id};
use crate::crs::LatLng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Identifiers of the category and level selectors, handed to the form
/// renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormPopupFields {
    pub category_input_id: String,
    pub level_input_id: String,
}

impl Default for FormPopupFields {
    fn default() -> Self {
        Self {
            category_input_id: "categoryInput".to_owned(),
            level_input_id: "levelInput".to_owned(),
        }
    }
}

/// Whether the level selector is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelVisibility {
    Hidden,
    Shown,
}

impl LevelVisibility {
    pub fn is_shown(self) -> bool {
        self == LevelVisibility::Shown
    }
}

/// Places of interest have no level; every other category does.
pub fn show_or_hide_level_selection(category: Category) -> LevelVisibility {
    match category {
        Category::PlaceOfInterest => LevelVisibility::Hidden,
        Category::Lockpick | Category::Hacking => LevelVisibility::Shown,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    /// Editing the bookmark with this id (the hidden id field).
    Edit { id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookmarkForm {
    pub mode: FormMode,
    pub latlng: LatLng,
    pub name: String,
    category: Category,
    pub level: Level,
    level_visibility: LevelVisibility,
}

impl BookmarkForm {
    /// Empty form for a new bookmark at `latlng`.
    pub fn create(latlng: LatLng) -> Self {
        let category = Category::default();
        Self {
            mode: FormMode::Create,
            latlng,
            name: String::new(),
            category,
            level: Level::default(),
            level_visibility: show_or_hide_level_selection(category),
        }
    }

    /// Form pre-filled from an existing bookmark.
    pub fn edit(bookmark: &Bookmark) -> Self {
        Self {
            mode: FormMode::Edit {
                id: bookmark.id.clone(),
            },
            latlng: bookmark.latlng,
            name: bookmark.name.clone(),
            category: bookmark.category,
            level: bookmark.level.unwrap_or_default(),
            level_visibility: show_or_hide_level_selection(bookmark.category),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    /// Whether this form edits the bookmark with `id`.
    pub fn edits(&self, id: &str) -> bool {
        matches!(&self.mode, FormMode::Edit { id: editing } if editing == id)
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn level_visibility(&self) -> LevelVisibility {
        self.level_visibility
    }

    /// Category selector change handler.
    pub fn set_category(&mut self, category: Category) {
        self.category = category;
        self.level_visibility = show_or_hide_level_selection(category);
    }

    /// Builds the bookmark described by the form.
    ///
    /// New bookmarks get the name plus a random suffix as id; edits keep
    /// their id. An empty name falls back to `"<category>: <level>"`.
    pub fn get_bookmark_data<R: Rng + ?Sized>(&self, rng: &mut R) -> Bookmark {
        let category = self.category;
        let level = self.level;

        let id = match &self.mode {
            FormMode::Create => generate_id(&self.name, rng),
            FormMode::Edit { id } => id.clone(),
        };
        let name = if self.name.is_empty() {
            format!("{category}: {level}")
        } else {
            self.name.clone()
        };

        Bookmark {
            id,
            name,
            category,
            level: Some(level),
            latlng: self.latlng,
        }
    }
}
