pub mod bookmark;
pub mod bookmarks;
pub mod crs;
pub mod form;
pub mod map_view;
pub mod store;
pub mod template;

use serde::{Deserialize, Serialize};

pub use bookmark::{Bookmark, BookmarkTemplateData, Category, Level, get_bookmark_description};
pub use bookmarks::{BookmarkEvent, BookmarksControl, BookmarksOptions};
pub use crs::{LatLng, LatLngBounds, Point};
pub use form::{BookmarkForm, FormPopupFields, LevelVisibility};
pub use map_view::{MapEvent, MapOptions, MapOptionsError, MapView};
pub use store::BookmarkStore;

/// Root type of the viewer configuration file (`map.ron`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub map: MapOptions,
    pub bookmarks: BookmarksOptions,
}

impl ViewerConfig {
    pub fn from_ron(source: &str) -> Result<Self, ron::de::SpannedError> {
        ron::from_str(source)
    }
}
