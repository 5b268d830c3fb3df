/// Width of the sidebar panel in pixels.
pub const SIDEBAR_WIDTH: f32 = 220.0;

/// Radius of a bookmark marker in pixels.
pub const MARKER_RADIUS: f32 = 7.0;

/// Extra pixels around a marker that still count as clicking it.
pub const MARKER_HIT_SLOP: f32 = 4.0;

/// Scroll distance in points that zooms by one level. A mouse wheel notch is
/// one line, which egui reports as 40 points.
pub const SCROLL_ZOOM_STEP: f32 = 40.0;

/// Gap between a marker and the popup/form window anchored to it.
pub const POPUP_OFFSET: f32 = 14.0;

/// Directory under the user data dir holding the bookmark file.
pub const DATA_DIR_NAME: &str = "wanderer-map";

pub const BOOKMARKS_FILE: &str = "bookmarks.json";
