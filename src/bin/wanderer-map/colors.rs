//! Color constants for bookmark markers and UI elements.

use eframe::egui::Color32;
use wanderer_map::Category;

// Place of interest markers
pub const POI_FILL: Color32 = Color32::from_rgb(65, 105, 225);
pub const POI_STROKE: Color32 = Color32::from_rgb(25, 25, 112);

// Lockpick markers
pub const LOCKPICK_FILL: Color32 = Color32::from_rgb(255, 165, 0);
pub const LOCKPICK_STROKE: Color32 = Color32::from_rgb(139, 69, 19);

// Hacking markers
pub const HACKING_FILL: Color32 = Color32::from_rgb(50, 205, 50);
pub const HACKING_STROKE: Color32 = Color32::from_rgb(0, 100, 0);

// Pending (unsaved) marker while the creation form is open
pub const PENDING_FILL: Color32 = Color32::from_rgba_premultiplied(255, 255, 255, 160);
pub const PENDING_STROKE: Color32 = Color32::from_rgb(40, 40, 40);

// Text colors
pub const LABEL_TEXT: Color32 = Color32::from_rgba_premultiplied(255, 255, 255, 220);
pub const LABEL_SHADOW: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 180);

/// Fill and stroke of a marker of `category`.
pub fn marker_colors(category: Category) -> (Color32, Color32) {
    match category {
        Category::PlaceOfInterest => (POI_FILL, POI_STROKE),
        Category::Lockpick => (LOCKPICK_FILL, LOCKPICK_STROKE),
        Category::Hacking => (HACKING_FILL, HACKING_STROKE),
    }
}
