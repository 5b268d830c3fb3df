//! Overlay visibility settings and drawing functions for bookmark markers.

use crate::colors;
use crate::constants::{MARKER_HIT_SLOP, MARKER_RADIUS};
use crate::coordinates::latlng_to_screen;
use eframe::egui;
use wanderer_map::{Bookmark, LatLng, MapView};

/// Controls visibility of the marker overlay.
#[derive(Clone, Copy, Default)]
pub struct OverlayVisibility {
    /// Draw every bookmark instead of only the one whose popup is open
    pub all_markers: bool,
    pub labels: bool,
}

/// A marker as placed on screen this frame.
pub struct PlacedMarker<'a> {
    pub bookmark: &'a Bookmark,
    pub pos: egui::Pos2,
}

/// Screen positions of the bookmarks that should be drawn.
pub fn place_markers<'a>(
    view: &MapView,
    viewport_rect: egui::Rect,
    bookmarks: impl Iterator<Item = &'a Bookmark>,
    selected: Option<&str>,
    overlays: &OverlayVisibility,
) -> Vec<PlacedMarker<'a>> {
    bookmarks
        .filter(|bookmark| overlays.all_markers || selected == Some(bookmark.id.as_str()))
        .map(|bookmark| PlacedMarker {
            bookmark,
            pos: latlng_to_screen(view, viewport_rect, bookmark.latlng),
        })
        .filter(|marker| viewport_rect.expand(20.0).contains(marker.pos))
        .collect()
}

/// Topmost marker under `pos`.
pub fn marker_at<'a>(markers: &[PlacedMarker<'a>], pos: egui::Pos2) -> Option<&'a Bookmark> {
    markers
        .iter()
        .rev()
        .find(|marker| marker.pos.distance(pos) <= MARKER_RADIUS + MARKER_HIT_SLOP)
        .map(|marker| marker.bookmark)
}

/// Draws bookmark markers, highlighting the selected one.
pub fn draw_markers(
    ui: &egui::Ui,
    markers: &[PlacedMarker<'_>],
    selected: Option<&str>,
    overlays: &OverlayVisibility,
) {
    let painter = ui.painter();

    for marker in markers {
        let (fill, stroke) = colors::marker_colors(marker.bookmark.category);
        let is_selected = selected == Some(marker.bookmark.id.as_str());
        let radius = if is_selected {
            MARKER_RADIUS + 2.0
        } else {
            MARKER_RADIUS
        };

        painter.circle(marker.pos, radius, fill, egui::Stroke::new(2.0, stroke));

        if overlays.labels {
            let font_id = egui::FontId::proportional(12.0);
            let text_pos = marker.pos + egui::vec2(0.0, -radius - 3.0);

            painter.text(
                text_pos + egui::vec2(1.0, 1.0),
                egui::Align2::CENTER_BOTTOM,
                &marker.bookmark.name,
                font_id.clone(),
                colors::LABEL_SHADOW,
            );
            painter.text(
                text_pos,
                egui::Align2::CENTER_BOTTOM,
                &marker.bookmark.name,
                font_id,
                colors::LABEL_TEXT,
            );
        }
    }
}

/// Draws the marker of a bookmark that is still being created.
pub fn draw_pending_marker(
    ui: &egui::Ui,
    view: &MapView,
    viewport_rect: egui::Rect,
    latlng: LatLng,
) {
    let pos = latlng_to_screen(view, viewport_rect, latlng);
    ui.painter().circle(
        pos,
        MARKER_RADIUS,
        colors::PENDING_FILL,
        egui::Stroke::new(2.0, colors::PENDING_STROKE),
    );
}
