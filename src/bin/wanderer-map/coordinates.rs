//! Conversions between the map view's pixel space and egui screen space.

use eframe::egui;
use wanderer_map::{LatLng, LatLngBounds, MapView, Point};

pub fn to_point(v: egui::Vec2) -> Point {
    Point::new(f64::from(v.x), f64::from(v.y))
}

/// Screen position to a point relative to the viewport's top-left corner.
pub fn screen_to_container(viewport_rect: egui::Rect, pos: egui::Pos2) -> Point {
    to_point(pos - viewport_rect.min)
}

pub fn container_to_screen(viewport_rect: egui::Rect, point: Point) -> egui::Pos2 {
    viewport_rect.min + egui::vec2(point.x as f32, point.y as f32)
}

pub fn latlng_to_screen(view: &MapView, viewport_rect: egui::Rect, latlng: LatLng) -> egui::Pos2 {
    container_to_screen(viewport_rect, view.latlng_to_container_point(latlng))
}

pub fn screen_to_latlng(view: &MapView, viewport_rect: egui::Rect, pos: egui::Pos2) -> LatLng {
    view.container_point_to_latlng(screen_to_container(viewport_rect, pos))
}

/// Screen rectangle covered by a map-space rectangle.
pub fn bounds_to_screen(
    view: &MapView,
    viewport_rect: egui::Rect,
    bounds: &LatLngBounds,
) -> egui::Rect {
    egui::Rect::from_two_pos(
        latlng_to_screen(view, viewport_rect, bounds.north_west()),
        latlng_to_screen(view, viewport_rect, bounds.south_east()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use wanderer_map::MapOptions;

    #[test]
    fn overlay_fills_viewport_when_zoomed_in() {
        let mut view = MapView::initialize(&MapOptions::default());
        let viewport_rect = egui::Rect::from_min_size(egui::pos2(200.0, 30.0), egui::vec2(640.0, 480.0));
        view.set_size(to_point(viewport_rect.size()));

        let bounds = view.overlay().unwrap().bounds;
        let overlay_rect = bounds_to_screen(&view, viewport_rect, &bounds);

        assert!(overlay_rect.contains_rect(viewport_rect));
        assert_eq!(overlay_rect.width(), 960.0);
    }

    #[test]
    fn screen_round_trip() {
        let mut view = MapView::initialize(&MapOptions::default());
        let viewport_rect = egui::Rect::from_min_size(egui::pos2(220.0, 0.0), egui::vec2(800.0, 600.0));
        view.set_size(to_point(viewport_rect.size()));
        let pos = egui::pos2(400.0, 250.0);

        let back = latlng_to_screen(&view, viewport_rect, screen_to_latlng(&view, viewport_rect, pos));

        assert!((back - pos).length() < 1e-3);
    }
}
