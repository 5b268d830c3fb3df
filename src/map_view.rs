//! View state of the image map: centre, zoom, viewport size and the bounds
//! the viewport is confined to.

use crate::crs::{Bounds, LatLng, LatLngBounds, Point, SimpleCrs};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Startup parameters of the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    /// Path of the image laid over the map, looked up in embedded assets first
    pub image_path: String,
    /// Image dimensions in pixels [width, height]; assumed, not verified
    pub image_size: [u32; 2],
    /// Initial centre [lat, lng]
    pub center: [f64; 2],
    pub min_zoom: i32,
    pub max_zoom: i32,
    /// Resistance when dragging across the max bounds (1.0 = none allowed)
    pub max_bounds_viscosity: f64,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            image_path: "images/map.png".to_owned(),
            image_size: [1920, 1915],
            center: [0.0, 118.0],
            min_zoom: 2,
            max_zoom: 4,
            max_bounds_viscosity: 1.0,
        }
    }
}

/// Map options that cannot produce a usable view.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapOptionsError {
    #[error("min_zoom {min_zoom} is greater than max_zoom {max_zoom}")]
    ZoomRange { min_zoom: i32, max_zoom: i32 },
}

impl MapOptions {
    pub fn validate(&self) -> Result<(), MapOptionsError> {
        if self.min_zoom > self.max_zoom {
            return Err(MapOptionsError::ZoomRange {
                min_zoom: self.min_zoom,
                max_zoom: self.max_zoom,
            });
        }
        Ok(())
    }
}

/// A static image stretched across a rectangle of map space.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageOverlay {
    pub image_path: String,
    pub bounds: LatLngBounds,
}

/// Events the map emits towards the bookmarks control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    /// Request to open the creation form at a coordinate.
    NewBookmark { latlng: LatLng },
}

pub struct MapView {
    crs: SimpleCrs,
    center: LatLng,
    initial_center: LatLng,
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
    size: Point,
    max_bounds: Option<LatLngBounds>,
    viscosity: f64,
    overlay: Option<ImageOverlay>,
}

impl MapView {
    /// Creates an unconstrained view at the configured centre and minimum zoom.
    /// A reversed zoom range is swapped.
    pub fn new(options: &MapOptions) -> Self {
        let center = LatLng::from(options.center);
        let (a, b) = (f64::from(options.min_zoom), f64::from(options.max_zoom));
        let (min_zoom, max_zoom) = (a.min(b), a.max(b));

        Self {
            crs: SimpleCrs,
            center,
            initial_center: center,
            zoom: min_zoom,
            min_zoom,
            max_zoom,
            size: Point::ZERO,
            max_bounds: None,
            viscosity: options.max_bounds_viscosity.clamp(0.0, 1.0),
            overlay: None,
        }
    }

    /// Builds the map: overlays the image across its bounds and confines the
    /// viewport to them.
    pub fn initialize(options: &MapOptions) -> Self {
        let mut view = Self::new(options);
        view.set_view(view.initial_center, view.min_zoom);

        let bounds = view.image_bounds(options.image_size);
        view.add_image_overlay(ImageOverlay {
            image_path: options.image_path.clone(),
            bounds,
        });
        view.set_max_bounds(bounds);

        log::debug!(
            "Map initialized: image {} bounds {:?} -> {:?}",
            options.image_path,
            bounds.south_west(),
            bounds.north_east()
        );

        view
    }

    /// The south-west and north-east corners of an image of `image_size`
    /// pixels, unprojected at the zoom level below the maximum.
    pub fn bounds_corners(&self, image_size: [u32; 2]) -> (LatLng, LatLng) {
        let [width, height] = image_size.map(f64::from);
        let zoom = self.max_zoom - 1.0;

        let south_west = self.crs.unproject(Point::new(0.0, height), zoom);
        let north_east = self.crs.unproject(Point::new(width, 0.0), zoom);
        (south_west, north_east)
    }

    /// Edges of the image in map space.
    pub fn image_bounds(&self, image_size: [u32; 2]) -> LatLngBounds {
        let (south_west, north_east) = self.bounds_corners(image_size);
        LatLngBounds::new(south_west, north_east)
    }

    pub fn add_image_overlay(&mut self, overlay: ImageOverlay) {
        self.overlay = Some(overlay);
    }

    pub fn overlay(&self) -> Option<&ImageOverlay> {
        self.overlay.as_ref()
    }

    pub fn set_max_bounds(&mut self, bounds: LatLngBounds) {
        self.max_bounds = Some(bounds);
        self.pan_inside_max_bounds();
    }

    pub fn max_bounds(&self) -> Option<LatLngBounds> {
        self.max_bounds
    }

    pub fn crs(&self) -> &SimpleCrs {
        &self.crs
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn min_zoom(&self) -> f64 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    pub fn size(&self) -> Point {
        self.size
    }

    /// Updates the viewport size in pixels.
    pub fn set_size(&mut self, size: Point) {
        if size == self.size {
            return;
        }
        self.size = size;
        self.pan_inside_max_bounds();
    }

    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.zoom = self.clamp_zoom(zoom);
        self.center = self.limit_center(center, self.zoom);
    }

    /// Returns to the initial centre at the minimum zoom.
    pub fn reset_view(&mut self) {
        self.set_view(self.initial_center, self.min_zoom);
    }

    /// Centres the view on `latlng` keeping the current zoom.
    pub fn fly_to(&mut self, latlng: LatLng) {
        self.set_view(latlng, self.zoom);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom_around(self.size / 2.0, self.zoom + 1.0);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom_around(self.size / 2.0, self.zoom - 1.0);
    }

    /// Zooms while keeping the coordinate under `container_point` in place.
    pub fn set_zoom_around(&mut self, container_point: Point, zoom: f64) {
        let zoom = self.clamp_zoom(zoom);
        let scale = self.crs.scale(zoom - self.zoom);
        let view_half = self.size / 2.0;
        let center_offset = (container_point - view_half) * (1.0 - 1.0 / scale);
        let new_center = self.container_point_to_latlng(view_half + center_offset);

        self.set_view(new_center, zoom);
    }

    /// Drags the view by `offset` pixels. Overshoot past the max bounds is
    /// damped by the viscosity.
    pub fn pan_by(&mut self, offset: Point) {
        let target = self.crs.project(self.center, self.zoom) + offset;
        let candidate = self.crs.unproject(target, self.zoom);
        let limited = self
            .crs
            .project(self.limit_center(candidate, self.zoom), self.zoom);

        let damped = target + (limited - target) * self.viscosity;
        self.center = self.crs.unproject(damped, self.zoom);
    }

    /// Snaps the view back inside the max bounds (end of a drag).
    pub fn pan_inside_max_bounds(&mut self) {
        self.center = self.limit_center(self.center, self.zoom);
    }

    /// Whether the whole viewport lies within the max bounds.
    pub fn is_inside_max_bounds(&self) -> bool {
        self.max_bounds.is_none_or(|max_bounds| {
            self.crs
                .project_bounds(&max_bounds, self.zoom)
                .contains_bounds(&self.pixel_bounds())
        })
    }

    /// The centre closest to `center` whose view at `zoom` stays inside the
    /// max bounds. On an axis where the view is larger than the bounds, the
    /// bounds are centred instead.
    pub fn limit_center(&self, center: LatLng, zoom: f64) -> LatLng {
        let Some(max_bounds) = self.max_bounds else {
            return center;
        };

        let center_point = self.crs.project(center, zoom);
        let view_half = self.size / 2.0;
        let view = Bounds {
            min: center_point - view_half,
            max: center_point + view_half,
        };
        let allowed = self.crs.project_bounds(&max_bounds, zoom);

        let min_offset = allowed.min - view.min;
        let max_offset = allowed.max - view.max;
        let offset = Point::new(
            rebound(min_offset.x, -max_offset.x),
            rebound(min_offset.y, -max_offset.y),
        );

        if offset == Point::ZERO {
            return center;
        }
        self.crs.unproject(center_point + offset, zoom)
    }

    /// Projected pixel coordinate of the viewport's top-left corner.
    pub fn pixel_origin(&self) -> Point {
        self.crs.project(self.center, self.zoom) - self.size / 2.0
    }

    /// The viewport in projected pixels.
    pub fn pixel_bounds(&self) -> Bounds {
        let origin = self.pixel_origin();
        Bounds {
            min: origin,
            max: origin + self.size,
        }
    }

    pub fn latlng_to_container_point(&self, latlng: LatLng) -> Point {
        self.crs.project(latlng, self.zoom) - self.pixel_origin()
    }

    pub fn container_point_to_latlng(&self, point: Point) -> LatLng {
        self.crs.unproject(point + self.pixel_origin(), self.zoom)
    }

    /// Right-click on the map: request a new bookmark at the clicked spot.
    pub fn context_menu(&self, container_point: Point) -> MapEvent {
        MapEvent::NewBookmark {
            latlng: self.container_point_to_latlng(container_point),
        }
    }
}

/// Shift needed on one axis; `left` is how far the view sticks out past the
/// low edge, `right` past the high edge.
fn rebound(left: f64, right: f64) -> f64 {
    if left + right > 0.0 {
        (left - right) / 2.0
    } else {
        left.max(0.0) - right.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn initialized(size: Point) -> MapView {
        let mut view = MapView::initialize(&MapOptions::default());
        view.set_size(size);
        view
    }

    fn assert_view_inside_bounds(view: &MapView) {
        let allowed = view
            .crs()
            .project_bounds(&view.max_bounds().unwrap(), view.zoom());
        let eps = Point::new(1e-6, 1e-6);
        let tolerance = Bounds {
            min: allowed.min - eps,
            max: allowed.max + eps,
        };
        let visible = view.pixel_bounds();
        assert!(tolerance.contains_bounds(&visible), "{visible:?} vs {allowed:?}");
    }

    #[test]
    fn starts_at_minimum_zoom() {
        let view = MapView::initialize(&MapOptions::default());

        assert_relative_eq!(view.zoom(), 2.0);
        assert_relative_eq!(view.min_zoom(), 2.0);
        assert_relative_eq!(view.max_zoom(), 4.0);
    }

    #[test]
    fn overlay_and_max_bounds_are_the_image_bounds() {
        let view = MapView::initialize(&MapOptions::default());

        let overlay = view.overlay().unwrap();
        assert_eq!(Some(overlay.bounds), view.max_bounds());
        assert_eq!(overlay.image_path, "images/map.png");
        assert_eq!(overlay.bounds.south_west(), LatLng::new(-239.375, 0.0));
        assert_eq!(overlay.bounds.north_east(), LatLng::new(0.0, 240.0));
    }

    #[test]
    fn bounds_corners_are_distinct_and_ordered() {
        let view = MapView::initialize(&MapOptions::default());
        let (south_west, north_east) = view.bounds_corners([1920, 1915]);

        assert_ne!(south_west, north_east);
        let zoom = view.max_zoom() - 1.0;
        let sw_pixel = view.crs().project(south_west, zoom);
        let ne_pixel = view.crs().project(north_east, zoom);
        assert!(sw_pixel.y >= ne_pixel.y);
        assert!(sw_pixel.x <= ne_pixel.x);
    }

    #[test]
    fn initial_center_is_pulled_inside_bounds() {
        let view = initialized(Point::new(400.0, 300.0));

        assert_view_inside_bounds(&view);
        // (0, 118) sits on the top edge, so only the latitude moves
        assert_relative_eq!(view.center().lng, 118.0);
        assert!(view.center().lat < 0.0);
    }

    #[test]
    fn panning_never_leaves_the_bounds() {
        let mut view = initialized(Point::new(400.0, 300.0));

        for offset in [
            Point::new(-5000.0, 0.0),
            Point::new(0.0, -5000.0),
            Point::new(10_000.0, 10_000.0),
            Point::new(-3.0, 7.0),
        ] {
            view.pan_by(offset);
            assert_view_inside_bounds(&view);
        }
    }

    #[test]
    fn panning_inside_bounds_moves_freely() {
        let mut view = initialized(Point::new(200.0, 200.0));
        view.set_zoom_around(Point::new(100.0, 100.0), 4.0);
        let before = view.latlng_to_container_point(LatLng::new(-120.0, 120.0));

        view.pan_by(Point::new(10.0, -20.0));

        let after = view.latlng_to_container_point(LatLng::new(-120.0, 120.0));
        assert_relative_eq!(after.x, before.x - 10.0, epsilon = 1e-9);
        assert_relative_eq!(after.y, before.y + 20.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_viscosity_allows_overshoot_until_settled() {
        let options = MapOptions {
            max_bounds_viscosity: 0.0,
            ..MapOptions::default()
        };
        let mut view = MapView::initialize(&options);
        view.set_size(Point::new(400.0, 300.0));

        view.pan_by(Point::new(-5000.0, 0.0));
        assert!(view.pixel_bounds().min.x < 0.0);
        assert!(!view.is_inside_max_bounds());

        view.pan_inside_max_bounds();
        assert_view_inside_bounds(&view);
    }

    #[test]
    fn view_larger_than_image_is_centred() {
        let view = initialized(Point::new(2000.0, 2000.0));

        assert_relative_eq!(view.center().lat, -239.375 / 2.0, epsilon = 1e-9);
        assert_relative_eq!(view.center().lng, 120.0, epsilon = 1e-9);
    }

    #[test]
    fn reversed_zoom_range_is_swapped() {
        let options = MapOptions {
            min_zoom: 5,
            max_zoom: 4,
            ..MapOptions::default()
        };
        assert_eq!(
            options.validate(),
            Err(MapOptionsError::ZoomRange {
                min_zoom: 5,
                max_zoom: 4
            })
        );

        let mut view = MapView::initialize(&options);
        view.set_size(Point::new(400.0, 300.0));

        assert_relative_eq!(view.min_zoom(), 4.0);
        assert_relative_eq!(view.max_zoom(), 5.0);
        assert_relative_eq!(view.zoom(), 4.0);
        assert!(view.is_inside_max_bounds());
    }

    #[test]
    fn zoom_is_clamped() {
        let mut view = initialized(Point::new(400.0, 300.0));

        view.zoom_out();
        assert_relative_eq!(view.zoom(), 2.0);

        view.zoom_in();
        view.zoom_in();
        view.zoom_in();
        assert_relative_eq!(view.zoom(), 4.0);
    }

    #[test]
    fn zoom_around_keeps_point_under_cursor() {
        let mut view = initialized(Point::new(400.0, 300.0));
        view.set_view(LatLng::new(-120.0, 120.0), 3.0);
        let cursor = Point::new(250.0, 120.0);
        let under_cursor = view.container_point_to_latlng(cursor);

        view.set_zoom_around(cursor, 4.0);

        let moved = view.latlng_to_container_point(under_cursor);
        assert_relative_eq!(moved.x, cursor.x, epsilon = 1e-9);
        assert_relative_eq!(moved.y, cursor.y, epsilon = 1e-9);
    }

    #[test]
    fn container_points_round_trip() {
        let view = initialized(Point::new(640.0, 480.0));
        let point = Point::new(17.0, 301.0);

        let back = view.latlng_to_container_point(view.container_point_to_latlng(point));

        assert_relative_eq!(back.x, point.x, epsilon = 1e-9);
        assert_relative_eq!(back.y, point.y, epsilon = 1e-9);
    }

    #[test]
    fn context_menu_requests_bookmark_at_clicked_coordinate() {
        let view = initialized(Point::new(640.0, 480.0));
        let click = Point::new(320.0, 240.0);

        let MapEvent::NewBookmark { latlng } = view.context_menu(click);

        assert_eq!(latlng, view.container_point_to_latlng(click));
        assert_relative_eq!(latlng.lat, view.center().lat, epsilon = 1e-9);
        assert_relative_eq!(latlng.lng, view.center().lng, epsilon = 1e-9);
    }

    #[test]
    fn reset_view_returns_to_start() {
        let mut view = initialized(Point::new(400.0, 300.0));
        let start = view.center();
        view.zoom_in();
        view.pan_by(Point::new(100.0, 100.0));

        view.reset_view();

        assert_relative_eq!(view.zoom(), 2.0);
        assert_relative_eq!(view.center().lat, start.lat, epsilon = 1e-9);
        assert_relative_eq!(view.center().lng, start.lng, epsilon = 1e-9);
    }
}
