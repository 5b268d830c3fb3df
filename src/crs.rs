//! Planar coordinate reference system used by the image map.
//!
//! Map space is a flat plane: `lng` grows to the right and `lat` grows upwards.
//! Pixel space has its origin at the top-left with `y` growing downwards, and
//! every zoom level doubles the number of pixels per map unit.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// A coordinate in map space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

/// A position in projected pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

/// Axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Builds bounds from two arbitrary corners.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn size(&self) -> Point {
        self.max - self.min
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Whether `other` lies completely inside these bounds.
    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        self.contains(other.min) && self.contains(other.max)
    }
}

/// Rectangle in map space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    south_west: LatLng,
    north_east: LatLng,
}

impl LatLngBounds {
    /// Builds bounds from two arbitrary corners; the result is normalized so
    /// that `south_west` holds the minimum latitude and longitude.
    pub fn new(a: LatLng, b: LatLng) -> Self {
        Self {
            south_west: LatLng::new(a.lat.min(b.lat), a.lng.min(b.lng)),
            north_east: LatLng::new(a.lat.max(b.lat), a.lng.max(b.lng)),
        }
    }

    pub fn south_west(&self) -> LatLng {
        self.south_west
    }

    pub fn north_east(&self) -> LatLng {
        self.north_east
    }

    pub fn north_west(&self) -> LatLng {
        LatLng::new(self.north_east.lat, self.south_west.lng)
    }

    pub fn south_east(&self) -> LatLng {
        LatLng::new(self.south_west.lat, self.north_east.lng)
    }
}

/// Planar projection with an identity transform and a flipped y axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleCrs;

impl SimpleCrs {
    /// Pixels per map unit at `zoom`.
    pub fn scale(&self, zoom: f64) -> f64 {
        2f64.powf(zoom)
    }

    pub fn project(&self, latlng: LatLng, zoom: f64) -> Point {
        let scale = self.scale(zoom);
        Point::new(latlng.lng * scale, -latlng.lat * scale)
    }

    pub fn unproject(&self, point: Point, zoom: f64) -> LatLng {
        let scale = self.scale(zoom);
        LatLng::new(-point.y / scale, point.x / scale)
    }

    /// Projects a map-space rectangle into pixel bounds at `zoom`.
    pub fn project_bounds(&self, bounds: &LatLngBounds, zoom: f64) -> Bounds {
        Bounds::from_corners(
            self.project(bounds.north_east(), zoom),
            self.project(bounds.south_west(), zoom),
        )
    }
}
