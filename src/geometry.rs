// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::fmt;

/// Mean radius of Earth, in meters.
/// Source: https://en.wikipedia.org/wiki/Earth_radius#Arithmetic_mean_radius
pub const EARTH_RADIUS: f64 = 6_371_008.8;

/// Mean diameter of Earth, in meters.
const EARTH_DIAMETER: f64 = EARTH_RADIUS + EARTH_RADIUS;

/// A position on Earth, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns a new location `meters` north and `meters` east of this one.
    /// Negative values move south and west. Only suitable for short offsets.
    pub fn offset(&self, north: f64, east: f64) -> Self {
        let lat = self.latitude + (north / EARTH_RADIUS).to_degrees();
        let lon = self.longitude
            + (east / (EARTH_RADIUS * self.latitude.to_radians().cos())).to_degrees();
        Self::new(lat, lon)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.7}, {:.7})", self.latitude, self.longitude)
    }
}

/// Calculates the great-circle distance between two positions
/// on Earth using the `haversine formula <https://en.wikipedia.org/wiki/Haversine_formula>`_.
/// Returns the result in meters.
pub fn earth_distance(a: Location, b: Location) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lon1 = a.longitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let lon2 = b.longitude.to_radians();

    let sin_dlat_half = ((lat2 - lat1) * 0.5).sin();
    let sin_dlon_half = ((lon2 - lon1) * 0.5).sin();

    let h = sin_dlat_half * sin_dlat_half + lat1.cos() * lat2.cos() * sin_dlon_half * sin_dlon_half;

    EARTH_DIAMETER * h.sqrt().asin()
}

/// A compass direction in degrees, clockwise from north, normalized into `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Heading(f64);

impl Heading {
    pub const NORTH: Self = Self(0.0);
    pub const EAST: Self = Self(90.0);
    pub const SOUTH: Self = Self(180.0);
    pub const WEST: Self = Self(270.0);

    pub fn degrees(degrees: f64) -> Self {
        assert!(degrees.is_finite(), "heading must be finite: {}", degrees);
        Self(degrees.rem_euclid(360.0))
    }

    pub fn as_degrees(&self) -> f64 {
        self.0
    }

    /// Smallest absolute angle between two headings, in `[0, 180]` degrees.
    pub fn difference(&self, other: Heading) -> f64 {
        let d = (self.0 - other.0).abs();
        if d > 180.0 {
            360.0 - d
        } else {
            d
        }
    }

    pub fn reversed(&self) -> Self {
        Self::degrees(self.0 + 180.0)
    }
}

/// Axis-aligned latitude/longitude box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub bottom_left: Location,
    pub top_right: Location,
}

impl Rectangle {
    /// Returns the smallest rectangle containing both locations.
    pub fn from_corners(a: Location, b: Location) -> Self {
        Self {
            bottom_left: Location::new(a.latitude.min(b.latitude), a.longitude.min(b.longitude)),
            top_right: Location::new(a.latitude.max(b.latitude), a.longitude.max(b.longitude)),
        }
    }

    /// Returns a square extending `meters` from the center in each cardinal direction.
    pub fn around(center: Location, meters: f64) -> Self {
        Self::from_corners(
            center.offset(-meters, -meters),
            center.offset(meters, meters),
        )
    }

    pub fn contains(&self, location: Location) -> bool {
        location.latitude >= self.bottom_left.latitude
            && location.latitude <= self.top_right.latitude
            && location.longitude >= self.bottom_left.longitude
            && location.longitude <= self.top_right.longitude
    }

    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.bottom_left.latitude <= other.top_right.latitude
            && other.bottom_left.latitude <= self.top_right.latitude
            && self.bottom_left.longitude <= other.top_right.longitude
            && other.bottom_left.longitude <= self.top_right.longitude
    }

    fn expand(&mut self, location: Location) {
        *self = Self::from_corners(
            Location::new(
                self.bottom_left.latitude.min(location.latitude),
                self.bottom_left.longitude.min(location.longitude),
            ),
            Location::new(
                self.top_right.latitude.max(location.latitude),
                self.top_right.longitude.max(location.longitude),
            ),
        );
    }
}

/// Result of projecting a point onto a [Polyline].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolylineSnap {
    /// The closest point on the polyline.
    pub location: Location,

    /// Position of [PolylineSnap::location] along the polyline, as a fraction
    /// of its total length, in `[0, 1]`.
    pub offset: f64,

    /// Perpendicular (closest) distance from the query point to the polyline, in meters.
    pub distance: f64,

    /// Heading of the segment containing the snapped point.
    pub heading: Heading,

    /// Index of the segment containing the snapped point.
    pub segment: usize,
}

/// An ordered sequence of at least two locations describing the shape of an edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline(Vec<Location>);

impl Polyline {
    /// Creates a polyline from its points. Returns `None` if fewer than two points are given.
    pub fn new(points: Vec<Location>) -> Option<Self> {
        if points.len() < 2 {
            None
        } else {
            Some(Self(points))
        }
    }

    pub fn segment(from: Location, to: Location) -> Self {
        Self(vec![from, to])
    }

    pub fn points(&self) -> &[Location] {
        &self.0
    }

    pub fn start(&self) -> Location {
        self.0[0]
    }

    pub fn end(&self) -> Location {
        self.0[self.0.len() - 1]
    }

    /// Total length in meters.
    pub fn length(&self) -> f64 {
        self.0
            .windows(2)
            .map(|pair| earth_distance(pair[0], pair[1]))
            .sum()
    }

    pub fn bounds(&self) -> Rectangle {
        let mut bounds = Rectangle::from_corners(self.0[0], self.0[0]);
        self.0.iter().for_each(|&p| bounds.expand(p));
        bounds
    }

    /// Heading of the first segment.
    pub fn initial_heading(&self) -> Heading {
        let plane = LocalPlane::centered_on(self.0[0]);
        plane.heading(self.0[0], self.0[1])
    }

    /// Projects `location` onto this polyline.
    ///
    /// Projection happens on a local equirectangular plane centered on `location`,
    /// which is accurate for the short distances involved in snapping.
    pub fn snap(&self, location: Location) -> PolylineSnap {
        let plane = LocalPlane::centered_on(location);

        // (distance, segment index, position along the segment)
        let mut best = (f64::INFINITY, 0, 0.0);
        for (segment, pair) in self.0.windows(2).enumerate() {
            let (ax, ay) = plane.project(pair[0]);
            let (bx, by) = plane.project(pair[1]);
            let (dx, dy) = (bx - ax, by - ay);
            let length_squared = dx * dx + dy * dy;

            let t = if length_squared > 0.0 {
                ((-ax * dx - ay * dy) / length_squared).clamp(0.0, 1.0)
            } else {
                0.0
            };

            let (px, py) = (ax + t * dx, ay + t * dy);
            let distance = (px * px + py * py).sqrt();

            // Strict comparison keeps the earliest segment on ties
            if distance < best.0 {
                best = (distance, segment, t);
            }
        }

        let (distance, segment, t) = best;
        let from = self.0[segment];
        let to = self.0[segment + 1];
        let snapped = Location::new(
            from.latitude + t * (to.latitude - from.latitude),
            from.longitude + t * (to.longitude - from.longitude),
        );

        let total = self.length();
        let offset = if total > 0.0 {
            let before: f64 = self.0[..=segment]
                .windows(2)
                .map(|pair| earth_distance(pair[0], pair[1]))
                .sum();
            ((before + t * earth_distance(from, to)) / total).clamp(0.0, 1.0)
        } else {
            0.0
        };

        PolylineSnap {
            location: snapped,
            offset,
            distance,
            heading: plane.heading(from, to),
            segment,
        }
    }
}

/// Equirectangular projection around a reference point, in meters.
struct LocalPlane {
    origin: Location,
    longitude_scale: f64,
}

impl LocalPlane {
    fn centered_on(origin: Location) -> Self {
        Self {
            origin,
            longitude_scale: origin.latitude.to_radians().cos(),
        }
    }

    fn project(&self, location: Location) -> (f64, f64) {
        let x = (location.longitude - self.origin.longitude).to_radians()
            * self.longitude_scale
            * EARTH_RADIUS;
        let y = (location.latitude - self.origin.latitude).to_radians() * EARTH_RADIUS;
        (x, y)
    }

    fn heading(&self, from: Location, to: Location) -> Heading {
        let (ax, ay) = self.project(from);
        let (bx, by) = self.project(to);
        Heading::degrees((bx - ax).atan2(by - ay).to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr, $eps:expr) => {
            assert!(
                (($a - $b).abs() < $eps),
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    #[test]
    fn earth_distance_one_degree_of_latitude() {
        let d = earth_distance(Location::new(0.0, 0.0), Location::new(1.0, 0.0));
        assert_almost_eq!(d, 111_195.08, 1.0);
    }

    #[test]
    fn heading_difference_wraps_around_north() {
        assert_almost_eq!(Heading::degrees(350.0).difference(Heading::degrees(10.0)), 20.0, 1e-9);
        assert_almost_eq!(Heading::degrees(-90.0).as_degrees(), 270.0, 1e-9);
        assert_almost_eq!(Heading::NORTH.difference(Heading::SOUTH), 180.0, 1e-9);
        assert_almost_eq!(Heading::EAST.reversed().as_degrees(), 270.0, 1e-9);
    }

    #[test]
    fn rectangle_around_contains_center_and_intersects() {
        let center = Location::new(52.0, 21.0);
        let r = Rectangle::around(center, 100.0);
        assert!(r.contains(center));
        assert!(!r.contains(center.offset(150.0, 0.0)));

        let other = Rectangle::around(center.offset(150.0, 0.0), 100.0);
        assert!(r.intersects(&other));
        let far = Rectangle::around(center.offset(500.0, 0.0), 100.0);
        assert!(!r.intersects(&far));
    }

    #[test]
    fn snap_onto_straight_segment() {
        let start = Location::new(52.0, 21.0);
        let end = start.offset(0.0, 1000.0);
        let line = Polyline::segment(start, end);

        let on_line = line.snap(start.offset(0.0, 250.0));
        assert_almost_eq!(on_line.offset, 0.25, 1e-3);
        assert_almost_eq!(on_line.distance, 0.0, 0.01);
        assert_almost_eq!(on_line.heading.as_degrees(), 90.0, 0.01);

        let off_line = line.snap(start.offset(30.0, 600.0));
        assert_almost_eq!(off_line.offset, 0.6, 1e-3);
        assert_almost_eq!(off_line.distance, 30.0, 0.05);
    }

    #[test]
    fn snap_beyond_the_end_clamps() {
        let start = Location::new(52.0, 21.0);
        let line = Polyline::segment(start, start.offset(100.0, 0.0));
        let snap = line.snap(start.offset(140.0, 0.0));
        assert_almost_eq!(snap.offset, 1.0, 1e-9);
        assert_almost_eq!(snap.distance, 40.0, 0.05);
    }

    #[test]
    fn snap_picks_closest_segment_of_bent_line() {
        let a = Location::new(52.0, 21.0);
        let b = a.offset(0.0, 100.0);
        let c = b.offset(100.0, 0.0);
        let line = Polyline::new(vec![a, b, c]).unwrap();

        let snap = line.snap(b.offset(50.0, 10.0));
        assert_eq!(snap.segment, 1);
        assert_almost_eq!(snap.offset, 0.75, 1e-3);
        assert_almost_eq!(snap.distance, 10.0, 0.05);
        assert_almost_eq!(snap.heading.as_degrees(), 0.0, 0.01);
    }

    #[test]
    fn polyline_requires_two_points() {
        assert!(Polyline::new(vec![Location::new(0.0, 0.0)]).is_none());
    }

    #[test]
    fn polyline_endpoints() {
        let a = Location::new(52.0, 21.0);
        let b = a.offset(100.0, 0.0);
        let c = b.offset(0.0, 100.0);
        let line = Polyline::new(vec![a, b, c]).unwrap();
        assert_eq!(line.points(), &[a, b, c]);
        assert_eq!(line.start(), a);
        assert_eq!(line.end(), c);

        let segment = Polyline::segment(c, a);
        assert_eq!(segment.points().len(), 2);
        assert_eq!(segment.start(), c);
        assert_eq!(segment.end(), a);
    }
}
