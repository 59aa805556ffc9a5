//! Geometry utilities: pointer → document coordinates, point-in-rect tests.
//!
//! All coordinates are document-space (page) pixels unless stated otherwise.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A 2D point in document coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding rectangle, edges in document coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Build from an origin and a size.
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Shift by a scroll offset (viewport-relative → document-relative).
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.left + dx, self.top + dy, self.right + dx, self.bottom + dy)
    }
}

/// Visible window size, used to clamp the context menu.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Strict interior test: `left < x < right` and `top < y < bottom`.
///
/// A point exactly on an edge is outside, so two adjacent siblings that
/// share an edge can never both match.
pub fn contains_point(rect: &Rect, point: Point) -> bool {
    point.x > rect.left && point.x < rect.right && point.y > rect.top && point.y < rect.bottom
}

// ─── Pointer events ──────────────────────────────────────────────────────

/// A normalized mouse or touch event as delivered by the host page.
///
/// Mirrors the fields browsers expose: `page*` (document-relative),
/// `client*` (viewport-relative), the active touch points, and the page
/// scroll offset at the time of the event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerEvent {
    /// `pageX/pageY` if the host reported them.
    pub page: Option<Point>,
    /// `clientX/clientY` if the host reported them.
    pub client: Option<Point>,
    /// Touch points (`targetTouches`) in page coordinates. Only the first is used.
    pub touches: SmallVec<[Point; 1]>,
    /// Page scroll offset (`scrollX/scrollY`).
    pub scroll: Point,
}

impl PointerEvent {
    /// A mouse event with document coordinates.
    pub fn mouse(x: f64, y: f64) -> Self {
        Self {
            page: Some(Point::new(x, y)),
            ..Default::default()
        }
    }

    /// A mouse event with viewport coordinates plus the current scroll offset.
    pub fn mouse_client(x: f64, y: f64, scroll: Point) -> Self {
        Self {
            client: Some(Point::new(x, y)),
            scroll,
            ..Default::default()
        }
    }

    /// A single-touch event with page coordinates.
    pub fn touch(x: f64, y: f64) -> Self {
        let mut touches = SmallVec::new();
        touches.push(Point::new(x, y));
        Self {
            touches,
            ..Default::default()
        }
    }
}

/// Extract the document-space position of a pointer event.
///
/// Priority: first touch point, then page coordinates, then client
/// coordinates offset by scroll. Falls back to the origin when the event
/// carries no position at all.
pub fn pointer_position(event: &PointerEvent) -> Point {
    if let Some(touch) = event.touches.first() {
        return *touch;
    }
    if let Some(page) = event.page {
        return page;
    }
    if let Some(client) = event.client {
        return Point::new(client.x + event.scroll.x, client.y + event.scroll.y);
    }
    Point::ORIGIN
}
