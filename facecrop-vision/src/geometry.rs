//! Crop-region arithmetic: padding a detected face box and keeping the
//! padded box inside the image.

use std::fmt;

use serde::Serialize;

const OFFSET_EPSILON: f64 = 1e-9;

/// Pixel coordinate, x grows to the right and y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle given by its top-left corner and extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(
            self.x.saturating_add(self.width),
            self.y.saturating_add(self.height),
        )
    }

    /// Intersection with the image, `None` when nothing of the rectangle is
    /// left inside it.
    pub fn clip_to(&self, bounds: ImageBounds) -> Option<Rect> {
        let p2 = self.bottom_right();
        let x1 = self.x.max(0);
        let y1 = self.y.max(0);
        let x2 = p2.x.min(bounds.width);
        let y2 = p2.y.min(bounds.height);
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(Rect::new(x1, y1, x2 - x1, y2 - y1))
    }
}

/// Width and height of the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageBounds {
    pub width: i32,
    pub height: i32,
}

impl ImageBounds {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: i32::try_from(width).unwrap_or(i32::MAX),
            height: i32::try_from(height).unwrap_or(i32::MAX),
        }
    }
}

/// Padded crop box as a pair of corners, `p1` top-left and `p2` bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaddedRegion {
    pub p1: Point,
    pub p2: Point,
}

impl PaddedRegion {
    pub fn width(&self) -> i32 {
        self.p2.x.saturating_sub(self.p1.x)
    }

    pub fn height(&self) -> i32 {
        self.p2.y.saturating_sub(self.p1.y)
    }

    /// Convert to an extractable pixel rectangle.
    ///
    /// Returns `None` if the region is empty or reaches outside `bounds`,
    /// which can only happen for factors below 1 or detections that are not
    /// fully inside the image.
    pub fn to_crop_region(&self, bounds: ImageBounds) -> Option<CropRegion> {
        let (width, height) = (self.width(), self.height());
        if width <= 0 || height <= 0 {
            return None;
        }
        if self.p1.x < 0 || self.p1.y < 0 || self.p2.x > bounds.width || self.p2.y > bounds.height
        {
            return None;
        }

        Some(CropRegion {
            x: self.p1.x as u32,
            y: self.p1.y as u32,
            width: width as u32,
            height: height as u32,
        })
    }
}

impl fmt::Display for PaddedRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {})-({}, {})",
            self.p1.x, self.p1.y, self.p2.x, self.p2.y
        )
    }
}

/// Crop rectangle that is known to be non-empty and inside the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Expand `rect` by a padding derived from `factor` without leaving `bounds`.
///
/// The padding is `floor(rect.width * (factor - 1))` on every side; only the
/// width is used since detected face boxes are square. The padding is then
/// lowered by four clamps applied in order (left, top, bottom, right), each
/// one seeing the value left by the previous clamp. A clamp never raises the
/// padding, so a box that already overflows an edge yields a negative
/// padding and a region smaller than the box.
///
/// `factor` must be positive; callers reject anything else before this is
/// reached.
pub fn compute_padded_region(rect: Rect, bounds: ImageBounds, factor: f64) -> PaddedRegion {
    // The epsilon absorbs representation error: 200.0 * (1.2 - 1.0) is 39.999...
    let mut offset = (f64::from(rect.width) * (factor - 1.0) + OFFSET_EPSILON).floor() as i32;

    let p1 = rect.top_left();
    let p2 = rect.bottom_right();

    if p1.x < offset {
        offset = p1.x;
    }
    if p1.y < offset {
        offset = p1.y;
    }
    if bounds.height < p2.y.saturating_add(offset) {
        offset = bounds.height.saturating_sub(p2.y);
    }
    if bounds.width < p2.x.saturating_add(offset) {
        offset = bounds.width.saturating_sub(p2.x);
    }

    PaddedRegion {
        p1: Point::new(p1.x.saturating_sub(offset), p1.y.saturating_sub(offset)),
        p2: Point::new(p2.x.saturating_add(offset), p2.y.saturating_add(offset)),
    }
}
