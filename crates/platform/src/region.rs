//! Display regions
//!
//! A [`RegionKey`] scopes change tracking and ghost simulation: writes to
//! different keys never interfere with each other.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// A rectangular, panel-addressable sub-region in native coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Region {
    /// Left edge (inclusive)
    pub x: u32,
    /// Top edge (inclusive)
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Region {
    /// Create a region from its top-left corner and size
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge, or `None` if it overflows
    pub fn right(&self) -> Option<u32> {
        self.x.checked_add(self.width)
    }

    /// Exclusive bottom edge, or `None` if it overflows
    pub fn bottom(&self) -> Option<u32> {
        self.y.checked_add(self.height)
    }

    /// True if the region has no pixels
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered
    pub fn area(&self) -> u64 {
        u64::from(self.width).saturating_mul(u64::from(self.height))
    }

    /// True if the whole region lies inside a `width × height` panel
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        matches!(
            (self.right(), self.bottom()),
            (Some(r), Some(b)) if r <= width && b <= height
        )
    }

    /// True if `(x, y)` lies inside the region
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x
            && y >= self.y
            && self.right().is_some_and(|r| x < r)
            && self.bottom().is_some_and(|b| y < b)
    }

    /// Convert to an embedded-graphics rectangle
    ///
    /// Returns `None` when the origin does not fit in `i32`.
    pub fn to_rectangle(&self) -> Option<Rectangle> {
        let x = i32::try_from(self.x).ok()?;
        let y = i32::try_from(self.y).ok()?;
        Some(Rectangle::new(
            Point::new(x, y),
            Size::new(self.width, self.height),
        ))
    }
}

/// Error returned when a rectangle has a negative origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegativeOrigin(pub Point);

impl TryFrom<Rectangle> for Region {
    type Error = NegativeOrigin;

    fn try_from(rect: Rectangle) -> Result<Self, Self::Error> {
        let x = u32::try_from(rect.top_left.x).map_err(|_| NegativeOrigin(rect.top_left))?;
        let y = u32::try_from(rect.top_left.y).map_err(|_| NegativeOrigin(rect.top_left))?;
        Ok(Region::new(x, y, rect.size.width, rect.size.height))
    }
}

/// Identifies a display target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegionKey {
    /// The whole panel
    FullFrame,
    /// A sub-rectangle of the panel
    Rect(Region),
}

impl RegionKey {
    /// Resolve to a concrete region on a `width × height` panel
    pub fn resolve(&self, width: u32, height: u32) -> Region {
        match self {
            RegionKey::FullFrame => Region::new(0, 0, width, height),
            RegionKey::Rect(region) => *region,
        }
    }
}

impl From<Region> for RegionKey {
    fn from(region: Region) -> Self {
        RegionKey::Rect(region)
    }
}
