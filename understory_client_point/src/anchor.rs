// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Virtual anchor synthesis: build a rectangle from a pointer position and an axis constraint.
//!
//! A [`VirtualAnchor`] stands in for the real reference element when a floating
//! element should follow the pointer. Depending on the [`Axis`], one or both
//! dimensions come from the pointer; the others are pinned to the real
//! reference element's bounds.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_client_point::{Axis, VirtualAnchor};
//!
//! let reference = Rect::new(100.0, 40.0, 300.0, 60.0);
//!
//! // Horizontal tracking: x follows the pointer, the vertical extent is the reference's.
//! let anchor = VirtualAnchor::synthesize(Point::new(180.0, 5.0), Axis::X, Some(reference));
//! assert_eq!(anchor.x(), 180.0);
//! assert_eq!(anchor.top(), 40.0);
//! assert_eq!(anchor.height(), 20.0);
//! assert_eq!(anchor.width(), 0.0);
//! ```

use core::fmt;
use core::str::FromStr;

use kurbo::{Point, Rect, Size};

/// Which dimension(s) of the synthesized anchor follow the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Axis {
    /// Both coordinates follow the pointer; the anchor has zero area.
    #[default]
    Both,
    /// Only `x` follows the pointer; top and height come from the reference.
    X,
    /// Only `y` follows the pointer; left and width come from the reference.
    Y,
}

impl Axis {
    /// Returns the canonical name of this axis (`"both"`, `"x"` or `"y"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Both => "both",
            Self::X => "x",
            Self::Y => "y",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Axis {
    type Err = ParseAxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "both" => Ok(Self::Both),
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            _ => Err(ParseAxisError),
        }
    }
}

/// Error returned when parsing an [`Axis`] from an unrecognized name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ParseAxisError;

impl fmt::Display for ParseAxisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("axis must be one of `x`, `y` or `both`")
    }
}

impl core::error::Error for ParseAxisError {}

/// A synthesized anchor rectangle that tracks the pointer.
///
/// The anchor is rebuilt on every tracking update and never mutated in place.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VirtualAnchor {
    origin: Point,
    size: Size,
}

impl VirtualAnchor {
    /// Synthesizes an anchor at `point` constrained by `axis`.
    ///
    /// `reference` is the real reference element's current bounds. When it is
    /// unavailable, all-zero geometry is used instead, so synthesis never fails.
    #[must_use]
    pub fn synthesize(point: Point, axis: Axis, reference: Option<Rect>) -> Self {
        let reference = reference.unwrap_or(Rect::ZERO);
        match axis {
            Axis::Both => Self {
                origin: point,
                size: Size::ZERO,
            },
            Axis::X => Self {
                origin: Point::new(point.x, reference.y0),
                size: Size::new(0.0, reference.height()),
            },
            Axis::Y => Self {
                origin: Point::new(reference.x0, point.y),
                size: Size::new(reference.width(), 0.0),
            },
        }
    }

    /// Horizontal position of the anchor's origin.
    #[must_use]
    pub fn x(&self) -> f64 {
        self.origin.x
    }

    /// Vertical position of the anchor's origin.
    #[must_use]
    pub fn y(&self) -> f64 {
        self.origin.y
    }

    /// Width of the anchor.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.size.width
    }

    /// Height of the anchor.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.size.height
    }

    /// Same as [`VirtualAnchor::y`].
    #[must_use]
    pub fn top(&self) -> f64 {
        self.origin.y
    }

    /// Same as [`VirtualAnchor::x`].
    #[must_use]
    pub fn left(&self) -> f64 {
        self.origin.x
    }

    /// `left + width`.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.origin.x + self.size.width
    }

    /// `top + height`.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.origin.y + self.size.height
    }

    /// The anchor as a Kurbo rectangle, for handing to a positioning engine.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.size)
    }
}

/// What the positioning engine should position the floating element against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PositionReference {
    /// A synthesized anchor following the pointer.
    Virtual(VirtualAnchor),
    /// The real reference element itself.
    Reference,
}

impl PositionReference {
    /// Returns the virtual anchor, if this reference is one.
    #[must_use]
    pub fn as_virtual(&self) -> Option<&VirtualAnchor> {
        match self {
            Self::Virtual(anchor) => Some(anchor),
            Self::Reference => None,
        }
    }
}
