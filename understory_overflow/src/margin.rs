// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Root margins: how each directional sensor shifts the viewport rectangle.
//!
//! ## Overview
//!
//! A sensor does not test the content against the viewport itself. It tests
//! it against the viewport moved one full viewport length past the edge it
//! watches. For the `Down` sensor the near (top) edge is pulled in by 100% of
//! the height and the far (bottom) edge is pushed out by 100%, leaving a band
//! of the viewport's size directly below it. Any part of the watch boundary in
//! that band is content beyond the bottom edge.
//!
//! | Direction | top    | right  | bottom | left   |
//! |-----------|--------|--------|--------|--------|
//! | `Up`      | 100%   | 0      | -100%  | 0      |
//! | `Left`    | 0      | -100%  | 0      | 100%   |
//! | `Right`   | 0      | 100%   | 0      | -100%  |
//! | `Down`    | -100%  | 0      | 100%   | 0      |
//!
//! Positive values grow the rectangle outward on that side. Percentages on
//! `top`/`bottom` refer to the root height, on `left`/`right` to the root width.

use kurbo::Rect;

use crate::types::Direction;

/// One side of a [`RootMargin`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarginLength {
    /// Absolute pixels.
    Px(f64),
    /// Percentage of the root extent along the side's axis.
    Percent(f64),
}

impl MarginLength {
    /// Resolve against the root extent along this side's axis.
    pub fn resolve(self, extent: f64) -> f64 {
        match self {
            Self::Px(v) => v,
            Self::Percent(p) => extent * p / 100.0,
        }
    }
}

/// Outsets applied to the root rectangle before intersection, in CSS
/// `top right bottom left` order.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RootMargin {
    /// Outset of the top edge (positive moves it up).
    pub top: MarginLength,
    /// Outset of the right edge (positive moves it right).
    pub right: MarginLength,
    /// Outset of the bottom edge (positive moves it down).
    pub bottom: MarginLength,
    /// Outset of the left edge (positive moves it left).
    pub left: MarginLength,
}

const ZERO: MarginLength = MarginLength::Px(0.0);
const FULL: MarginLength = MarginLength::Percent(100.0);
const NEG_FULL: MarginLength = MarginLength::Percent(-100.0);

const UP: RootMargin = RootMargin::new(FULL, ZERO, NEG_FULL, ZERO);
const LEFT: RootMargin = RootMargin::new(ZERO, NEG_FULL, ZERO, FULL);
const RIGHT: RootMargin = RootMargin::new(ZERO, FULL, ZERO, NEG_FULL);
const DOWN: RootMargin = RootMargin::new(NEG_FULL, ZERO, FULL, ZERO);

impl RootMargin {
    /// No margin on any side.
    pub const NONE: Self = Self::new(ZERO, ZERO, ZERO, ZERO);

    /// Create a margin from its four sides.
    pub const fn new(
        top: MarginLength,
        right: MarginLength,
        bottom: MarginLength,
        left: MarginLength,
    ) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// The margin that turns the root into the band beyond `direction`'s edge.
    pub const fn for_direction(direction: Direction) -> Self {
        match direction {
            Direction::Up => UP,
            Direction::Left => LEFT,
            Direction::Right => RIGHT,
            Direction::Down => DOWN,
        }
    }

    /// Apply the margin to `root`.
    pub fn apply(&self, root: Rect) -> Rect {
        let w = root.width();
        let h = root.height();
        Rect::new(
            root.x0 - self.left.resolve(w),
            root.y0 - self.top.resolve(h),
            root.x1 + self.right.resolve(w),
            root.y1 + self.bottom.resolve(h),
        )
    }
}

impl Default for RootMargin {
    fn default() -> Self {
        Self::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 400.0, 300.0);

    #[test]
    fn directional_bands() {
        let up = RootMargin::for_direction(Direction::Up).apply(VIEWPORT);
        assert_eq!(up, Rect::new(0.0, -300.0, 400.0, 0.0));

        let down = RootMargin::for_direction(Direction::Down).apply(VIEWPORT);
        assert_eq!(down, Rect::new(0.0, 300.0, 400.0, 600.0));

        let left = RootMargin::for_direction(Direction::Left).apply(VIEWPORT);
        assert_eq!(left, Rect::new(-400.0, 0.0, 0.0, 300.0));

        let right = RootMargin::for_direction(Direction::Right).apply(VIEWPORT);
        assert_eq!(right, Rect::new(400.0, 0.0, 800.0, 300.0));
    }

    #[test]
    fn bands_keep_viewport_size() {
        for d in Direction::ALL {
            let band = RootMargin::for_direction(d).apply(VIEWPORT);
            assert_eq!(band.size(), VIEWPORT.size(), "{d} band changed size");
        }
    }

    #[test]
    fn none_is_identity() {
        let r = Rect::new(12.0, 5.0, 40.0, 90.0);
        assert_eq!(RootMargin::NONE.apply(r), r);
    }

    #[test]
    fn pixel_margins_grow_outward() {
        let m = RootMargin::new(
            MarginLength::Px(1.0),
            MarginLength::Px(2.0),
            MarginLength::Px(3.0),
            MarginLength::Px(4.0),
        );
        assert_eq!(
            m.apply(Rect::new(10.0, 10.0, 20.0, 20.0)),
            Rect::new(6.0, 9.0, 22.0, 23.0)
        );
    }
}
