// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for overflow detection: directions, edge sets, and the overflow state.

use core::fmt;

/// One of the four edges of a viewport.
///
/// The declaration order (`Up`, `Left`, `Right`, `Down`) is the order used by
/// [`Direction::ALL`] and by every per-direction iteration in this crate.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Content hidden above the top edge.
    Up,
    /// Content hidden past the left edge.
    Left,
    /// Content hidden past the right edge.
    Right,
    /// Content hidden below the bottom edge.
    Down,
}

impl Direction {
    /// All four directions in their canonical order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Left, Self::Right, Self::Down];

    /// Position of this direction in [`Direction::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Left => 1,
            Self::Right => 2,
            Self::Down => 3,
        }
    }

    /// Lowercase name, as used by attribute selectors and log output.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Left => "left",
            Self::Right => "right",
            Self::Down => "down",
        }
    }

    /// The edge flag corresponding to this direction.
    pub const fn edge(self) -> Edges {
        match self {
            Self::Up => Edges::UP,
            Self::Left => Edges::LEFT,
            Self::Right => Edges::RIGHT,
            Self::Down => Edges::DOWN,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags::bitflags! {
    /// A set of viewport edges.
    ///
    /// Returned by [`OverflowState::edges`] for renderers that prefer to match
    /// on a set (for example to pick a combined shadow) rather than read four
    /// booleans.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Edges: u8 {
        /// Top edge.
        const UP    = 0b0000_0001;
        /// Left edge.
        const LEFT  = 0b0000_0010;
        /// Right edge.
        const RIGHT = 0b0000_0100;
        /// Bottom edge.
        const DOWN  = 0b0000_1000;
        /// Both vertical edges.
        const VERTICAL = Self::UP.bits() | Self::DOWN.bits();
        /// Both horizontal edges.
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
    }
}

/// Per-direction "can scroll further" state.
///
/// Each field is `true` when content extends beyond the viewport in that
/// direction. All fields start out `false`.
///
/// Committed states are shared behind an `Rc` by the
/// [`Store`](crate::state::Store) and are never mutated in place; a change
/// always produces a new value through [`reduce`](crate::state::reduce).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct OverflowState {
    /// Content is hidden above the viewport.
    pub up: bool,
    /// Content is hidden to the left of the viewport.
    pub left: bool,
    /// Content is hidden to the right of the viewport.
    pub right: bool,
    /// Content is hidden below the viewport.
    pub down: bool,
}

impl OverflowState {
    /// The initial state: nothing to scroll in any direction.
    pub const NONE: Self = Self {
        up: false,
        left: false,
        right: false,
        down: false,
    };

    /// Whether content extends beyond the viewport in `direction`.
    pub const fn get(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Down => self.down,
        }
    }

    /// Copy of this state with `direction` replaced by `can_scroll`.
    #[must_use]
    pub const fn with(mut self, direction: Direction, can_scroll: bool) -> Self {
        match direction {
            Direction::Up => self.up = can_scroll,
            Direction::Left => self.left = can_scroll,
            Direction::Right => self.right = can_scroll,
            Direction::Down => self.down = can_scroll,
        }
        self
    }

    /// True if any of the four directions can scroll.
    pub const fn any(&self) -> bool {
        self.up || self.left || self.right || self.down
    }

    /// The set of edges that currently have hidden content.
    pub fn edges(&self) -> Edges {
        Direction::ALL
            .into_iter()
            .filter(|&d| self.get(d))
            .fold(Edges::empty(), |acc, d| acc | d.edge())
    }
}

/// The single state transition understood by the reducer.
///
/// Produced by sensor callbacks and pushed through a
/// [`Dispatch`](crate::context::Dispatch) handle.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ChangeEvent {
    /// Set whether content extends beyond the viewport in `direction`.
    Change {
        /// Edge the sensor watches.
        direction: Direction,
        /// New value for that edge.
        can_scroll: bool,
    },
}

impl ChangeEvent {
    /// Shorthand for [`ChangeEvent::Change`].
    pub const fn change(direction: Direction, can_scroll: bool) -> Self {
        Self::Change {
            direction,
            can_scroll,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_all_false() {
        let s = OverflowState::default();
        assert_eq!(s, OverflowState::NONE);
        for d in Direction::ALL {
            assert!(!s.get(d), "{d} should start false");
        }
        assert!(!s.any());
        assert!(s.edges().is_empty());
    }

    #[test]
    fn with_replaces_only_one_direction() {
        let s = OverflowState::NONE.with(Direction::Right, true);
        assert!(s.right);
        assert!(!s.up && !s.left && !s.down);
        assert!(s.any());
        assert_eq!(s.edges(), Edges::RIGHT);
    }

    #[test]
    fn edges_match_fields() {
        let s = OverflowState {
            up: true,
            left: false,
            right: false,
            down: true,
        };
        assert_eq!(s.edges(), Edges::VERTICAL);
        assert!(!s.edges().intersects(Edges::HORIZONTAL));
    }

    #[test]
    fn index_follows_all_order() {
        for (i, d) in Direction::ALL.into_iter().enumerate() {
            assert_eq!(d.index(), i);
        }
    }
}
