// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The overflow state store: a pure reducer over [`ChangeEvent`]s.
//!
//! ## Referential stability
//!
//! [`reduce`] returns the *same* `Rc` when an event would not change anything.
//! Downstream code compares states (and the contexts built from them) with
//! [`Rc::ptr_eq`] to skip redundant work, so a no-op event must never allocate.
//!
//! ```
//! use std::rc::Rc;
//!
//! use understory_overflow::state::reduce;
//! use understory_overflow::types::{ChangeEvent, Direction, OverflowState};
//!
//! let s0 = Rc::new(OverflowState::default());
//! let s1 = reduce(&s0, ChangeEvent::change(Direction::Down, false));
//! assert!(Rc::ptr_eq(&s0, &s1));
//!
//! let s2 = reduce(&s1, ChangeEvent::change(Direction::Down, true));
//! assert!(s2.down);
//! assert!(!Rc::ptr_eq(&s1, &s2));
//! ```

use alloc::rc::Rc;

use crate::types::{ChangeEvent, OverflowState};

/// Apply `event` to `state`.
///
/// Returns a clone of the input `Rc` when the direction already holds the
/// requested value, otherwise a new state with only that direction replaced.
pub fn reduce(state: &Rc<OverflowState>, event: ChangeEvent) -> Rc<OverflowState> {
    match event {
        ChangeEvent::Change {
            direction,
            can_scroll,
        } => {
            if state.get(direction) == can_scroll {
                Rc::clone(state)
            } else {
                Rc::new(state.with(direction, can_scroll))
            }
        }
    }
}

/// Holder of the canonical [`OverflowState`].
///
/// The store is the only writer of the state. It is owned by the
/// [`Overflow`](crate::Overflow) root, which feeds it the events queued
/// through the context's [`Dispatch`](crate::context::Dispatch) handle.
#[derive(Clone, Debug)]
pub struct Store {
    state: Rc<OverflowState>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Create a store holding the initial (all `false`) state.
    pub fn new() -> Self {
        Self {
            state: Rc::new(OverflowState::NONE),
        }
    }

    /// The current committed state.
    pub fn state(&self) -> &Rc<OverflowState> {
        &self.state
    }

    /// Reduce `event` into the store. Returns `true` if the state changed.
    pub fn apply(&mut self, event: ChangeEvent) -> bool {
        let next = reduce(&self.state, event);
        if Rc::ptr_eq(&next, &self.state) {
            return false;
        }
        log::trace!("overflow state {:?} -> {:?}", *self.state, *next);
        self.state = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    #[test]
    fn initial_state_is_all_false() {
        let store = Store::new();
        assert_eq!(**store.state(), OverflowState::NONE);
    }

    #[test]
    fn same_value_returns_same_rc() {
        let s0 = Rc::new(OverflowState::NONE.with(Direction::Left, true));
        for d in Direction::ALL {
            let current = s0.get(d);
            let s1 = reduce(&s0, ChangeEvent::change(d, current));
            assert!(Rc::ptr_eq(&s0, &s1), "no-op on {d} must keep identity");
        }
    }

    #[test]
    fn update_touches_one_direction() {
        let s0 = Rc::new(OverflowState {
            up: true,
            left: false,
            right: true,
            down: false,
        });
        let s1 = reduce(&s0, ChangeEvent::change(Direction::Down, true));
        assert_eq!(
            *s1,
            OverflowState {
                up: true,
                left: false,
                right: true,
                down: true,
            }
        );
        // The input is untouched.
        assert!(!s0.down);
    }

    #[test]
    fn order_of_independent_events_does_not_matter() {
        let events = [
            ChangeEvent::change(Direction::Up, true),
            ChangeEvent::change(Direction::Right, true),
            ChangeEvent::change(Direction::Down, true),
        ];
        let mut forward = Store::new();
        for e in events {
            forward.apply(e);
        }
        let mut backward = Store::new();
        for e in events.into_iter().rev() {
            backward.apply(e);
        }
        assert_eq!(**forward.state(), **backward.state());
    }

    #[test]
    fn apply_reports_changes() {
        let mut store = Store::new();
        assert!(!store.apply(ChangeEvent::change(Direction::Up, false)));
        assert!(store.apply(ChangeEvent::change(Direction::Up, true)));
        assert!(!store.apply(ChangeEvent::change(Direction::Up, true)));
        assert!(store.state().up);
    }
}
