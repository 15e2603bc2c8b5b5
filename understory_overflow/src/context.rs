// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared engine context and its dispatch handle.
//!
//! ## Overview
//!
//! [`EngineContext`] bundles what consumers of an [`Overflow`](crate::Overflow)
//! need: the committed state, a [`Dispatch`] handle, the configured tolerance
//! and the [`ViewportHandle`]. The root hands it out as `Rc<EngineContext>` and
//! rebuilds it only when the state or tolerance changes, so consumers can
//! detect changes with [`Rc::ptr_eq`] (or [`Weak::ptr_eq`](alloc::rc::Weak::ptr_eq)
//! when they hold it weakly).
//!
//! The context is passed explicitly; there is no ambient lookup.

use core::cell::RefCell;

use alloc::collections::VecDeque;
use alloc::rc::Rc;

use crate::host::ViewportHandle;
use crate::tolerance::Tolerance;
use crate::types::{ChangeEvent, OverflowState};

/// Handle for queueing [`ChangeEvent`]s into an engine's update queue.
///
/// Any number of producers may hold a clone. Events are only reduced when the
/// owning [`Overflow`](crate::Overflow) runs, one after another, which keeps
/// the reducer the single writer of the state.
#[derive(Clone, Debug, Default)]
pub struct Dispatch {
    queue: Rc<RefCell<VecDeque<ChangeEvent>>>,
}

impl Dispatch {
    /// Create a handle with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `event`.
    pub fn dispatch(&self, event: ChangeEvent) {
        self.queue.borrow_mut().push_back(event);
    }

    /// Number of queued events.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Pop the oldest queued event.
    pub(crate) fn take(&self) -> Option<ChangeEvent> {
        self.queue.borrow_mut().pop_front()
    }

    /// True if both handles feed the same queue.
    pub fn same_queue(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.queue, &other.queue)
    }
}

/// Everything an overflow consumer reads.
#[derive(Clone, Debug)]
pub struct EngineContext {
    /// The committed overflow state.
    pub state: Rc<OverflowState>,
    /// Queue into the owning engine.
    pub dispatch: Dispatch,
    /// The configured tolerance.
    pub tolerance: Tolerance,
    /// Handle to the scroll viewport element.
    pub viewport: ViewportHandle,
}

impl EngineContext {
    /// Shorthand for `self.state.any()`.
    pub fn any(&self) -> bool {
        self.state.any()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    #[test]
    fn clones_share_one_queue() {
        let a = Dispatch::new();
        let b = a.clone();
        assert!(a.same_queue(&b));
        assert!(!a.same_queue(&Dispatch::new()));

        a.dispatch(ChangeEvent::change(Direction::Up, true));
        b.dispatch(ChangeEvent::change(Direction::Down, true));
        assert_eq!(a.pending(), 2);
        assert_eq!(b.take(), Some(ChangeEvent::change(Direction::Up, true)));
        assert_eq!(a.take(), Some(ChangeEvent::change(Direction::Down, true)));
        assert_eq!(a.take(), None);
    }
}
