// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Indicator consumers: decide what to draw for an edge (or for any edge).
//!
//! ## Policies
//!
//! - [`RenderPolicy::Conditional`]: the content is present only while the
//!   watched direction can scroll. Use it for static affordances that can
//!   simply appear and disappear.
//! - [`RenderPolicy::Persistent`]: a callback that always produces output. It
//!   receives an [`IndicatorValue`] (the direction's boolean, or the whole
//!   state when no direction is set) plus the viewport handle, so it can
//!   animate across the true/false boundary without being torn down.
//!
//! ## Change detection
//!
//! An indicator keeps a weak reference to the last [`EngineContext`] it
//! rendered. A persistent callback is re-run only when it is handed a
//! different context, which happens exactly once per committed state change.
//!
//! ```
//! use understory_overflow::indicator::{Indicator, IndicatorValue};
//! use understory_overflow::types::Direction;
//! use understory_overflow::{Overflow, OverflowOptions};
//!
//! let overflow = Overflow::new(OverflowOptions::default());
//!
//! let mut arrow = Indicator::conditional(Some(Direction::Down), "v");
//! assert_eq!(arrow.render(overflow.context()), None);
//!
//! let mut badge = Indicator::persistent(None, |value, _viewport| match value {
//!     IndicatorValue::Aggregate(state) if state.any() => "more",
//!     _ => "all visible",
//! });
//! assert_eq!(badge.render(overflow.context()), Some(&"all visible"));
//! ```

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};

use crate::context::EngineContext;
use crate::host::ViewportHandle;
use crate::types::{Direction, OverflowState};

/// What a persistent indicator callback receives.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum IndicatorValue {
    /// The watched direction's value.
    Scoped(bool),
    /// All four directions, for indicators without a direction.
    Aggregate(OverflowState),
}

/// Callback type for [`RenderPolicy::Persistent`].
pub type RenderFn<'a, V> = Box<dyn FnMut(IndicatorValue, &ViewportHandle) -> V + 'a>;

/// How an [`Indicator`] produces output.
pub enum RenderPolicy<'a, V> {
    /// Present `V` only while the watched direction can scroll.
    Conditional(V),
    /// Always present the callback's latest output.
    Persistent(RenderFn<'a, V>),
}

impl<V: core::fmt::Debug> core::fmt::Debug for RenderPolicy<'_, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Conditional(v) => f.debug_tuple("Conditional").field(v).finish(),
            Self::Persistent(_) => f.debug_tuple("Persistent").finish_non_exhaustive(),
        }
    }
}

/// A consumer of an overflow context that renders edge affordances.
pub struct Indicator<'a, V> {
    direction: Option<Direction>,
    policy: RenderPolicy<'a, V>,
    seen: Weak<EngineContext>,
    output: Option<V>,
}

impl<V: core::fmt::Debug> core::fmt::Debug for Indicator<'_, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Indicator")
            .field("direction", &self.direction)
            .field("policy", &self.policy)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

impl<'a, V> Indicator<'a, V> {
    /// Create an indicator watching `direction` (or any direction if `None`).
    pub fn new(direction: Option<Direction>, policy: RenderPolicy<'a, V>) -> Self {
        Self {
            direction,
            policy,
            seen: Weak::new(),
            output: None,
        }
    }

    /// An indicator that shows `content` only while scrolling is possible.
    pub fn conditional(direction: Option<Direction>, content: V) -> Self {
        Self::new(direction, RenderPolicy::Conditional(content))
    }

    /// An indicator that always renders through `render`.
    pub fn persistent(
        direction: Option<Direction>,
        render: impl FnMut(IndicatorValue, &ViewportHandle) -> V + 'a,
    ) -> Self {
        Self::new(direction, RenderPolicy::Persistent(Box::new(render)))
    }

    /// The watched direction; `None` means any.
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Whether the watched direction (or any direction) can scroll in `state`.
    pub fn is_active(&self, state: &OverflowState) -> bool {
        match self.direction {
            Some(d) => state.get(d),
            None => state.any(),
        }
    }

    /// The value a persistent callback would receive for `state`.
    pub fn value(&self, state: &OverflowState) -> IndicatorValue {
        match self.direction {
            Some(d) => IndicatorValue::Scoped(state.get(d)),
            None => IndicatorValue::Aggregate(*state),
        }
    }

    /// Render against `context`.
    ///
    /// Conditional indicators return their content while active and `None`
    /// otherwise. Persistent indicators always return output, re-running the
    /// callback only if `context` differs from the last one rendered.
    pub fn render(&mut self, context: &Rc<EngineContext>) -> Option<&V> {
        let active = self.is_active(&context.state);
        let value = self.value(&context.state);
        let fresh = !Weak::ptr_eq(&self.seen, &Rc::downgrade(context));
        self.seen = Rc::downgrade(context);
        match &mut self.policy {
            RenderPolicy::Conditional(content) => active.then_some(&*content),
            RenderPolicy::Persistent(render) => {
                if fresh || self.output.is_none() {
                    self.output = Some(render(value, &context.viewport));
                }
                self.output.as_ref()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;
    use crate::context::Dispatch;
    use crate::tolerance::Tolerance;

    fn context(state: OverflowState) -> Rc<EngineContext> {
        Rc::new(EngineContext {
            state: Rc::new(state),
            dispatch: Dispatch::new(),
            tolerance: Tolerance::ZERO,
            viewport: ViewportHandle::new(),
        })
    }

    #[test]
    fn scoped_conditional_follows_its_direction() {
        let mut down = Indicator::conditional(Some(Direction::Down), 'v');
        assert_eq!(down.render(&context(OverflowState::NONE)), None);

        let only_up = OverflowState::NONE.with(Direction::Up, true);
        assert_eq!(down.render(&context(only_up)), None);

        let with_down = only_up.with(Direction::Down, true);
        assert_eq!(down.render(&context(with_down)), Some(&'v'));
    }

    #[test]
    fn unscoped_conditional_is_logical_or() {
        let mut any = Indicator::conditional(None, "scroll");
        assert_eq!(any.render(&context(OverflowState::NONE)), None);
        for d in Direction::ALL {
            let state = OverflowState::NONE.with(d, true);
            assert_eq!(any.render(&context(state)), Some(&"scroll"), "{d}");
        }
    }

    #[test]
    fn persistent_runs_on_every_new_context() {
        let calls = Cell::new(0);
        let mut ind = Indicator::persistent(Some(Direction::Right), |value, _| {
            calls.set(calls.get() + 1);
            value
        });

        let c0 = context(OverflowState::NONE);
        assert_eq!(ind.render(&c0), Some(&IndicatorValue::Scoped(false)));
        // Same context: cached.
        assert_eq!(ind.render(&c0), Some(&IndicatorValue::Scoped(false)));
        assert_eq!(calls.get(), 1);

        let c1 = context(OverflowState::NONE.with(Direction::Right, true));
        assert_eq!(ind.render(&c1), Some(&IndicatorValue::Scoped(true)));
        let c2 = context(OverflowState::NONE);
        assert_eq!(ind.render(&c2), Some(&IndicatorValue::Scoped(false)));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn unscoped_persistent_gets_aggregate() {
        let state = OverflowState {
            up: true,
            left: false,
            right: true,
            down: false,
        };
        let mut ind = Indicator::persistent(None, |value, viewport: &ViewportHandle| {
            (value, viewport.get())
        });
        assert_eq!(
            ind.render(&context(state)),
            Some(&(IndicatorValue::Aggregate(state), None))
        );
    }
}
