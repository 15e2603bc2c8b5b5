// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host boundary: element handles and the geometry the engine reads.
//!
//! This crate never performs layout or scrolling. The embedding toolkit owns
//! the real elements and reports their geometry through [`Host`] whenever it
//! asks the engine to [`observe`](crate::Overflow::observe) a layout pass.

use core::cell::Cell;

use alloc::rc::Rc;
use kurbo::Rect;

/// Opaque handle to an element owned by the host.
///
/// The engine never interprets the value; it only hands it back to
/// [`Host::client_rect`] and friends.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// Geometry provider implemented by the embedding toolkit.
///
/// All rectangles must be in one shared client coordinate space and must be
/// the element's *unclipped* border box: a content box that is scrolled
/// partly out of its viewport still reports its full extent.
pub trait Host {
    /// Border box of `element`, or `None` if it is not mounted.
    ///
    /// Elements that are mounted but not laid out (for example inside a
    /// `display: none` subtree) should report a zero-size rectangle.
    fn client_rect(&self, element: ElementId) -> Option<Rect>;

    /// Computed font size of `element` in pixels, used to resolve `em`.
    fn font_size(&self, element: ElementId) -> f64 {
        let _ = element;
        16.0
    }

    /// Font size of the document root in pixels, used to resolve `rem`.
    fn root_font_size(&self) -> f64 {
        16.0
    }
}

impl<H: Host + ?Sized> Host for &H {
    fn client_rect(&self, element: ElementId) -> Option<Rect> {
        (**self).client_rect(element)
    }

    fn font_size(&self, element: ElementId) -> f64 {
        (**self).font_size(element)
    }

    fn root_font_size(&self) -> f64 {
        (**self).root_font_size()
    }
}

/// Shared handle to the scroll viewport element.
///
/// The handle keeps its identity for the whole life of an
/// [`Overflow`](crate::Overflow); only the element it points at changes as a
/// content region is mounted or unmounted. Consumers use it to trigger
/// programmatic scrolling through their toolkit.
#[derive(Clone, Debug, Default)]
pub struct ViewportHandle {
    current: Rc<Cell<Option<ElementId>>>,
}

impl ViewportHandle {
    /// Create an empty handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// The viewport element, if a content region is mounted.
    pub fn get(&self) -> Option<ElementId> {
        self.current.get()
    }

    pub(crate) fn set(&self, element: Option<ElementId>) {
        self.current.set(element);
    }

    /// True if both handles refer to the same underlying slot.
    pub fn same_handle(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.current, &other.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_slot() {
        let a = ViewportHandle::new();
        let b = a.clone();
        assert!(a.same_handle(&b));
        a.set(Some(ElementId(7)));
        assert_eq!(b.get(), Some(ElementId(7)));
        a.set(None);
        assert_eq!(b.get(), None);
        assert!(!a.same_handle(&ViewportHandle::new()));
    }
}
