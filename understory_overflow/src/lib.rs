// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_overflow --heading-base-level=0

//! Understory Overflow: edge overflow detection for scroll viewports.
//!
//! ## Overview
//!
//! This crate answers one question for a scrollable region: can it still scroll
//! up, left, right or down? It keeps a four-flag [`OverflowState`](crate::types::OverflowState)
//! current by watching the content box with four directional sensors, and
//! shares it with indicator consumers that draw shadows, arrows or fades.
//!
//! It does not lay anything out or scroll anything. The host toolkit reports
//! element rectangles through the [`Host`](crate::host::Host) trait, and the
//! [`presentation`] module describes the element structure the host should build.
//!
//! ## Sensors
//!
//! Each [`Sensor`](crate::sensor::Sensor) shifts the viewport rectangle one full
//! viewport length toward its edge ([`RootMargin`](crate::margin::RootMargin))
//! and checks whether the content still overlaps the shifted band. Content that
//! merely touches the band does not count. A [`Tolerance`](crate::tolerance::Tolerance)
//! shrinks the watched box so that the last few units of scroll are ignored.
//!
//! Sensor reports are queued as callbacks and delivered on a later
//! [`Overflow::run`]. Re-targeting or tearing the sensors down retires queued
//! callbacks, so late reports never reach the state.
//!
//! ## State
//!
//! Reports become [`ChangeEvent`](crate::types::ChangeEvent)s that go through a
//! [`reduce`](crate::state::reduce) function. A report that does not change a
//! direction keeps the very same `Rc`, and the shared
//! [`EngineContext`](crate::context::EngineContext) is only rebuilt when
//! something changed, so consumers can skip work with pointer comparisons.
//!
//! ## Workflow
//!
//! 1) Build an [`Overflow`] with [`OverflowOptions`] and mount a [`ContentRegion`].
//! 2) After every layout pass (scroll, resize, content change) call
//!    [`Overflow::update`] with your [`Host`](crate::host::Host).
//! 3) Render [`Indicator`](crate::indicator::Indicator)s against [`Overflow::context`],
//!    or install [`Overflow::set_on_state_change`] to be told about changes.
//!
//! ```
//! use kurbo::Rect;
//! use understory_overflow::host::{ElementId, Host};
//! use understory_overflow::types::Direction;
//! use understory_overflow::{ContentRegion, Overflow, OverflowOptions};
//!
//! const VIEWPORT: ElementId = ElementId(1);
//! const CONTENT: ElementId = ElementId(2);
//!
//! /// A 400×300 viewport holding 400×600 of content, scrolled by `scroll_y`.
//! struct Page {
//!     scroll_y: f64,
//! }
//!
//! impl Host for Page {
//!     fn client_rect(&self, element: ElementId) -> Option<Rect> {
//!         match element {
//!             VIEWPORT => Some(Rect::new(0.0, 0.0, 400.0, 300.0)),
//!             CONTENT => Some(Rect::new(0.0, -self.scroll_y, 400.0, 600.0 - self.scroll_y)),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut overflow = Overflow::new(OverflowOptions::default());
//! overflow.mount_content(ContentRegion::new(VIEWPORT, CONTENT));
//!
//! let mut page = Page { scroll_y: 0.0 };
//! overflow.update(&page);
//! assert!(overflow.state().get(Direction::Down));
//! assert!(!overflow.state().get(Direction::Up));
//!
//! page.scroll_y = 300.0;
//! overflow.update(&page);
//! assert!(!overflow.state().get(Direction::Down));
//! assert!(overflow.state().get(Direction::Up));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod context;
pub mod host;
pub mod indicator;
pub mod margin;
pub mod presentation;
pub mod sensor;
pub mod state;
pub mod tolerance;
pub mod types;

mod overflow;

pub use overflow::{ContentRegion, Overflow, OverflowOptions, StateChangeFn};
