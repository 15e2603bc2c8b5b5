// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overflow basics.
//!
//! Mount a content region, scroll it around, and watch the four flags change.
//! Then turn on a tolerance and see the last few pixels stop counting.
//!
//! Run:
//! - `cargo run -p understory_examples --example overflow_basics`

use std::cell::Cell;

use kurbo::{Rect, Size, Vec2};
use understory_overflow::host::{ElementId, Host};
use understory_overflow::types::OverflowState;
use understory_overflow::{ContentRegion, Overflow, OverflowOptions};

const VIEWPORT: ElementId = ElementId(1);
const CONTENT: ElementId = ElementId(2);

/// A scroll viewport with a fixed-size content box.
struct Scroller {
    viewport: Size,
    content: Size,
    offset: Cell<Vec2>,
}

impl Scroller {
    fn scroll_to(&self, x: f64, y: f64) {
        let max_x = (self.content.width - self.viewport.width).max(0.0);
        let max_y = (self.content.height - self.viewport.height).max(0.0);
        self.offset
            .set(Vec2::new(x.clamp(0.0, max_x), y.clamp(0.0, max_y)));
    }
}

impl Host for Scroller {
    fn client_rect(&self, element: ElementId) -> Option<Rect> {
        match element {
            VIEWPORT => Some(self.viewport.to_rect()),
            CONTENT => Some(self.content.to_rect() - self.offset.get()),
            _ => None,
        }
    }
}

fn arrows(state: &OverflowState) -> String {
    let mut s = String::new();
    for (on, glyph) in [
        (state.up, '↑'),
        (state.left, '←'),
        (state.right, '→'),
        (state.down, '↓'),
    ] {
        s.push(if on { glyph } else { '·' });
    }
    s
}

fn main() {
    let scroller = Scroller {
        viewport: Size::new(400.0, 300.0),
        content: Size::new(800.0, 900.0),
        offset: Cell::new(Vec2::ZERO),
    };

    let mut overflow = Overflow::new(OverflowOptions::default());
    overflow.mount_content(ContentRegion::new(VIEWPORT, CONTENT));
    overflow.set_on_state_change(|state, viewport| {
        println!("  state {} (viewport {:?})", arrows(state), viewport.get());
    });

    for (x, y) in [(0.0, 0.0), (200.0, 300.0), (400.0, 600.0), (400.0, 600.0)] {
        println!("scroll to ({x}, {y})");
        scroller.scroll_to(x, y);
        overflow.update(&scroller);
    }
    let end = **overflow.state();
    assert!(end.up && end.left && !end.right && !end.down);

    // Stop 8px short of the bottom-right corner, with and without tolerance.
    scroller.scroll_to(392.0, 592.0);
    overflow.update(&scroller);
    println!("8px short, no tolerance: {}", arrows(overflow.state()));
    assert!(overflow.state().right && overflow.state().down);

    overflow.set_tolerance(10.0);
    overflow.update(&scroller);
    println!("8px short, tolerance 10px: {}", arrows(overflow.state()));
    assert!(!overflow.state().right && !overflow.state().down);

    let tolerance = overflow.tolerance_props();
    if let Some(props) = tolerance {
        println!("tolerance inset style: {}", props.style.to_css());
    }

    overflow.unmount_content();
    println!("unmounted; viewport handle is {:?}", overflow.viewport().get());
}
