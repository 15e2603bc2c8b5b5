// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overflow indicators.
//!
//! Render a conditional shadow for each edge, plus one persistent fade that
//! animates toward the state instead of popping in and out. Also prints the
//! element structure the toolkit is expected to build.
//!
//! Run:
//! - `cargo run -p understory_examples --example overflow_indicators`

use std::cell::Cell;

use kurbo::{Rect, Size};
use understory_overflow::host::{ElementId, Host};
use understory_overflow::indicator::{Indicator, IndicatorValue};
use understory_overflow::presentation::{ElementProps, Presentation};
use understory_overflow::types::{Direction, Edges, OverflowState};
use understory_overflow::{ContentRegion, Overflow, OverflowOptions};

const VIEWPORT: ElementId = ElementId(10);
const CONTENT: ElementId = ElementId(11);

/// A vertical list inside a 300px tall viewport.
struct List {
    rows: Cell<usize>,
    scroll_y: Cell<f64>,
}

const ROW_HEIGHT: f64 = 24.0;
const VIEWPORT_SIZE: Size = Size::new(240.0, 300.0);

impl Host for List {
    fn client_rect(&self, element: ElementId) -> Option<Rect> {
        match element {
            VIEWPORT => Some(VIEWPORT_SIZE.to_rect()),
            CONTENT => {
                let height = self.rows.get() as f64 * ROW_HEIGHT;
                let top = -self.scroll_y.get();
                Some(Rect::new(0.0, top, VIEWPORT_SIZE.width, top + height))
            }
            _ => None,
        }
    }
}

fn describe(name: &str, props: &ElementProps) {
    let attrs: Vec<_> = props.attributes.keys().map(String::as_str).collect();
    println!("<{name} {}> style=\"{}\"", attrs.join(" "), props.style.to_css());
}

/// Pick one combined shadow for the edges that have hidden content.
fn shadow_for(state: &OverflowState) -> &'static str {
    let edges = state.edges();
    if edges.contains(Edges::VERTICAL) {
        "inset-vertical"
    } else if edges.contains(Edges::UP) {
        "inset-top"
    } else if edges.contains(Edges::DOWN) {
        "inset-bottom"
    } else if edges.intersects(Edges::HORIZONTAL) {
        "inset-side"
    } else {
        "none"
    }
}

fn main() {
    let options = OverflowOptions {
        presentation: Presentation::default()
            .with_class("message-list")
            .with_style("max-height", "300px"),
        ..Default::default()
    };
    let mut overflow = Overflow::new(options);
    overflow.mount_content(ContentRegion::new(VIEWPORT, CONTENT));

    describe("container", &overflow.container_props());
    describe("viewport", &overflow.viewport_props());
    if let Some(content) = overflow.content_props() {
        describe("content", &content);
    }

    let mut shadows: Vec<_> = Direction::ALL
        .into_iter()
        .map(|d| Indicator::conditional(Some(d), d.name()))
        .collect();
    let opacity = Cell::new(0.0_f64);
    let mut fade = Indicator::persistent(Some(Direction::Down), |value, _viewport| {
        let target = if value == IndicatorValue::Scoped(true) { 1.0 } else { 0.0 };
        // Ease halfway toward the target each time the state changes.
        opacity.set(opacity.get() + (target - opacity.get()) * 0.5);
        opacity.get()
    });

    let list = List {
        rows: Cell::new(5),
        scroll_y: Cell::new(0.0),
    };
    let mut frame = |label: &str, overflow: &mut Overflow<'_>| {
        let changed = overflow.update(&list);
        let context = overflow.context();
        let visible: Vec<_> = shadows
            .iter_mut()
            .filter_map(|s| s.render(context).copied())
            .collect();
        let alpha = fade.render(context).copied().unwrap_or_default();
        let shadow = shadow_for(&context.state);
        println!(
            "{label:>16}: changed={changed:<5} shadows={visible:?} combined={shadow} fade={alpha:.2}"
        );
    };

    frame("short list", &mut overflow);
    list.rows.set(40);
    frame("rows appended", &mut overflow);
    list.scroll_y.set(400.0);
    frame("scrolled", &mut overflow);
    list.scroll_y.set(40.0 * ROW_HEIGHT - VIEWPORT_SIZE.height);
    frame("at the end", &mut overflow);
    frame("idle", &mut overflow);
}
