// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directional intersection sensors and the manager that owns them.
//!
//! ## Overview
//!
//! A [`Sensor`] binds the viewport (its root) to a [`WatchBoundary`] (its
//! target). On each layout pass it shifts the viewport rectangle by its
//! direction's [`RootMargin`], intersects the boundary with the shifted
//! rectangle and produces a [`SensorEntry`]. An entry is only reported when it
//! lands in a different threshold bucket than the previous one, when its
//! intersecting flag flips, or when the boundary gains or loses its laid-out
//! size; the first check after [`Sensor::observe`] always reports.
//!
//! The [`SensorManager`] owns exactly four sensors, one per [`Direction`], and
//! turns their entries into [`SensorCallback`]s. Callbacks are queued by the
//! caller and run on a later turn, where they dispatch a
//! [`ChangeEvent`](crate::types::ChangeEvent) unless their generation has been
//! retired in the meantime.
//!
//! ## Intersection rules
//!
//! - Rectangles that merely share an edge intersect with zero area.
//! - The ratio is intersection area over boundary area; a zero-area boundary
//!   that intersects has ratio `1`.
//! - Thresholds are [`THRESHOLDS`]: the exact-touch bucket (`0`) is kept
//!   apart from any real overlap (`1e-12`).
//! - A boundary with zero width *and* zero height never scrolls (it has not
//!   been laid out yet).
//! - A ratio of exactly `0` means "not intersecting", whatever the flag says.
//!
//! ## Generations
//!
//! Every attachment of the sensors to a boundary starts a generation with its
//! own retired flag. Re-targeting and teardown set the flag *before*
//! detaching, so callbacks that were already queued turn into no-ops instead
//! of dispatching stale values.

use core::cell::Cell;

use alloc::rc::Rc;
use alloc::vec::Vec;
use kurbo::Rect;

use crate::context::Dispatch;
use crate::host::{ElementId, Host};
use crate::margin::RootMargin;
use crate::tolerance::{Tolerance, WatchBoundary};
use crate::types::{ChangeEvent, Direction};

/// Intersection thresholds shared by all sensors.
pub const THRESHOLDS: [f64; 2] = [0.0, 1e-12];

/// One observation made by a [`Sensor`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SensorEntry {
    /// Edge the reporting sensor watches.
    pub direction: Direction,
    /// Client rectangle of the watch boundary.
    pub bounding_rect: Rect,
    /// The viewport after applying the direction's root margin.
    pub root_bounds: Rect,
    /// Overlap of `bounding_rect` and `root_bounds` (zero-sized when they only touch).
    pub intersection_rect: Rect,
    /// Intersection area over boundary area.
    pub intersection_ratio: f64,
    /// Whether the rectangles overlap or touch.
    pub is_intersecting: bool,
}

impl SensorEntry {
    /// Compute the entry for `target` against `root` shifted toward `direction`.
    pub fn compute(direction: Direction, root: Rect, target: Rect) -> Self {
        let root_bounds = RootMargin::for_direction(direction).apply(root);
        let overlap = intersect_inclusive(target, root_bounds);
        let is_intersecting = overlap.is_some();
        let intersection_rect = overlap.unwrap_or(Rect::ZERO);
        let target_area = target.area();
        let intersection_ratio = if target_area > 0.0 {
            intersection_rect.area() / target_area
        } else if is_intersecting {
            1.0
        } else {
            0.0
        };
        Self {
            direction,
            bounding_rect: target,
            root_bounds,
            intersection_rect,
            intersection_ratio,
            is_intersecting,
        }
    }

    /// False while the boundary has neither width nor height.
    pub fn is_measured(&self) -> bool {
        let r = self.bounding_rect;
        r.width() != 0.0 || r.height() != 0.0
    }

    /// Whether this entry means content extends past the sensor's edge.
    pub fn can_scroll(&self) -> bool {
        if !self.is_measured() {
            return false;
        }
        if self.intersection_ratio == 0.0 {
            return false;
        }
        self.is_intersecting
    }

    /// Index of the first threshold above the ratio, or the threshold count.
    pub fn threshold_index(&self) -> usize {
        THRESHOLDS
            .iter()
            .position(|&t| t > self.intersection_ratio)
            .unwrap_or(THRESHOLDS.len())
    }
}

/// Edge-inclusive intersection: touching rectangles yield a degenerate rect.
fn intersect_inclusive(a: Rect, b: Rect) -> Option<Rect> {
    let x0 = a.x0.max(b.x0);
    let y0 = a.y0.max(b.y0);
    let x1 = a.x1.min(b.x1);
    let y1 = a.y1.min(b.y1);
    (x0 <= x1 && y0 <= y1).then(|| Rect::new(x0, y0, x1, y1))
}

/// A single directional intersection observer.
#[derive(Clone, Debug)]
pub struct Sensor {
    direction: Direction,
    root: ElementId,
    target: Option<WatchBoundary>,
    previous: Option<(usize, bool, bool)>,
    connected: bool,
}

impl Sensor {
    /// Create a sensor rooted at `root` watching past `direction`'s edge.
    pub fn new(direction: Direction, root: ElementId) -> Self {
        Self {
            direction,
            root,
            target: None,
            previous: None,
            connected: true,
        }
    }

    /// Edge this sensor watches.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The observed boundary, if any.
    pub fn target(&self) -> Option<WatchBoundary> {
        self.target
    }

    /// False once [`disconnect`](Self::disconnect) has been called.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Start observing `target`, replacing any previous target.
    ///
    /// The next [`check`](Self::check) always reports. Ignored after disconnect.
    pub fn observe(&mut self, target: WatchBoundary) {
        if !self.connected {
            return;
        }
        self.target = Some(target);
        self.previous = None;
    }

    /// Stop observing `target`. Does nothing if it is not the current target.
    pub fn unobserve(&mut self, target: WatchBoundary) {
        if self.target == Some(target) {
            self.target = None;
            self.previous = None;
        }
    }

    /// Stop observing everything. Idempotent; the sensor cannot be reused.
    pub fn disconnect(&mut self) {
        self.connected = false;
        self.target = None;
        self.previous = None;
    }

    /// Evaluate the current geometry and return an entry if it should be reported.
    ///
    /// Returns `None` when nothing is observed, when the root or boundary is
    /// not mounted, or when the threshold bucket, the intersecting flag and
    /// the measured flag are all unchanged since the last report.
    pub fn check<H: Host + ?Sized>(
        &mut self,
        host: &H,
        tolerance: &Tolerance,
    ) -> Option<SensorEntry> {
        let target = self.target?;
        let root = host.client_rect(self.root)?;
        let bounds = target.client_rect(host, tolerance)?;
        let entry = SensorEntry::compute(self.direction, root, bounds);
        let bucket = (
            entry.threshold_index(),
            entry.is_intersecting,
            entry.is_measured(),
        );
        if self.previous == Some(bucket) {
            return None;
        }
        self.previous = Some(bucket);
        Some(entry)
    }
}

/// A queued sensor report, waiting for its turn on the event loop.
#[derive(Clone, Debug)]
pub struct SensorCallback {
    entry: SensorEntry,
    retired: Rc<Cell<bool>>,
    dispatch: Dispatch,
}

impl SensorCallback {
    /// The entry this callback carries.
    pub fn entry(&self) -> &SensorEntry {
        &self.entry
    }

    /// True if the generation that produced this callback has been retired.
    pub fn is_retired(&self) -> bool {
        self.retired.get()
    }

    /// Dispatch the entry's [`ChangeEvent`] unless retired.
    ///
    /// Returns whether an event was dispatched.
    pub fn run(self) -> bool {
        if self.retired.get() {
            log::trace!(
                "dropping late {} sensor callback after detach",
                self.entry.direction
            );
            return false;
        }
        let can_scroll = self.entry.can_scroll();
        log::trace!("{} sensor reports can_scroll={can_scroll}", self.entry.direction);
        self.dispatch
            .dispatch(ChangeEvent::change(self.entry.direction, can_scroll));
        true
    }
}

/// Owner of the four directional sensors of one content region.
///
/// Dropping the manager tears it down.
#[derive(Debug)]
pub struct SensorManager {
    sensors: [Sensor; 4],
    dispatch: Dispatch,
    retired: Rc<Cell<bool>>,
    watch: Option<WatchBoundary>,
    torn_down: bool,
}

impl SensorManager {
    /// Create four detached sensors rooted at `viewport`, reporting to `dispatch`.
    pub fn new(viewport: ElementId, dispatch: Dispatch) -> Self {
        Self {
            sensors: Direction::ALL.map(|d| Sensor::new(d, viewport)),
            dispatch,
            retired: Rc::new(Cell::new(false)),
            watch: None,
            torn_down: false,
        }
    }

    /// The sensor for `direction`.
    pub fn sensor(&self, direction: Direction) -> &Sensor {
        &self.sensors[direction.index()]
    }

    /// The boundary currently observed.
    pub fn watch(&self) -> Option<WatchBoundary> {
        self.watch
    }

    /// True once [`teardown`](Self::teardown) has started.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Point all four sensors at `boundary`.
    ///
    /// If another boundary is observed it is fully detached first and its
    /// queued callbacks are retired. Re-attaching the same boundary is a no-op.
    pub fn attach(&mut self, boundary: WatchBoundary) {
        if self.torn_down {
            log::debug!("ignoring attach to {boundary:?} after teardown");
            return;
        }
        if self.watch == Some(boundary) {
            return;
        }
        self.detach();
        log::debug!("sensors observing {boundary:?}");
        for sensor in &mut self.sensors {
            sensor.observe(boundary);
        }
        self.watch = Some(boundary);
    }

    /// Stop observing the current boundary and retire its pending callbacks.
    pub fn detach(&mut self) {
        let Some(old) = self.watch.take() else {
            return;
        };
        self.retired.set(true);
        self.retired = Rc::new(Cell::new(false));
        for sensor in &mut self.sensors {
            sensor.unobserve(old);
        }
        log::debug!("sensors detached from {old:?}");
    }

    /// Evaluate all four sensors and return callbacks for those that report.
    ///
    /// Callbacks come back in [`Direction::ALL`] order; the caller queues
    /// them and runs them on a later turn.
    pub fn sense<H: Host + ?Sized>(
        &mut self,
        host: &H,
        tolerance: &Tolerance,
    ) -> Vec<SensorCallback> {
        if self.torn_down {
            return Vec::new();
        }
        let mut out = Vec::new();
        for sensor in &mut self.sensors {
            if let Some(entry) = sensor.check(host, tolerance) {
                out.push(SensorCallback {
                    entry,
                    retired: Rc::clone(&self.retired),
                    dispatch: self.dispatch.clone(),
                });
            }
        }
        out
    }

    /// Disconnect all sensors. Idempotent.
    ///
    /// The retired flag is raised before any sensor disconnects, so callbacks
    /// queued earlier never dispatch.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.retired.set(true);
        self.watch = None;
        for sensor in &mut self.sensors {
            sensor.disconnect();
        }
        log::debug!("sensors torn down");
    }
}

impl Drop for SensorManager {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: ElementId = ElementId(1);
    const CONTENT: ElementId = ElementId(2);
    const VIEWPORT_RECT: Rect = Rect::new(0.0, 0.0, 400.0, 300.0);

    struct Layout {
        content: Rect,
    }

    impl Host for Layout {
        fn client_rect(&self, element: ElementId) -> Option<Rect> {
            match element {
                VIEWPORT => Some(VIEWPORT_RECT),
                CONTENT => Some(self.content),
                _ => None,
            }
        }
    }

    fn entry(direction: Direction, target: Rect) -> SensorEntry {
        SensorEntry::compute(direction, VIEWPORT_RECT, target)
    }

    #[test]
    fn touching_edge_is_not_scrollable() {
        // Content flush with the top of the viewport touches the `Up` band.
        let e = entry(Direction::Up, Rect::new(0.0, 0.0, 400.0, 600.0));
        assert!(e.is_intersecting);
        assert_eq!(e.intersection_ratio, 0.0);
        assert_eq!(e.threshold_index(), 1);
        assert!(!e.can_scroll());
    }

    #[test]
    fn overlap_beyond_edge_is_scrollable() {
        let e = entry(Direction::Down, Rect::new(0.0, 0.0, 400.0, 600.0));
        assert!(e.is_intersecting);
        assert_eq!(e.intersection_ratio, 0.5);
        assert_eq!(e.threshold_index(), 2);
        assert!(e.can_scroll());
    }

    #[test]
    fn tiny_overlap_counts() {
        let e = entry(Direction::Right, Rect::new(0.0, 0.0, 400.001, 300.0));
        assert!(e.intersection_ratio > 0.0);
        assert!(e.can_scroll());
    }

    #[test]
    fn disjoint_is_not_scrollable() {
        let e = entry(Direction::Left, Rect::new(10.0, 0.0, 390.0, 300.0));
        assert!(!e.is_intersecting);
        assert_eq!(e.threshold_index(), 1);
        assert!(!e.can_scroll());
    }

    #[test]
    fn zero_size_boundary_never_scrolls() {
        // A zero-area rect at the band's corner still "intersects" with ratio 1.
        let e = entry(Direction::Down, Rect::new(0.0, 400.0, 0.0, 400.0));
        assert!(e.is_intersecting);
        assert_eq!(e.intersection_ratio, 1.0);
        assert!(!e.can_scroll());
    }

    #[test]
    fn ratio_zero_overrides_intersecting_flag() {
        let e = SensorEntry {
            direction: Direction::Down,
            bounding_rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            root_bounds: VIEWPORT_RECT,
            intersection_rect: Rect::ZERO,
            intersection_ratio: 0.0,
            is_intersecting: true,
        };
        assert!(!e.can_scroll());
    }

    #[test]
    fn sensor_reports_only_bucket_changes() {
        let mut layout = Layout {
            content: Rect::new(0.0, 0.0, 400.0, 600.0),
        };
        let mut s = Sensor::new(Direction::Down, VIEWPORT);
        assert!(s.check(&layout, &Tolerance::ZERO).is_none(), "nothing observed");

        s.observe(WatchBoundary::Content(CONTENT));
        let first = s.check(&layout, &Tolerance::ZERO).unwrap();
        assert!(first.can_scroll());

        // Scrolling a bit keeps the same bucket.
        layout.content = Rect::new(0.0, -50.0, 400.0, 550.0);
        assert!(s.check(&layout, &Tolerance::ZERO).is_none());

        // Reaching the bottom flips to the touching bucket.
        layout.content = Rect::new(0.0, -300.0, 400.0, 300.0);
        let last = s.check(&layout, &Tolerance::ZERO).unwrap();
        assert!(!last.can_scroll());
    }

    #[test]
    fn sensor_reports_when_layout_arrives() {
        let mut layout = Layout {
            content: Rect::new(0.0, 400.0, 0.0, 400.0),
        };
        let mut s = Sensor::new(Direction::Down, VIEWPORT);
        s.observe(WatchBoundary::Content(CONTENT));
        let unmeasured = s.check(&layout, &Tolerance::ZERO).unwrap();
        assert!(!unmeasured.can_scroll());

        // Same bucket as the unmeasured entry, but now it has a size.
        layout.content = Rect::new(0.0, 0.0, 400.0, 600.0);
        let measured = s.check(&layout, &Tolerance::ZERO).unwrap();
        assert_eq!(measured.threshold_index(), unmeasured.threshold_index());
        assert!(measured.can_scroll());
    }

    #[test]
    fn unobserve_other_target_is_ignored() {
        let mut s = Sensor::new(Direction::Up, VIEWPORT);
        s.observe(WatchBoundary::Content(CONTENT));
        s.unobserve(WatchBoundary::ToleranceInset(CONTENT));
        assert_eq!(s.target(), Some(WatchBoundary::Content(CONTENT)));
        s.disconnect();
        s.observe(WatchBoundary::Content(CONTENT));
        assert_eq!(s.target(), None, "disconnected sensors stay detached");
    }

    #[test]
    fn manager_dispatches_through_callbacks() {
        let layout = Layout {
            content: Rect::new(0.0, 0.0, 400.0, 600.0),
        };
        let dispatch = Dispatch::new();
        let mut m = SensorManager::new(VIEWPORT, dispatch.clone());
        m.attach(WatchBoundary::Content(CONTENT));

        let callbacks = m.sense(&layout, &Tolerance::ZERO);
        assert_eq!(callbacks.len(), 4);
        for cb in callbacks {
            assert!(cb.run());
        }
        let events: Vec<_> = core::iter::from_fn(|| dispatch.take()).collect();
        assert_eq!(
            events,
            [
                ChangeEvent::change(Direction::Up, false),
                ChangeEvent::change(Direction::Left, false),
                ChangeEvent::change(Direction::Right, false),
                ChangeEvent::change(Direction::Down, true),
            ]
        );
        assert!(m.sense(&layout, &Tolerance::ZERO).is_empty());
    }

    #[test]
    fn teardown_retires_queued_callbacks() {
        let layout = Layout {
            content: Rect::new(0.0, 0.0, 400.0, 600.0),
        };
        let dispatch = Dispatch::new();
        let mut m = SensorManager::new(VIEWPORT, dispatch.clone());
        m.attach(WatchBoundary::Content(CONTENT));
        let queued = m.sense(&layout, &Tolerance::ZERO);

        m.teardown();
        m.teardown();
        assert!(m.is_torn_down());
        for d in Direction::ALL {
            assert!(!m.sensor(d).is_connected());
        }
        for cb in queued {
            assert!(cb.is_retired());
            assert!(!cb.run());
        }
        assert!(dispatch.take().is_none());
        assert!(m.sense(&layout, &Tolerance::ZERO).is_empty());
    }

    #[test]
    fn reattach_retires_old_generation() {
        let layout = Layout {
            content: Rect::new(0.0, 0.0, 400.0, 600.0),
        };
        let dispatch = Dispatch::new();
        let mut m = SensorManager::new(VIEWPORT, dispatch.clone());
        m.attach(WatchBoundary::Content(CONTENT));
        let stale = m.sense(&layout, &Tolerance::ZERO);

        let tolerance = Tolerance::px(10.0);
        m.attach(WatchBoundary::ToleranceInset(CONTENT));
        assert_eq!(m.watch(), Some(WatchBoundary::ToleranceInset(CONTENT)));
        for d in Direction::ALL {
            assert_eq!(
                m.sensor(d).target(),
                Some(WatchBoundary::ToleranceInset(CONTENT))
            );
        }
        assert!(stale.into_iter().all(|cb| !cb.run()));

        // The new generation reports afresh.
        let fresh = m.sense(&layout, &tolerance);
        assert_eq!(fresh.len(), 4);
        assert!(fresh.iter().all(|cb| !cb.is_retired()));
    }

    #[test]
    fn attach_same_boundary_keeps_generation() {
        let layout = Layout {
            content: Rect::new(0.0, 0.0, 400.0, 600.0),
        };
        let mut m = SensorManager::new(VIEWPORT, Dispatch::new());
        m.attach(WatchBoundary::Content(CONTENT));
        let queued = m.sense(&layout, &Tolerance::ZERO);
        m.attach(WatchBoundary::Content(CONTENT));
        assert!(queued.iter().all(|cb| !cb.is_retired()));
    }
}
