// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The engine root: options, the content region, and the update loop.

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::rc::Rc;

use crate::context::{Dispatch, EngineContext};
use crate::host::{ElementId, Host, ViewportHandle};
use crate::presentation::{self, ElementProps, Presentation};
use crate::sensor::{SensorCallback, SensorManager};
use crate::state::Store;
use crate::tolerance::{Tolerance, WatchBoundary};
use crate::types::OverflowState;

/// Configuration of an [`Overflow`] root.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverflowOptions {
    /// Distance from an edge at which scrolling counts as finished.
    pub tolerance: Tolerance,
    /// Hide the container without unmounting the content or its sensors.
    pub hidden: bool,
    /// Pass-through presentation for the outer container.
    pub presentation: Presentation,
}

/// The viewport/content pairing that sensors attach to.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentRegion {
    /// The clipped, scrollable element; root of all four sensors.
    pub viewport: ElementId,
    /// The element holding the content, sized to its natural extent.
    pub content: ElementId,
    /// Pass-through presentation for the content box.
    pub presentation: Presentation,
}

impl ContentRegion {
    /// Pair `viewport` with `content`, with no extra presentation.
    pub fn new(viewport: ElementId, content: ElementId) -> Self {
        Self {
            viewport,
            content,
            presentation: Presentation::default(),
        }
    }
}

/// Callback type for [`Overflow::set_on_state_change`].
pub type StateChangeFn<'a> = Box<dyn FnMut(&OverflowState, &ViewportHandle) + 'a>;

#[derive(Debug)]
struct MountedContent {
    region: ContentRegion,
    sensors: SensorManager,
}

/// An edge-overflow detection engine for one scroll viewport.
///
/// ## Lifecycle
///
/// 1) Create with [`Overflow::new`]; the state starts all `false`.
/// 2) [`mount_content`](Self::mount_content) a [`ContentRegion`]. Without one
///    the state never changes.
/// 3) After each layout pass of the host (scroll, resize, content change),
///    call [`observe`](Self::observe) to let the sensors queue callbacks, then
///    [`run`](Self::run) to deliver them and commit. [`update`](Self::update)
///    does both.
/// 4) Read [`context`](Self::context) from consumers such as
///    [`Indicator`](crate::indicator::Indicator).
///
/// [`unmount_content`](Self::unmount_content) (or dropping the engine) tears
/// the sensors down; callbacks still queued at that point are dropped.
pub struct Overflow<'a> {
    options: OverflowOptions,
    store: Store,
    dispatch: Dispatch,
    viewport: ViewportHandle,
    context: Rc<EngineContext>,
    content: Option<MountedContent>,
    tasks: VecDeque<SensorCallback>,
    on_state_change: Option<StateChangeFn<'a>>,
}

impl core::fmt::Debug for Overflow<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Overflow")
            .field("options", &self.options)
            .field("state", &*self.context.state)
            .field("content", &self.content)
            .field("queued_callbacks", &self.tasks.len())
            .field("has_on_state_change", &self.on_state_change.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for Overflow<'_> {
    fn default() -> Self {
        Self::new(OverflowOptions::default())
    }
}

impl<'a> Overflow<'a> {
    /// Create an engine with no content region.
    pub fn new(options: OverflowOptions) -> Self {
        let store = Store::new();
        let dispatch = Dispatch::new();
        let viewport = ViewportHandle::new();
        let context = Rc::new(EngineContext {
            state: Rc::clone(store.state()),
            dispatch: dispatch.clone(),
            tolerance: options.tolerance,
            viewport: viewport.clone(),
        });
        Self {
            options,
            store,
            dispatch,
            viewport,
            context,
            content: None,
            tasks: VecDeque::new(),
            on_state_change: None,
        }
    }

    /// Current options.
    pub fn options(&self) -> &OverflowOptions {
        &self.options
    }

    /// The committed state.
    pub fn state(&self) -> &Rc<OverflowState> {
        &self.context.state
    }

    /// The shared context. A new `Rc` is created on every committed change.
    pub fn context(&self) -> &Rc<EngineContext> {
        &self.context
    }

    /// The viewport handle. Its identity never changes.
    pub fn viewport(&self) -> &ViewportHandle {
        &self.viewport
    }

    /// The dispatch handle feeding this engine's update queue.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// The mounted content region, if any.
    pub fn content(&self) -> Option<&ContentRegion> {
        self.content.as_ref().map(|c| &c.region)
    }

    /// The sensors of the mounted content region, if any.
    pub fn sensors(&self) -> Option<&SensorManager> {
        self.content.as_ref().map(|c| &c.sensors)
    }

    /// Number of sensor callbacks waiting for [`run`](Self::run).
    pub fn queued_callbacks(&self) -> usize {
        self.tasks.len()
    }

    /// Install the external change callback.
    ///
    /// It runs once right away with the current state, then once per
    /// committed change.
    pub fn set_on_state_change(
        &mut self,
        callback: impl FnMut(&OverflowState, &ViewportHandle) + 'a,
    ) {
        let mut callback: StateChangeFn<'a> = Box::new(callback);
        callback(&self.context.state, &self.viewport);
        self.on_state_change = Some(callback);
    }

    /// Remove the external change callback.
    pub fn clear_on_state_change(&mut self) {
        self.on_state_change = None;
    }

    /// Change the tolerance.
    ///
    /// Rebuilds the context. Moving between zero and non-zero switches the
    /// watch boundary, which re-attaches the sensors.
    pub fn set_tolerance(&mut self, tolerance: impl Into<Tolerance>) {
        let tolerance = tolerance.into();
        if tolerance == self.options.tolerance {
            return;
        }
        log::debug!("tolerance {} -> {tolerance}", self.options.tolerance);
        self.options.tolerance = tolerance;
        self.rebuild_context();
        if let Some(mounted) = &mut self.content {
            let boundary = WatchBoundary::for_content(mounted.region.content, &tolerance);
            mounted.sensors.attach(boundary);
        }
    }

    /// Show or hide the container. Sensors and state are left alone.
    pub fn set_hidden(&mut self, hidden: bool) {
        self.options.hidden = hidden;
    }

    /// Whether the container is hidden.
    pub fn is_hidden(&self) -> bool {
        self.options.hidden
    }

    /// Mount `region` and attach sensors to it.
    ///
    /// An engine holds one content region; mounting another replaces it.
    pub fn mount_content(&mut self, region: ContentRegion) {
        if self.content.is_some() {
            log::debug!("replacing mounted content region");
            self.unmount_content();
        }
        let mut sensors = SensorManager::new(region.viewport, self.dispatch.clone());
        sensors.attach(WatchBoundary::for_content(
            region.content,
            &self.options.tolerance,
        ));
        self.viewport.set(Some(region.viewport));
        log::debug!(
            "mounted content {:?} in viewport {:?}",
            region.content,
            region.viewport
        );
        self.content = Some(MountedContent { region, sensors });
    }

    /// Unmount the content region, tearing its sensors down.
    ///
    /// Callbacks already queued become no-ops. The state keeps its last
    /// committed value.
    pub fn unmount_content(&mut self) -> Option<ContentRegion> {
        let mut mounted = self.content.take()?;
        mounted.sensors.teardown();
        self.viewport.set(None);
        log::debug!("unmounted content {:?}", mounted.region.content);
        Some(mounted.region)
    }

    /// Let the sensors evaluate `host`'s current geometry.
    ///
    /// Reports are queued as callbacks; nothing changes until [`run`](Self::run).
    pub fn observe<H: Host + ?Sized>(&mut self, host: &H) {
        let Some(mounted) = &mut self.content else {
            return;
        };
        let callbacks = mounted.sensors.sense(host, &self.options.tolerance);
        self.tasks.extend(callbacks);
    }

    /// Deliver queued callbacks and commit the resulting events.
    ///
    /// Returns `true` if the state changed.
    pub fn run(&mut self) -> bool {
        while let Some(callback) = self.tasks.pop_front() {
            callback.run();
        }
        self.commit()
    }

    /// [`observe`](Self::observe) then [`run`](Self::run).
    pub fn update<H: Host + ?Sized>(&mut self, host: &H) -> bool {
        self.observe(host);
        self.run()
    }

    /// Props for the outer container element.
    pub fn container_props(&self) -> ElementProps {
        presentation::container(&self.options.presentation, self.options.hidden)
    }

    /// Props for the viewport element.
    pub fn viewport_props(&self) -> ElementProps {
        presentation::viewport()
    }

    /// Props for the content box, or `None` without a content region.
    pub fn content_props(&self) -> Option<ElementProps> {
        self.content
            .as_ref()
            .map(|c| presentation::content(&c.region.presentation))
    }

    /// Props for the tolerance inset, or `None` when there is no tolerance.
    pub fn tolerance_props(&self) -> Option<ElementProps> {
        presentation::tolerance_inset(&self.options.tolerance)
    }

    fn commit(&mut self) -> bool {
        let before = Rc::clone(self.store.state());
        while let Some(event) = self.dispatch.take() {
            self.store.apply(event);
        }
        if Rc::ptr_eq(&before, self.store.state()) {
            return false;
        }
        self.rebuild_context();
        if let Some(callback) = &mut self.on_state_change {
            callback(&self.context.state, &self.viewport);
        }
        true
    }

    fn rebuild_context(&mut self) {
        self.context = Rc::new(EngineContext {
            state: Rc::clone(self.store.state()),
            dispatch: self.dispatch.clone(),
            tolerance: self.options.tolerance,
            viewport: self.viewport.clone(),
        });
    }
}
