// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect};

use crate::anchor::{Axis, PositionReference, VirtualAnchor};
use crate::gate::{GateInputs, Latches};
use crate::listener::{Armed, ListenerChanges, ListenerInputs, MoveListener, tracking_gate};
use crate::pointer::{OpenEvent, OpenOrigin, PointerType, is_mouse_like};
use crate::props::{PropsCache, PropsKey, ReferenceEvent, ReferenceProps};

/// Live queries the controller makes against the host's element tree.
pub trait ClientPointHost {
    /// Event target type delivered with window-level move events.
    type Target: ?Sized;

    /// Current bounds of the real reference element, or `None` if it is unavailable.
    fn reference_bounds(&self) -> Option<Rect>;

    /// Returns `true` if `target` lies within the floating element.
    fn floating_contains(&self, target: &Self::Target) -> bool;
}

/// Configuration for a [`ClientPoint`] controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClientPointOptions {
    /// Master switch. Defaults to `true`.
    pub enabled: bool,
    /// Which dimension(s) follow the pointer. Defaults to [`Axis::Both`].
    pub axis: Axis,
    /// When `false`, the anchor freezes once the floating element opens. Defaults to `true`.
    pub follow: bool,
    /// Explicit horizontal coordinate.
    pub x: Option<f64>,
    /// Explicit vertical coordinate.
    pub y: Option<f64>,
}

impl Default for ClientPointOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            axis: Axis::Both,
            follow: true,
            x: None,
            y: None,
        }
    }
}

impl ClientPointOptions {
    /// Sets [`ClientPointOptions::enabled`].
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets [`ClientPointOptions::axis`].
    #[must_use]
    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    /// Sets [`ClientPointOptions::follow`].
    #[must_use]
    pub fn with_follow(mut self, follow: bool) -> Self {
        self.follow = follow;
        self
    }

    /// Sets the explicit coordinates. Tracking is bypassed when both are present.
    #[must_use]
    pub fn with_coordinates(mut self, x: Option<f64>, y: Option<f64>) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    fn has_explicit(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }
}

/// Why the most recent [`ClientPoint::set_reference`] attempt did nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SuppressReason {
    /// The controller is disabled.
    Disabled,
    /// Explicit coordinates are installed.
    ExplicitCoordinates,
    /// The floating element opened with `follow` off.
    FrozenByNonFollow,
    /// The current open session did not start from a mouse-based event.
    NonMouseOpen,
    /// The recorded opening event carries no client coordinates.
    NonMouseOpenEvent,
}

/// Tracks the pointer and synthesizes a virtual anchor for a floating element.
///
/// See the [crate documentation](crate) for the overall flow.
#[derive(Clone, Debug)]
pub struct ClientPoint<W> {
    options: ClientPointOptions,
    open: bool,
    open_event: Option<OpenEvent>,
    origin: OpenOrigin,
    session: u64,
    window: Option<W>,
    pointer_type: Option<PointerType>,
    latches: Latches,
    gate_inputs: Option<GateInputs>,
    listener: MoveListener<W>,
    props: PropsCache,
    callback: u64,
    position: Option<PositionReference>,
    position_revision: u64,
    last_suppressed: Option<SuppressReason>,
}

impl<W: Copy + PartialEq> ClientPoint<W> {
    /// Creates a closed controller with no floating element.
    ///
    /// Nothing is evaluated until [`ClientPoint::mount`] or another state
    /// transition runs.
    #[must_use]
    pub fn new(options: ClientPointOptions) -> Self {
        Self {
            options,
            open: false,
            open_event: None,
            origin: OpenOrigin::Unknown,
            session: 0,
            window: None,
            pointer_type: None,
            latches: Latches::default(),
            gate_inputs: None,
            listener: MoveListener::default(),
            props: PropsCache::default(),
            callback: 0,
            position: None,
            position_revision: 0,
            last_suppressed: None,
        }
    }

    /// Runs the initial evaluation (for example, installing explicit coordinates).
    pub fn mount<H: ClientPointHost>(&mut self, host: &H) -> ListenerChanges<W> {
        self.sync(host)
    }

    /// Returns the current options.
    #[must_use]
    pub fn options(&self) -> &ClientPointOptions {
        &self.options
    }

    /// Replaces the options and re-evaluates every rule depending on them.
    pub fn set_options<H: ClientPointHost>(
        &mut self,
        options: ClientPointOptions,
        host: &H,
    ) -> ListenerChanges<W> {
        if options.axis != self.options.axis {
            self.callback += 1;
        }
        self.options = options;
        self.sync(host)
    }

    /// Reports an open/close transition from the open state owner.
    ///
    /// `event` is the event that caused the floating element to open; it is
    /// ignored when closing.
    pub fn set_open<H: ClientPointHost>(
        &mut self,
        open: bool,
        event: Option<OpenEvent>,
        host: &H,
    ) -> ListenerChanges<W> {
        if open && !self.open {
            self.session += 1;
            self.origin = OpenOrigin::of(event.as_ref());
            self.open_event = event;
        } else if !open {
            self.open_event = None;
        }
        self.open = open;
        self.sync(host)
    }

    /// Reports the floating element being mounted in `window`, or unmounted (`None`).
    pub fn set_floating<H: ClientPointHost>(
        &mut self,
        window: Option<W>,
        host: &H,
    ) -> ListenerChanges<W> {
        self.window = window;
        self.sync(host)
    }

    /// Attempts to install a virtual anchor at `point`.
    ///
    /// Does nothing if tracking is currently suppressed; see
    /// [`ClientPointDebugInfo::last_suppressed`] for the reason.
    pub fn set_reference<H: ClientPointHost>(&mut self, point: Point, host: &H) {
        self.last_suppressed = self.suppress_reason();
        if self.last_suppressed.is_none() {
            self.install_anchor(point, host);
        }
    }

    /// Body of the window-level pointer-move listener.
    ///
    /// Moves outside the floating element update the anchor. The first move
    /// inside it removes the listener; tracking stays off until the lifecycle
    /// re-arms.
    pub fn handle_window_move<H: ClientPointHost>(
        &mut self,
        client: Point,
        target: &H::Target,
        host: &H,
    ) -> ListenerChanges<W> {
        let mut changes = ListenerChanges::new();
        if self.listener.active().is_none() {
            return changes;
        }
        if host.floating_contains(target) {
            self.listener.detach(&mut changes);
        } else {
            self.set_reference(client, host);
        }
        changes
    }

    /// Handlers to attach to the reference element.
    ///
    /// The value is cached and only recomputed when `enabled`, `open`, or the
    /// axis changes.
    pub fn reference_props(&mut self) -> ReferenceProps {
        self.props.get(PropsKey {
            enabled: self.options.enabled,
            open: self.open,
            callback: self.callback,
        })
    }

    /// Delivers an event to the exported reference handlers.
    ///
    /// Events whose handler is not currently exported are ignored.
    pub fn handle_reference_event<H: ClientPointHost>(
        &mut self,
        event: ReferenceEvent,
        host: &H,
    ) -> ListenerChanges<W> {
        if !self.reference_props().handlers.contains(event.handler()) {
            return ListenerChanges::new();
        }
        match event {
            ReferenceEvent::PointerDown(pointer_type)
            | ReferenceEvent::PointerEnter(pointer_type) => {
                self.pointer_type = Some(pointer_type);
                self.sync(host)
            }
            ReferenceEvent::MouseMove(client) | ReferenceEvent::MouseEnter(client) => {
                if !self.open && !self.options.has_explicit() {
                    self.set_reference(client, host);
                }
                ListenerChanges::new()
            }
        }
    }

    /// Removes the active move listener, if any. Call when the controller goes away.
    pub fn teardown(&mut self) -> ListenerChanges<W> {
        let mut changes = ListenerChanges::new();
        self.listener.teardown(&mut changes);
        changes
    }

    /// What the positioning engine should currently position against.
    #[must_use]
    pub fn position_reference(&self) -> Option<&PositionReference> {
        self.position.as_ref()
    }

    /// The current virtual anchor, if the position reference is one.
    #[must_use]
    pub fn anchor(&self) -> Option<&VirtualAnchor> {
        self.position.as_ref().and_then(PositionReference::as_virtual)
    }

    /// Incremented every time the position reference is replaced.
    #[must_use]
    pub fn position_revision(&self) -> u64 {
        self.position_revision
    }

    /// The window the move listener is installed on, if any.
    #[must_use]
    pub fn active_listener(&self) -> Option<W> {
        self.listener.active()
    }

    /// Snapshot of the controller state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> ClientPointDebugInfo<W> {
        ClientPointDebugInfo {
            open: self.open,
            origin: self.origin,
            pointer_type: self.pointer_type,
            latches: self.latches,
            active_listener: self.listener.active(),
            position_revision: self.position_revision,
            last_suppressed: self.last_suppressed,
        }
    }

    fn suppress_reason(&self) -> Option<SuppressReason> {
        if !self.options.enabled {
            Some(SuppressReason::Disabled)
        } else if self.latches.explicit.is_some() {
            Some(SuppressReason::ExplicitCoordinates)
        } else if self.latches.frozen_by_non_follow {
            Some(SuppressReason::FrozenByNonFollow)
        } else if self.latches.non_mouse_open {
            Some(SuppressReason::NonMouseOpen)
        } else if self.open_event.is_some_and(|e| !e.is_mouse_based()) {
            Some(SuppressReason::NonMouseOpenEvent)
        } else {
            None
        }
    }

    fn install_anchor<H: ClientPointHost>(&mut self, point: Point, host: &H) {
        let anchor = VirtualAnchor::synthesize(point, self.options.axis, host.reference_bounds());
        self.replace_position(PositionReference::Virtual(anchor));
    }

    fn replace_position(&mut self, position: PositionReference) {
        self.position = Some(position);
        self.position_revision += 1;
    }

    /// Re-evaluates the latches, then the listener lifecycle.
    fn sync<H: ClientPointHost>(&mut self, host: &H) -> ListenerChanges<W> {
        let options = self.options;
        let gate_inputs = GateInputs {
            enabled: options.enabled,
            follow: options.follow,
            open: self.open,
            floating_present: self.window.is_some(),
            origin: self.origin,
            x: options.x,
            y: options.y,
        };
        let step = self.latches.advance(self.gate_inputs.as_ref(), &gate_inputs);
        self.gate_inputs = Some(gate_inputs);
        self.latches = step.latches;
        if let Some(point) = step.install {
            self.install_anchor(point, host);
        }

        let mut changes = ListenerChanges::new();
        let inputs = ListenerInputs {
            enabled: options.enabled,
            gate: tracking_gate(
                is_mouse_like(self.pointer_type),
                self.open,
                self.window.is_some(),
            ),
            has_explicit: options.has_explicit(),
            origin: self.origin,
            session: self.session,
            window: self.window,
        };
        if self.listener.reconcile(inputs, &mut changes) == Some(Armed::ReferenceSource) {
            self.replace_position(PositionReference::Reference);
        }
        changes
    }
}

/// Debug snapshot of a [`ClientPoint`] state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClientPointDebugInfo<W> {
    /// Whether the floating element is open.
    pub open: bool,
    /// How the current or most recent open session began.
    pub origin: OpenOrigin,
    /// Last pointer type observed on the reference element.
    pub pointer_type: Option<PointerType>,
    /// Current latch state.
    pub latches: Latches,
    /// Window the move listener is installed on, if any.
    pub active_listener: Option<W>,
    /// See [`ClientPoint::position_revision`].
    pub position_revision: u64,
    /// Why the last [`ClientPoint::set_reference`] attempt was suppressed, if it was.
    pub last_suppressed: Option<SuppressReason>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::ListenerChange;

    struct Host {
        reference: Option<Rect>,
    }

    impl ClientPointHost for Host {
        type Target = bool;

        fn reference_bounds(&self) -> Option<Rect> {
            self.reference
        }

        fn floating_contains(&self, inside: &bool) -> bool {
            *inside
        }
    }

    const HOST: Host = Host {
        reference: Some(Rect::new(0.0, 100.0, 40.0, 120.0)),
    };

    #[test]
    fn closed_reference_move_installs_anchor() {
        let mut cp = ClientPoint::<u8>::new(ClientPointOptions::default());
        cp.mount(&HOST);

        cp.handle_reference_event(ReferenceEvent::MouseMove(Point::new(50.0, 50.0)), &HOST);

        let anchor = cp.anchor().unwrap();
        assert_eq!(anchor.rect(), Rect::new(50.0, 50.0, 50.0, 50.0));
        assert_eq!(cp.position_revision(), 1);
    }

    #[test]
    fn reference_move_ignored_while_open() {
        let mut cp = ClientPoint::<u8>::new(ClientPointOptions::default());
        cp.set_open(true, Some(OpenEvent::pointer(Point::new(1.0, 1.0))), &HOST);

        cp.handle_reference_event(ReferenceEvent::MouseMove(Point::new(5.0, 5.0)), &HOST);

        assert_eq!(cp.anchor(), None);
    }

    #[test]
    fn axis_change_recomputes_props() {
        let mut cp = ClientPoint::<u8>::new(ClientPointOptions::default());
        let before = cp.reference_props();
        assert_eq!(cp.reference_props(), before);

        cp.set_options(ClientPointOptions::default().with_axis(Axis::X), &HOST);
        assert_ne!(cp.reference_props().revision, before.revision);
    }

    #[test]
    fn disabled_ignores_reference_events() {
        let mut cp =
            ClientPoint::<u8>::new(ClientPointOptions::default().with_enabled(false));
        cp.mount(&HOST);

        assert!(cp.reference_props().is_empty());
        cp.handle_reference_event(ReferenceEvent::MouseEnter(Point::new(5.0, 5.0)), &HOST);
        assert_eq!(cp.anchor(), None);

        cp.set_reference(Point::new(5.0, 5.0), &HOST);
        assert_eq!(cp.debug_info().last_suppressed, Some(SuppressReason::Disabled));
    }

    #[test]
    fn axis_x_uses_reference_vertical_extent() {
        let mut cp =
            ClientPoint::<u8>::new(ClientPointOptions::default().with_axis(Axis::X));
        cp.mount(&HOST);

        cp.set_reference(Point::new(30.0, 999.0), &HOST);

        assert_eq!(cp.anchor().unwrap().rect(), Rect::new(30.0, 100.0, 30.0, 120.0));
    }

    #[test]
    fn touch_pointer_changes_gate_while_closed() {
        let mut cp = ClientPoint::new(ClientPointOptions::default());
        cp.set_floating(Some(1_u8), &HOST);
        cp.set_open(true, Some(OpenEvent::pointer(Point::ZERO)), &HOST);
        assert_eq!(cp.active_listener(), Some(1));

        // A touch observed while still open keeps the gate (open) true.
        let changes =
            cp.handle_reference_event(ReferenceEvent::PointerDown(PointerType::Touch), &HOST);
        assert!(changes.is_empty());

        let changes = cp.set_open(false, None, &HOST);
        assert_eq!(changes.as_slice(), &[ListenerChange::Remove(1)]);
        assert_eq!(cp.debug_info().pointer_type, Some(PointerType::Touch));
    }

    #[test]
    fn teardown_removes_listener() {
        let mut cp = ClientPoint::new(ClientPointOptions::default());
        cp.set_floating(Some(4_u8), &HOST);
        cp.set_open(true, Some(OpenEvent::pointer(Point::ZERO)), &HOST);

        assert_eq!(cp.teardown().as_slice(), &[ListenerChange::Remove(4)]);
        assert_eq!(cp.active_listener(), None);
        assert!(cp.teardown().is_empty());
    }
}
