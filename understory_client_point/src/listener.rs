// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window-level move listener reconciliation.
//!
//! The controller never registers listeners itself. Whenever the inputs that
//! decide whether a listener should exist change, [`MoveListener::reconcile`]
//! removes the previously installed listener and, if tracking should be armed,
//! asks for a new one. The host applies the resulting [`ListenerChange`]s in
//! order, so at most one listener is registered at any time.

use smallvec::SmallVec;

use crate::pointer::OpenOrigin;

/// A change the host must apply to its window-level pointer-move registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListenerChange<W> {
    /// Register the move listener on window `W`.
    Add(W),
    /// Unregister the move listener from window `W`.
    Remove(W),
}

/// Listener changes produced by one state transition, in application order.
///
/// A transition produces at most a removal followed by an addition.
pub type ListenerChanges<W> = SmallVec<[ListenerChange<W>; 2]>;

/// Inputs the listener lifecycle depends on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ListenerInputs<W> {
    pub(crate) enabled: bool,
    /// See [`tracking_gate`].
    pub(crate) gate: bool,
    pub(crate) has_explicit: bool,
    pub(crate) origin: OpenOrigin,
    /// Bumped on every open transition so that each session re-arms.
    pub(crate) session: u64,
    /// The floating element's owning window; `None` while it is absent.
    pub(crate) window: Option<W>,
}

/// Whether tracking may be armed at all.
///
/// Mouse-like pointers keep tracking while the floating element still exists,
/// so it follows the cursor through its exit transition. Other pointers only
/// track while it is open.
pub(crate) fn tracking_gate(mouse_like: bool, open: bool, floating_present: bool) -> bool {
    if mouse_like { floating_present } else { open }
}

/// What a lifecycle evaluation decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Armed {
    /// Nothing to track.
    Idle,
    /// A move listener was installed.
    Tracking,
    /// The opening event was not mouse-based; position against the real reference.
    ReferenceSource,
}

/// Owner of the (at most one) installed move listener.
#[derive(Clone, Debug)]
pub(crate) struct MoveListener<W> {
    active: Option<W>,
    inputs: Option<ListenerInputs<W>>,
}

impl<W> Default for MoveListener<W> {
    fn default() -> Self {
        Self {
            active: None,
            inputs: None,
        }
    }
}

impl<W: Copy + PartialEq> MoveListener<W> {
    /// The window the listener is currently installed on, if any.
    pub(crate) fn active(&self) -> Option<W> {
        self.active
    }

    /// Re-runs the lifecycle if `next` differs from the last evaluated inputs.
    ///
    /// Returns `None` when nothing changed.
    pub(crate) fn reconcile(
        &mut self,
        next: ListenerInputs<W>,
        changes: &mut ListenerChanges<W>,
    ) -> Option<Armed> {
        if self.inputs.as_ref() == Some(&next) {
            return None;
        }
        self.inputs = Some(next);
        self.detach(changes);

        if !next.gate || !next.enabled || next.has_explicit {
            return Some(Armed::Idle);
        }
        match (next.origin, next.window) {
            (OpenOrigin::Pointer, Some(window)) => {
                self.active = Some(window);
                changes.push(ListenerChange::Add(window));
                Some(Armed::Tracking)
            }
            (OpenOrigin::NonPointer, _) => Some(Armed::ReferenceSource),
            _ => Some(Armed::Idle),
        }
    }

    /// Removes the installed listener, if any, without re-running the lifecycle.
    pub(crate) fn detach(&mut self, changes: &mut ListenerChanges<W>) {
        if let Some(window) = self.active.take() {
            changes.push(ListenerChange::Remove(window));
        }
    }

    /// Removes the installed listener and forgets the last evaluated inputs.
    pub(crate) fn teardown(&mut self, changes: &mut ListenerChanges<W>) {
        self.detach(changes);
        self.inputs = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: u32 = 7;

    fn open_by_mouse() -> ListenerInputs<u32> {
        ListenerInputs {
            enabled: true,
            gate: true,
            has_explicit: false,
            origin: OpenOrigin::Pointer,
            session: 1,
            window: Some(WINDOW),
        }
    }

    #[test]
    fn mouse_open_installs_one_listener() {
        let mut listener = MoveListener::default();
        let mut changes = ListenerChanges::new();

        let armed = listener.reconcile(open_by_mouse(), &mut changes);

        assert_eq!(armed, Some(Armed::Tracking));
        assert_eq!(changes.as_slice(), &[ListenerChange::Add(WINDOW)]);
        assert_eq!(listener.active(), Some(WINDOW));
    }

    #[test]
    fn unchanged_inputs_do_not_rerun() {
        let mut listener = MoveListener::default();
        let mut changes = ListenerChanges::new();
        listener.reconcile(open_by_mouse(), &mut changes);
        changes.clear();

        assert_eq!(listener.reconcile(open_by_mouse(), &mut changes), None);
        assert!(changes.is_empty());
    }

    #[test]
    fn rearming_removes_previous_listener_first() {
        let mut listener = MoveListener::default();
        let mut changes = ListenerChanges::new();
        listener.reconcile(open_by_mouse(), &mut changes);
        changes.clear();

        let next = ListenerInputs {
            window: Some(9),
            ..open_by_mouse()
        };
        listener.reconcile(next, &mut changes);

        assert_eq!(
            changes.as_slice(),
            &[ListenerChange::Remove(WINDOW), ListenerChange::Add(9)]
        );
        assert_eq!(listener.active(), Some(9));
    }

    #[test]
    fn gate_depends_on_pointer_kind() {
        // Mouse-like: closed but still mounted keeps the gate open.
        assert!(tracking_gate(true, false, true));
        assert!(!tracking_gate(true, true, false));
        // Touch: only while open.
        assert!(!tracking_gate(false, false, true));
        assert!(tracking_gate(false, true, true));
    }

    #[test]
    fn closing_the_gate_removes_the_listener() {
        let mut listener = MoveListener::default();
        let mut changes = ListenerChanges::new();
        listener.reconcile(open_by_mouse(), &mut changes);
        changes.clear();

        let closed = ListenerInputs {
            gate: false,
            ..open_by_mouse()
        };
        assert_eq!(listener.reconcile(closed, &mut changes), Some(Armed::Idle));
        assert_eq!(changes.as_slice(), &[ListenerChange::Remove(WINDOW)]);
        assert_eq!(listener.active(), None);
    }

    #[test]
    fn detach_is_not_undone_by_unchanged_inputs() {
        let mut listener = MoveListener::default();
        let mut changes = ListenerChanges::new();
        listener.reconcile(open_by_mouse(), &mut changes);
        changes.clear();

        listener.detach(&mut changes);
        assert_eq!(changes.as_slice(), &[ListenerChange::Remove(WINDOW)]);

        changes.clear();
        assert_eq!(listener.reconcile(open_by_mouse(), &mut changes), None);
        assert_eq!(listener.active(), None);
        assert!(changes.is_empty());
    }

    #[test]
    fn non_mouse_origin_uses_reference_without_listener() {
        let mut listener = MoveListener::default();
        let mut changes = ListenerChanges::new();
        let keyboard_open = ListenerInputs {
            origin: OpenOrigin::NonPointer,
            ..open_by_mouse()
        };

        assert_eq!(
            listener.reconcile(keyboard_open, &mut changes),
            Some(Armed::ReferenceSource)
        );
        assert!(changes.is_empty());
    }

    #[test]
    fn disabled_or_explicit_installs_nothing() {
        let mut changes = ListenerChanges::new();
        let disabled = ListenerInputs {
            enabled: false,
            ..open_by_mouse()
        };
        let explicit = ListenerInputs {
            has_explicit: true,
            ..open_by_mouse()
        };

        assert_eq!(
            MoveListener::default().reconcile(disabled, &mut changes),
            Some(Armed::Idle)
        );
        assert_eq!(
            MoveListener::default().reconcile(explicit, &mut changes),
            Some(Armed::Idle)
        );
        assert!(changes.is_empty());
    }

    #[test]
    fn teardown_removes_and_forgets() {
        let mut listener = MoveListener::default();
        let mut changes = ListenerChanges::new();
        listener.reconcile(open_by_mouse(), &mut changes);
        changes.clear();

        listener.teardown(&mut changes);
        assert_eq!(changes.as_slice(), &[ListenerChange::Remove(WINDOW)]);

        // Same inputs arm again after teardown.
        changes.clear();
        assert_eq!(
            listener.reconcile(open_by_mouse(), &mut changes),
            Some(Armed::Tracking)
        );
    }
}
