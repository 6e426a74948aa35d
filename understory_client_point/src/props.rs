// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reference-element handler export.

use kurbo::Point;

use crate::pointer::PointerType;

bitflags::bitflags! {
    /// Handlers to attach to the reference element.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ReferenceHandlers: u8 {
        /// Records the pointer type.
        const POINTER_DOWN  = 0b0000_0001;
        /// Records the pointer type.
        const POINTER_ENTER = 0b0000_0010;
        /// Tracks the pointer while the floating element is closed.
        const MOUSE_MOVE    = 0b0000_0100;
        /// Tracks the pointer while the floating element is closed.
        const MOUSE_ENTER   = 0b0000_1000;
    }
}

/// An event delivered to the reference element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReferenceEvent {
    /// A pointer was pressed on the reference element.
    PointerDown(PointerType),
    /// A pointer entered the reference element.
    PointerEnter(PointerType),
    /// The mouse moved over the reference element, at client coordinates.
    MouseMove(Point),
    /// The mouse entered the reference element, at client coordinates.
    MouseEnter(Point),
}

impl ReferenceEvent {
    /// The handler responsible for this event.
    #[must_use]
    pub fn handler(&self) -> ReferenceHandlers {
        match self {
            Self::PointerDown(_) => ReferenceHandlers::POINTER_DOWN,
            Self::PointerEnter(_) => ReferenceHandlers::POINTER_ENTER,
            Self::MouseMove(_) => ReferenceHandlers::MOUSE_MOVE,
            Self::MouseEnter(_) => ReferenceHandlers::MOUSE_ENTER,
        }
    }
}

/// The exported handler set for the reference element.
///
/// `revision` identifies the memoized value: it only changes when the set is
/// recomputed, so hosts can skip re-attaching handlers when it is unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReferenceProps {
    /// Handlers to attach. Empty when tracking is disabled.
    pub handlers: ReferenceHandlers,
    /// Identity of this value.
    pub revision: u64,
}

impl ReferenceProps {
    /// Returns `true` if no handlers are exported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Key the exported props are memoized on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PropsKey {
    pub(crate) enabled: bool,
    pub(crate) open: bool,
    /// Identity of the tracking callback.
    pub(crate) callback: u64,
}

/// Single-entry memoization cache for [`ReferenceProps`].
#[derive(Clone, Debug, Default)]
pub(crate) struct PropsCache {
    cached: Option<(PropsKey, ReferenceProps)>,
    revision: u64,
}

impl PropsCache {
    /// Returns the cached props for `key`, recomputing them if the key changed.
    pub(crate) fn get(&mut self, key: PropsKey) -> ReferenceProps {
        if let Some((cached_key, props)) = self.cached
            && cached_key == key
        {
            return props;
        }
        self.revision += 1;
        let props = ReferenceProps {
            handlers: compute(key),
            revision: self.revision,
        };
        self.cached = Some((key, props));
        props
    }
}

fn compute(key: PropsKey) -> ReferenceHandlers {
    if key.enabled {
        ReferenceHandlers::all()
    } else {
        ReferenceHandlers::empty()
    }
}
