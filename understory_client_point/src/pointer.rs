// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer classification: pointer types and the events that open a floating element.

use kurbo::Point;

/// The kind of pointing device last observed on the reference element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerType {
    /// A mouse.
    Mouse,
    /// A pen or stylus.
    Pen,
    /// A touch contact.
    Touch,
    /// Any other device reported by the platform.
    Other,
}

impl PointerType {
    /// Maps a platform pointer type name (`"mouse"`, `"pen"`, `"touch"`) to a [`PointerType`].
    ///
    /// Unrecognized names map to [`PointerType::Other`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "mouse" => Self::Mouse,
            "pen" => Self::Pen,
            "touch" => Self::Touch,
            _ => Self::Other,
        }
    }
}

/// Returns `true` if `pointer_type` behaves like a mouse for tracking purposes.
///
/// Mice and pens hover, so tracking may continue while the floating element
/// plays its exit transition. When no pointer has been observed yet, the
/// pointer is assumed to be mouse-like.
#[must_use]
pub fn is_mouse_like(pointer_type: Option<PointerType>) -> bool {
    matches!(
        pointer_type,
        None | Some(PointerType::Mouse | PointerType::Pen)
    )
}

/// The event that caused the floating element to open.
///
/// An event is mouse-based iff it carries client coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct OpenEvent {
    /// Client coordinates of the triggering event, if it had any.
    pub client: Option<Point>,
}

impl OpenEvent {
    /// A pointer event (click, mouse enter, ...) at `client`.
    #[must_use]
    pub fn pointer(client: Point) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// An event without client coordinates (focus, keyboard, ...).
    #[must_use]
    pub fn without_coordinates() -> Self {
        Self { client: None }
    }

    /// Returns `true` if the event carries client coordinates.
    #[must_use]
    pub fn is_mouse_based(&self) -> bool {
        self.client.is_some()
    }
}

/// How the current (or most recent) open session began.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum OpenOrigin {
    /// The floating element has not opened yet.
    #[default]
    Unknown,
    /// Opened by a mouse-based event.
    Pointer,
    /// Opened by an event without coordinates, or by no event at all.
    NonPointer,
}

impl OpenOrigin {
    /// Classifies the event that opened the floating element.
    ///
    /// A missing event is treated as not mouse-based.
    #[must_use]
    pub fn of(event: Option<&OpenEvent>) -> Self {
        match event {
            Some(event) if event.is_mouse_based() => Self::Pointer,
            _ => Self::NonPointer,
        }
    }
}
