// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_client_point --heading-base-level=0

//! Understory Client Point: pointer-following virtual anchors for floating UI.
//!
//! Tooltips and context menus are usually positioned against a reference
//! element. Sometimes they should instead follow the pointer. This crate
//! provides [`ClientPoint`], a small headless controller that decides when to
//! synthesize a [`VirtualAnchor`] from pointer positions and hands it to a
//! positioning engine in place of the real reference element.
//!
//! The controller is made of four parts:
//!
//! - **Anchor synthesis** ([`VirtualAnchor::synthesize`]): a rectangle built from a
//!   point and an [`Axis`]. For a single axis, the other dimension is pinned to
//!   the reference element's bounds.
//! - **Tracking**: [`ClientPoint::set_reference`] installs a new anchor unless
//!   a latch suppresses it. While the floating element is shown, a
//!   window-level move listener drives tracking until the pointer enters the
//!   floating element.
//! - **Latches** ([`Latches`]): freeze tracking when `follow` is off, when the
//!   floating element opened without a mouse-based event, or while explicit
//!   coordinates are supplied.
//! - **Reference handlers** ([`ClientPoint::reference_props`]): pointer and
//!   mouse handlers for the reference element, which establish the first
//!   anchor before the floating element opens.
//!
//! ## Integration
//!
//! The controller does not own any element tree or event loop. Callers:
//!
//! - Implement [`ClientPointHost`] to answer live geometry and containment
//!   queries.
//! - Report open/close transitions with [`ClientPoint::set_open`] and
//!   floating element presence with [`ClientPoint::set_floating`].
//! - Apply the returned [`ListenerChanges`] to their window-level pointer-move
//!   registration and forward those moves to [`ClientPoint::handle_window_move`].
//! - Read [`ClientPoint::position_reference`] (and
//!   [`ClientPoint::position_revision`] to detect changes) when positioning.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_client_point::{
//!     ClientPoint, ClientPointHost, ClientPointOptions, ListenerChange, OpenEvent,
//!     ReferenceEvent,
//! };
//!
//! struct Host;
//!
//! impl ClientPointHost for Host {
//!     // Event targets are element ids; the floating element is id 2.
//!     type Target = u32;
//!
//!     fn reference_bounds(&self) -> Option<Rect> {
//!         Some(Rect::new(0.0, 0.0, 100.0, 20.0))
//!     }
//!
//!     fn floating_contains(&self, target: &u32) -> bool {
//!         *target == 2
//!     }
//! }
//!
//! let mut cp = ClientPoint::new(ClientPointOptions::default());
//! cp.mount(&Host);
//!
//! // Hovering the closed reference establishes the first anchor.
//! cp.handle_reference_event(ReferenceEvent::MouseMove(Point::new(50.0, 10.0)), &Host);
//! assert_eq!(cp.anchor().unwrap().x(), 50.0);
//!
//! // The floating element mounts in window 1 and opens from a mouse event.
//! cp.set_floating(Some(1_u8), &Host);
//! let changes = cp.set_open(true, Some(OpenEvent::pointer(Point::new(50.0, 10.0))), &Host);
//! assert_eq!(changes.as_slice(), &[ListenerChange::Add(1)]);
//!
//! // Window moves outside the floating element keep the anchor under the pointer.
//! cp.handle_window_move(Point::new(60.0, 12.0), &0, &Host);
//! assert_eq!(cp.anchor().unwrap().x(), 60.0);
//!
//! // Entering the floating element stops tracking.
//! let changes = cp.handle_window_move(Point::new(70.0, 40.0), &2, &Host);
//! assert_eq!(changes.as_slice(), &[ListenerChange::Remove(1)]);
//! ```
//!
//! ## Pointer types
//!
//! Mouse-like pointers (mouse, pen, or none observed yet) keep tracking while
//! the floating element still exists, so it follows the cursor through an exit
//! transition. Touch pointers stop tracking as soon as the floating element
//! closes, since the dismissing touch would otherwise yank it away.
//!
//! ## Features
//!
//! - `std` (default): forwards to `kurbo/std`.
//! - `libm`: forwards to `kurbo/libm` for `no_std` builds.
//!
//! This crate is `no_std`.

#![no_std]

mod anchor;
mod controller;
mod gate;
mod listener;
mod pointer;
mod props;

pub use anchor::{Axis, ParseAxisError, PositionReference, VirtualAnchor};
pub use controller::{
    ClientPoint, ClientPointDebugInfo, ClientPointHost, ClientPointOptions, SuppressReason,
};
pub use gate::Latches;
pub use listener::{ListenerChange, ListenerChanges};
pub use pointer::{OpenEvent, OpenOrigin, PointerType, is_mouse_like};
pub use props::{ReferenceEvent, ReferenceHandlers, ReferenceProps};
