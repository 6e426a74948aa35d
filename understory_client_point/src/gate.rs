// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lifecycle latches that freeze pointer tracking.
//!
//! Each latch has its own update rule, and each rule only runs when one of its
//! inputs changed since the previous evaluation:
//!
//! | rule | inputs | effect |
//! |------|--------|--------|
//! | release | `enabled`, floating presence | clear `frozen_by_non_follow` when disabled or the floating element is gone |
//! | freeze | `enabled`, `open` | set `frozen_by_non_follow` when opening with `follow` off |
//! | origin | `enabled`, `open` | `non_mouse_open = open && origin == NonPointer` |
//! | explicit | `enabled`, `x`, `y` | reset the explicit latch; with both coordinates present, clear `frozen_by_non_follow` and install an anchor at them |
//!
//! The rules are evaluated in the order listed.

use kurbo::Point;

use crate::pointer::OpenOrigin;

/// The three independent latches gating pointer tracking.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Latches {
    /// Set when the floating element opened with `follow` off; cleared once it is gone.
    pub frozen_by_non_follow: bool,
    /// The explicit coordinates currently installed, if any.
    pub explicit: Option<Point>,
    /// Set while open when the opening event was not mouse-based.
    pub non_mouse_open: bool,
}

/// Inputs the latch rules depend on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct GateInputs {
    pub(crate) enabled: bool,
    pub(crate) follow: bool,
    pub(crate) open: bool,
    pub(crate) floating_present: bool,
    pub(crate) origin: OpenOrigin,
    pub(crate) x: Option<f64>,
    pub(crate) y: Option<f64>,
}

impl GateInputs {
    fn explicit_point(&self) -> Option<Point> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            _ => None,
        }
    }
}

/// Result of advancing the latches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct GateStep {
    pub(crate) latches: Latches,
    /// Explicit coordinates to install directly, bypassing every tracking guard.
    pub(crate) install: Option<Point>,
}

impl Latches {
    /// Runs every rule whose inputs changed between `prev` and `next`.
    ///
    /// With no previous inputs, every rule runs.
    #[must_use]
    pub(crate) fn advance(self, prev: Option<&GateInputs>, next: &GateInputs) -> GateStep {
        let changed = |f: fn(&GateInputs) -> (bool, bool)| prev.is_none_or(|p| f(p) != f(next));
        let mut latches = self;
        let mut install = None;

        if changed(|i| (i.enabled, i.floating_present)) && (!next.enabled || !next.floating_present)
        {
            latches.frozen_by_non_follow = false;
        }

        let open_changed = changed(|i| (i.enabled, i.open));
        if open_changed && next.enabled && next.open && !next.follow {
            latches.frozen_by_non_follow = true;
        }
        if open_changed {
            latches.non_mouse_open = next.open && next.origin == OpenOrigin::NonPointer;
        }

        let explicit_changed = prev.is_none_or(|p| {
            p.enabled != next.enabled || p.x != next.x || p.y != next.y
        });
        if explicit_changed {
            latches.explicit = next.explicit_point().filter(|_| next.enabled);
            if latches.explicit.is_some() {
                latches.frozen_by_non_follow = false;
                install = latches.explicit;
            }
        }

        GateStep { latches, install }
    }
}
