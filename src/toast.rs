//! Per-toast record: the element handles, the phase field the engine's
//! transition function switches on, and the timers the toast owns.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::animation::Animation;
use crate::config::EffectiveOptions;
use crate::dom::NodeId;
use crate::progress::ProgressEstimator;
use crate::scheduler::TimerId;
use crate::types::Severity;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum Phase {
    /// The show effect is running.
    Showing,
    /// On screen and idle, possibly waiting on a hide timer.
    Visible,
    /// The hide effect is running. Forced hides came from the close control.
    Hiding { forced: bool },
    /// Gone from the document. Also reported for unknown handles.
    Removed,
}

/// What a scheduler entry asks of its toast.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Wake {
    HideTimeout,
    ProgressTick,
    AnimationDone,
}

#[derive(Debug)]
pub(crate) struct Toast {
    pub(crate) element: NodeId,
    pub(crate) container: NodeId,
    pub(crate) close_button: Option<NodeId>,
    pub(crate) progress_bar: Option<NodeId>,
    pub(crate) severity: Severity,
    pub(crate) options: Arc<EffectiveOptions>,
    pub(crate) phase: Phase,
    pub(crate) hide_timer: Option<TimerId>,
    pub(crate) animation: Option<(TimerId, Animation)>,
    pub(crate) progress: ProgressEstimator,
    /// `on_shown` is still owed for the first show effect.
    pub(crate) announce_shown: bool,
}

impl Toast {
    pub(crate) fn new(
        element: NodeId,
        container: NodeId,
        severity: Severity,
        options: Arc<EffectiveOptions>,
    ) -> Self {
        Self {
            element,
            container,
            close_button: None,
            progress_bar: None,
            severity,
            options,
            phase: Phase::Showing,
            hide_timer: None,
            animation: None,
            progress: ProgressEstimator::default(),
            announce_shown: true,
        }
    }

    pub(crate) fn show_animation(&self, now: Duration) -> Animation {
        Animation {
            method: self.options.show_method,
            easing: self.options.show_easing,
            duration: self.options.show_duration,
            started_at: now,
        }
    }

    /// Close-specific settings only apply to forced hides, each one falling
    /// back to its `hide_*` counterpart on its own.
    pub(crate) fn hide_animation(&self, forced: bool, now: Duration) -> Animation {
        let options = &self.options;
        Animation {
            method: pick(forced, options.close_method, options.hide_method),
            easing: pick(forced, options.close_easing, options.hide_easing),
            duration: pick(forced, options.close_duration, options.hide_duration),
            started_at: now,
        }
    }

    /// Whether `timer` is the effect currently running on this toast.
    pub(crate) fn is_current_animation(&self, timer: TimerId) -> bool {
        self.animation.is_some_and(|(current, _)| current == timer)
    }

    /// Every scheduler entry this toast still owns.
    pub(crate) fn take_timers(&mut self) -> Vec<TimerId> {
        let mut timers = Vec::with_capacity(3);
        timers.extend(self.hide_timer.take());
        timers.extend(self.progress.take_ticker());
        timers.extend(self.animation.take().map(|(timer, _)| timer));
        timers
    }
}

fn pick<T>(forced: bool, close: Option<T>, hide: T) -> T {
    match close {
        Some(close) if forced => close,
        _ => hide,
    }
}
