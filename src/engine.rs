//! The toast lifecycle engine.
//!
//! [`Toaster`] owns everything a running notification surface needs: the
//! process defaults, the document, the container registry, the duplicate
//! guard and a virtual-clock scheduler. Hosts feed it pointer and focus events
//! by element and move time forward with [`Toaster::advance`]; every change a
//! toast goes through happens inside one of those calls.
//!
//! Nothing here fails. Events aimed at removed toasts, stale timers and
//! unknown elements are ignored.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::animation::Animation;
use crate::config::{self, Config, EffectiveOptions, EngineSettings, Options, OptionsOverride};
use crate::dedup::DedupGuard;
use crate::dom::{Document, Node, NodeId, escape_html};
use crate::registry::ContainerRegistry;
use crate::scheduler::{Scheduler, TimerId};
use crate::toast::{Phase, Toast, Wake};
use crate::types::Severity;

const CLOSE_BUTTON_CLASS: &str = "toast-close-button";
const PROGRESS_CLASS: &str = "toast-progress";

/// Log a lifecycle step at `info` when the toast was created with `debug`.
macro_rules! lifecycle {
    ($options:expr, $($arg:tt)+) => {
        if $options.debug {
            tracing::info!($($arg)+);
        } else {
            tracing::debug!($($arg)+);
        }
    };
}

/// One call to [`Toaster::notify`].
#[derive(Clone, Debug, Deserialize)]
pub struct NotificationRequest {
    pub severity: Severity,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overrides: Option<OptionsOverride>,
}

impl NotificationRequest {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            title: None,
            overrides: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: OptionsOverride) -> Self {
        self.overrides = Some(overrides);
        self
    }
}

#[derive(Debug)]
pub struct Toaster {
    defaults: Options,
    settings: EngineSettings,
    document: Document,
    registry: ContainerRegistry,
    dedup: DedupGuard,
    scheduler: Scheduler<(NodeId, Wake)>,
    toasts: HashMap<NodeId, Toast>,
}

impl Toaster {
    /// Engine over an empty `<html><body>` document.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_document(config, Document::new())
    }

    #[must_use]
    pub fn with_document(config: Config, document: Document) -> Self {
        Self {
            defaults: config.toast,
            dedup: DedupGuard::new(config.engine.dedup_capacity),
            settings: config.engine,
            document,
            registry: ContainerRegistry::new(),
            scheduler: Scheduler::new(),
            toasts: HashMap::new(),
        }
    }

    /// Process defaults every call starts from.
    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.defaults
    }

    /// Changes apply to toasts created afterwards; live toasts keep the
    /// options they were built with.
    pub const fn options_mut(&mut self) -> &mut Options {
        &mut self.defaults
    }

    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// Hosts add roots or remove elements through this. Toasts whose element
    /// disappears are dropped the next time anything touches them.
    pub const fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// When the next timer is due, if any is pending.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    pub fn error(
        &mut self,
        message: &str,
        title: Option<&str>,
        overrides: Option<OptionsOverride>,
    ) -> Vec<NodeId> {
        self.notify_with(Severity::Error, message, title, overrides)
    }

    pub fn info(
        &mut self,
        message: &str,
        title: Option<&str>,
        overrides: Option<OptionsOverride>,
    ) -> Vec<NodeId> {
        self.notify_with(Severity::Info, message, title, overrides)
    }

    pub fn success(
        &mut self,
        message: &str,
        title: Option<&str>,
        overrides: Option<OptionsOverride>,
    ) -> Vec<NodeId> {
        self.notify_with(Severity::Success, message, title, overrides)
    }

    pub fn warning(
        &mut self,
        message: &str,
        title: Option<&str>,
        overrides: Option<OptionsOverride>,
    ) -> Vec<NodeId> {
        self.notify_with(Severity::Warning, message, title, overrides)
    }

    fn notify_with(
        &mut self,
        severity: Severity,
        message: &str,
        title: Option<&str>,
        overrides: Option<OptionsOverride>,
    ) -> Vec<NodeId> {
        self.notify(NotificationRequest {
            severity,
            message: message.to_string(),
            title: title.map(str::to_string),
            overrides,
        })
    }

    /// Show `request` under every root matching its target.
    ///
    /// Returns one toast element per root, or nothing when the message repeats
    /// the previous one for that target and duplicates are suppressed.
    pub fn notify(&mut self, request: NotificationRequest) -> Vec<NodeId> {
        let NotificationRequest {
            severity,
            message,
            title,
            overrides,
        } = request;
        let options = config::resolve(&self.defaults, overrides.as_ref());
        let icon = overrides
            .as_ref()
            .and_then(|overrides| overrides.icon_class.clone())
            .unwrap_or_else(|| options.icon_classes.for_severity(severity).to_string());

        if self
            .dedup
            .should_suppress(options.target.as_str(), &message, options.prevent_duplicates)
        {
            lifecycle!(options, target = %options.target, %severity, "duplicate toast suppressed");
            return Vec::new();
        }

        let options = Arc::new(options);
        let containers = self.registry.get_or_create(&mut self.document, &options);
        containers
            .into_iter()
            .map(|container| {
                let content = Content {
                    icon: &icon,
                    title: title.as_deref().unwrap_or_default(),
                    message: &message,
                };
                self.present(container, severity, &content, &options)
            })
            .collect()
    }

    /// Remove every toast and container at once and forget all duplicates.
    ///
    /// No hide effect runs and focus is not consulted. Returns how many toasts
    /// were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.toasts.len();
        self.toasts.clear();
        self.scheduler.clear();
        let containers = self.registry.clear(&mut self.document);
        self.dedup.reset();
        tracing::debug!(toasts = removed, containers, "cleared");
        removed
    }

    /// Hide one toast as if its timer ran out, or, with `force`, as if its
    /// close control was pressed.
    pub fn dismiss(&mut self, toast: NodeId, force: bool) -> bool {
        self.with_toast(toast, |engine, toast| engine.hide(toast, force))
            .unwrap_or(false)
    }

    /// The pointer entered the toast that is or contains `node`.
    pub fn pointer_enter(&mut self, node: NodeId) -> bool {
        let Some(owner) = self.owner_of(node) else {
            return false;
        };
        self.with_toast(owner, Self::stick_around)
            .unwrap_or(false)
    }

    pub fn pointer_leave(&mut self, node: NodeId) -> bool {
        let Some(owner) = self.owner_of(node) else {
            return false;
        };
        self.with_toast(owner, Self::delayed_hide)
            .unwrap_or(false)
    }

    /// A click on the close control forces a hide and goes no further. Any
    /// other click inside a toast runs `on_click` or tap-to-dismiss.
    pub fn click(&mut self, node: NodeId) -> bool {
        let Some(owner) = self.owner_of(node) else {
            return false;
        };
        let on_close = self
            .toasts
            .get(&owner)
            .and_then(|toast| toast.close_button)
            .is_some_and(|button| button == node || self.document.is_ancestor(button, node));
        if on_close {
            return self.dismiss(owner, true);
        }
        self.with_toast(owner, Self::tap).unwrap_or(false)
    }

    /// Move input focus; a toast holding focus ignores non-forced hides.
    pub fn focus(&mut self, node: NodeId) -> bool {
        self.document.focus(node)
    }

    pub fn blur(&mut self) {
        self.document.blur();
    }

    /// Run every timer due within `by` from now.
    pub fn advance(&mut self, by: Duration) -> usize {
        self.advance_to(self.now().saturating_add(by))
    }

    /// Run every timer due at or before `until`, then set the clock to it.
    ///
    /// Returns the number of timer entries that fired.
    pub fn advance_to(&mut self, until: Duration) -> usize {
        let mut fired = 0;
        while let Some((timer, (toast, wake))) = self.scheduler.pop_due(until) {
            fired += 1;
            let handled = self.with_toast(toast, |engine, toast| engine.wake(toast, timer, wake));
            if handled.is_none() {
                self.scheduler.cancel(timer);
            }
        }
        self.scheduler.settle(until);
        fired
    }

    /// Live toast elements, in document order.
    #[must_use]
    pub fn toasts(&self) -> Vec<NodeId> {
        self.document
            .walk()
            .into_iter()
            .filter(|node| self.toasts.contains_key(node))
            .collect()
    }

    /// Live containers, in document order.
    #[must_use]
    pub fn containers(&self) -> Vec<NodeId> {
        self.registry.containers(&self.document)
    }

    #[must_use]
    pub fn phase(&self, toast: NodeId) -> Phase {
        self.toasts
            .get(&toast)
            .map_or(Phase::Removed, |toast| toast.phase)
    }

    /// The effect running on `toast`, for hosts that render the tween.
    #[must_use]
    pub fn animation(&self, toast: NodeId) -> Option<Animation> {
        self.toasts
            .get(&toast)
            .and_then(|toast| toast.animation)
            .map(|(_, animation)| animation)
    }

    #[must_use]
    pub fn severity(&self, toast: NodeId) -> Option<Severity> {
        self.toasts.get(&toast).map(|toast| toast.severity)
    }

    #[must_use]
    pub fn close_button(&self, toast: NodeId) -> Option<NodeId> {
        self.toasts.get(&toast).and_then(|toast| toast.close_button)
    }

    #[must_use]
    pub fn progress_bar(&self, toast: NodeId) -> Option<NodeId> {
        self.toasts.get(&toast).and_then(|toast| toast.progress_bar)
    }

    fn present(
        &mut self,
        container: NodeId,
        severity: Severity,
        content: &Content<'_>,
        options: &Arc<EffectiveOptions>,
    ) -> NodeId {
        let doc = &mut self.document;
        let element = doc.create_element("div");
        doc.add_class(element, &options.toast_class);
        doc.add_class(element, content.icon);
        doc.set_hidden(element, true);

        for (class, text) in [
            (&options.title_class, content.title),
            (&options.message_class, content.message),
        ] {
            if text.is_empty() {
                continue;
            }
            let block = doc.create_element("div");
            doc.add_class(block, class);
            if options.escape_html {
                doc.set_html(block, &escape_html(text));
            } else {
                doc.set_html(block, text);
            }
            doc.append_child(element, block);
        }

        let mut toast = Toast::new(element, container, severity, Arc::clone(options));
        if options.close_button {
            let button = doc.create_element("button");
            doc.set_attribute(button, "type", "button");
            doc.set_attribute(button, "role", "button");
            doc.add_class(button, CLOSE_BUTTON_CLASS);
            doc.set_html(button, &options.close_html);
            doc.prepend_child(element, button);
            toast.close_button = Some(button);
        }
        if options.progress_bar {
            let bar = doc.create_element("div");
            doc.add_class(bar, PROGRESS_CLASS);
            doc.prepend_child(element, bar);
            toast.progress_bar = Some(bar);
        }

        if options.newest_on_top {
            doc.prepend_child(container, element);
        } else {
            doc.append_child(container, element);
        }
        lifecycle!(options, toast = %element, %container, %severity, "toast created");

        self.display(&mut toast);
        self.toasts.insert(element, toast);
        element
    }

    /// Start the show effect and, unless the toast is sticky, its countdown.
    fn display(&mut self, toast: &mut Toast) {
        let now = self.now();
        let show = toast.show_animation(now);
        self.start_animation(toast, show);
        toast.phase = Phase::Showing;

        let time_out = toast.options.time_out;
        if time_out.is_zero() {
            return;
        }
        toast.hide_timer = Some(
            self.scheduler
                .set_timeout(time_out, (toast.element, Wake::HideTimeout)),
        );
        toast.progress.arm(now, time_out);
        self.start_progress(toast);
    }

    /// Take `id` out of the map for the duration of `f`, putting it back
    /// unless it was removed. Returns `None` for unknown toasts.
    fn with_toast<T>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut Self, &mut Toast) -> T,
    ) -> Option<T> {
        let mut toast = self.toasts.remove(&id)?;
        if !self.document.is_attached(toast.element) {
            lifecycle!(toast.options, toast = %id, "toast element detached by host");
            self.release(&mut toast);
            return None;
        }
        let outcome = f(self, &mut toast);
        if toast.phase != Phase::Removed {
            self.toasts.insert(id, toast);
        }
        Some(outcome)
    }

    fn wake(&mut self, toast: &mut Toast, timer: TimerId, wake: Wake) {
        match wake {
            Wake::HideTimeout => {
                if toast.hide_timer != Some(timer) {
                    return;
                }
                toast.hide_timer = None;
                self.hide(toast, false);
            }
            Wake::ProgressTick => {
                if toast.progress.ticker() != Some(timer) {
                    self.scheduler.cancel(timer);
                    return;
                }
                let Some(bar) = toast.progress_bar else {
                    return;
                };
                let percentage = toast.progress.percentage(self.now());
                self.document.set_width(bar, percentage);
                tracing::trace!(toast = %toast.element, percentage, "progress");
            }
            Wake::AnimationDone => self.animation_done(toast, timer),
        }
    }

    fn animation_done(&mut self, toast: &mut Toast, timer: TimerId) {
        if !toast.is_current_animation(timer) {
            return;
        }
        let Some((_, animation)) = toast.animation.take() else {
            return;
        };
        let visible = animation.method.reveals();
        self.document.set_hidden(toast.element, !visible);

        match toast.phase {
            Phase::Showing => {
                toast.phase = Phase::Visible;
                Self::announce_shown(toast);
            }
            Phase::Hiding { .. } if visible => {
                toast.phase = Phase::Visible;
                lifecycle!(toast.options, toast = %toast.element, method = %animation.method, "hide effect left toast on screen");
            }
            Phase::Hiding { .. } => self.remove(toast),
            Phase::Visible | Phase::Removed => {}
        }
    }

    /// Returns `true` when a hide effect was started.
    fn hide(&mut self, toast: &mut Toast, forced: bool) -> bool {
        match toast.phase {
            Phase::Removed | Phase::Hiding { forced: true } => return false,
            Phase::Hiding { forced: false } if !forced => return false,
            _ => {}
        }
        if !forced && self.document.has_focus_within(toast.element) {
            lifecycle!(toast.options, toast = %toast.element, "hide held back by focus inside toast");
            return false;
        }

        if let Some(timer) = toast.hide_timer.take() {
            self.scheduler.cancel(timer);
        }
        self.stop_progress(toast);
        if toast.phase == Phase::Showing {
            self.complete_show(toast);
        }

        let animation = toast.hide_animation(forced, self.now());
        self.start_animation(toast, animation);
        toast.phase = Phase::Hiding { forced };
        lifecycle!(toast.options, toast = %toast.element, forced, method = %animation.method, "toast hiding");
        true
    }

    /// Hovering keeps the toast on screen: the countdown stops and the show
    /// effect runs again. A non-forced hide in progress is called off.
    fn stick_around(&mut self, toast: &mut Toast) -> bool {
        match toast.phase {
            Phase::Removed | Phase::Hiding { forced: true } => return false,
            Phase::Showing => self.complete_show(toast),
            Phase::Hiding { forced: false } => {
                lifecycle!(toast.options, toast = %toast.element, "hide called off by hover");
            }
            Phase::Visible => {}
        }
        if let Some(timer) = toast.hide_timer.take() {
            self.scheduler.cancel(timer);
        }
        toast.progress.park();
        self.stop_progress(toast);

        let show = toast.show_animation(self.now());
        self.start_animation(toast, show);
        toast.phase = Phase::Showing;
        true
    }

    /// Leaving the toast restarts the countdown from `extended_time_out`.
    fn delayed_hide(&mut self, toast: &mut Toast) -> bool {
        if matches!(toast.phase, Phase::Removed | Phase::Hiding { .. }) {
            return false;
        }
        let extended = toast.options.extended_time_out;
        if extended.is_zero() {
            return false;
        }
        if let Some(timer) = toast.hide_timer.take() {
            self.scheduler.cancel(timer);
        }
        toast.hide_timer = Some(
            self.scheduler
                .set_timeout(extended, (toast.element, Wake::HideTimeout)),
        );
        toast.progress.arm(self.now(), extended);
        self.start_progress(toast);
        true
    }

    fn tap(&mut self, toast: &mut Toast) -> bool {
        let options = Arc::clone(&toast.options);
        if let Some(hook) = &options.on_click {
            hook.call(toast.element);
            return self.hide(toast, false);
        }
        options.tap_to_dismiss && self.hide(toast, false)
    }

    /// Jump a running show effect to its end.
    fn complete_show(&mut self, toast: &mut Toast) {
        if let Some((timer, animation)) = toast.animation.take() {
            self.scheduler.cancel(timer);
            self.document
                .set_hidden(toast.element, !animation.method.reveals());
        }
        toast.phase = Phase::Visible;
        Self::announce_shown(toast);
    }

    /// `on_shown` runs once, after the first show effect.
    fn announce_shown(toast: &mut Toast) {
        if !std::mem::take(&mut toast.announce_shown) {
            return;
        }
        lifecycle!(toast.options, toast = %toast.element, "toast shown");
        if let Some(hook) = &toast.options.on_shown {
            hook.call(toast.element);
        }
    }

    fn start_animation(&mut self, toast: &mut Toast, animation: Animation) {
        if let Some((previous, _)) = toast.animation.take() {
            self.scheduler.cancel(previous);
        }
        if animation.method.reveals() {
            self.document.set_hidden(toast.element, false);
        }
        let timer = self
            .scheduler
            .set_timeout(animation.duration, (toast.element, Wake::AnimationDone));
        toast.animation = Some((timer, animation));
    }

    fn start_progress(&mut self, toast: &mut Toast) {
        if toast.progress_bar.is_none() {
            return;
        }
        self.stop_progress(toast);
        let ticker = self.scheduler.set_interval(
            self.settings.progress_interval,
            (toast.element, Wake::ProgressTick),
        );
        toast.progress.set_ticker(ticker);
    }

    fn stop_progress(&mut self, toast: &mut Toast) {
        if let Some(ticker) = toast.progress.take_ticker() {
            self.scheduler.cancel(ticker);
        }
    }

    fn remove(&mut self, toast: &mut Toast) {
        self.document.remove(toast.element);
        toast.phase = Phase::Removed;
        lifecycle!(toast.options, toast = %toast.element, "toast removed");
        self.release(toast);
    }

    /// Cancel the toast's timers and reclaim its container if it is now empty.
    fn release(&mut self, toast: &mut Toast) {
        for timer in toast.take_timers() {
            self.scheduler.cancel(timer);
        }
        if let Some(target) = self
            .registry
            .reclaim_if_empty(&mut self.document, toast.container)
        {
            self.dedup.forget(target.as_str());
        }
    }

    /// The live toast whose element is `node` or contains it.
    fn owner_of(&self, node: NodeId) -> Option<NodeId> {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if self.toasts.contains_key(&current) {
                return Some(current);
            }
            cursor = self.document.get(current).and_then(Node::parent);
        }
        None
    }
}

struct Content<'a> {
    icon: &'a str,
    title: &'a str,
    message: &'a str,
}
