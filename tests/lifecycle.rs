#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use toaster::dom::{Document, NodeId, Selector};
use toaster::{
    Callback, Config, NotificationRequest, OptionsOverride, Phase, Severity, Toaster,
};

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Instant effects, so removal lands exactly on the timer.
fn instant_effects() -> Config {
    let mut config = Config::default();
    config.toast.show_duration = Duration::ZERO;
    config.toast.hide_duration = Duration::ZERO;
    config
}

fn timed(time_out: u64, extended: u64) -> Toaster {
    let mut config = instant_effects();
    config.toast.time_out = ms(time_out);
    config.toast.extended_time_out = ms(extended);
    Toaster::new(config)
}

fn single(toasts: Vec<NodeId>) -> NodeId {
    assert_eq!(toasts.len(), 1, "expected exactly one toast, got {toasts:?}");
    toasts[0]
}

fn body_html(toaster: &Toaster) -> String {
    let document = toaster.document();
    document
        .children(document.body())
        .iter()
        .map(|node| document.outer_html(*node))
        .collect()
}

#[test]
fn every_severity_renders_message_and_default_icon() {
    let mut toaster = Toaster::new(Config::default());
    for severity in Severity::ALL {
        let toast = single(toaster.notify(NotificationRequest::new(severity, "disk almost full")));
        let document = toaster.document();
        let node = document.get(toast).unwrap();
        assert!(node.has_class("toast"));
        assert!(node.has_class(&format!("toast-{severity}")));

        let children = document.children(toast);
        assert_eq!(children.len(), 1, "no title block without a title");
        let message = document.get(children[0]).unwrap();
        assert!(message.has_class("toast-message"));
        assert_eq!(message.html(), "disk almost full");
        assert_eq!(toaster.severity(toast), Some(severity));
    }
    assert_eq!(toaster.toasts().len(), 4);
}

#[test]
fn icon_class_override_replaces_severity_icon() {
    let mut toaster = Toaster::new(Config::default());
    let overrides = OptionsOverride {
        icon_class: Some("toast-custom".to_string()),
        ..OptionsOverride::default()
    };
    let toast = single(toaster.error("custom", None, Some(overrides)));
    let node = toaster.document().get(toast).unwrap();
    assert!(node.has_class("toast-custom"));
    assert!(!node.has_class("toast-error"));
}

#[test]
fn empty_message_and_title_render_an_empty_toast() {
    let mut toaster = Toaster::new(Config::default());
    let toast = single(toaster.info("", Some(""), None));
    assert!(toaster.document().children(toast).is_empty());
}

#[test]
fn markup_follows_element_order() {
    let mut config = Config::default();
    config.toast.close_button = true;
    config.toast.progress_bar = true;
    let mut toaster = Toaster::new(config);
    toaster.success("All files", Some("Saved"), None);

    insta::assert_snapshot!(
        body_html(&toaster),
        @r#"<div class="toast-container toast-top-right" aria-live="polite" role="alert"><div class="toast toast-success"><div class="toast-progress"></div><button class="toast-close-button" role="button" type="button">&times;</button><div class="toast-title">Saved</div><div class="toast-message">All files</div></div></div>"#
    );
}

#[test]
fn clear_twice_leaves_no_containers() {
    let mut toaster = Toaster::new(Config::default());
    toaster.info("one", None, None);
    toaster.warning("two", None, None);
    assert_eq!(toaster.containers().len(), 1);

    assert_eq!(toaster.clear(), 2);
    assert!(toaster.containers().is_empty());
    assert_eq!(toaster.clear(), 0);
    assert!(toaster.containers().is_empty());
    assert!(toaster.document().children(toaster.document().body()).is_empty());
    assert!(toaster.next_deadline().is_none());
}

#[test]
fn clear_resets_duplicate_tracking() {
    let mut config = Config::default();
    config.toast.prevent_duplicates = true;
    let mut toaster = Toaster::new(config);
    assert_eq!(toaster.info("same", None, None).len(), 1);
    toaster.clear();
    assert_eq!(toaster.info("same", None, None).len(), 1);
}

#[test]
fn only_the_previous_message_is_suppressed() {
    let mut config = Config::default();
    config.toast.prevent_duplicates = true;
    let mut toaster = Toaster::new(config);

    assert_eq!(toaster.info("a", None, None).len(), 1);
    assert!(toaster.info("a", None, None).is_empty());
    assert_eq!(toaster.toasts().len(), 1);

    assert_eq!(toaster.info("b", None, None).len(), 1);
    assert_eq!(toaster.info("a", None, None).len(), 1);
    assert_eq!(toaster.toasts().len(), 3);
}

#[test]
fn duplicates_allowed_when_disabled() {
    let mut toaster = Toaster::new(Config::default());
    toaster.info("a", None, None);
    toaster.info("a", None, None);
    assert_eq!(toaster.toasts().len(), 2);
}

#[test]
fn reclaiming_a_container_forgets_its_last_message() {
    let mut toaster = timed(1_000, 500);
    toaster.options_mut().prevent_duplicates = true;

    let first = single(toaster.info("a", None, None));
    toaster.advance(ms(1_000));
    assert_eq!(toaster.phase(first), Phase::Removed);
    assert_eq!(toaster.info("a", None, None).len(), 1);
}

#[test]
fn untouched_toast_goes_after_time_out() {
    let mut toaster = timed(1_000, 500);
    let toast = single(toaster.info("tick", None, None));

    toaster.advance(ms(999));
    assert_eq!(toaster.phase(toast), Phase::Visible);
    toaster.advance(ms(1));
    assert_eq!(toaster.phase(toast), Phase::Removed);
    assert!(toaster.toasts().is_empty());
}

#[test]
fn hover_then_leave_uses_extended_time_out() {
    let mut toaster = timed(1_000, 500);
    let toast = single(toaster.info("hover me", None, None));

    toaster.advance(ms(400));
    assert!(toaster.pointer_enter(toast));
    toaster.advance(ms(300));
    assert!(toaster.pointer_leave(toast));

    toaster.advance_to(ms(1_000));
    assert_ne!(toaster.phase(toast), Phase::Removed);
    toaster.advance_to(ms(1_199));
    assert_ne!(toaster.phase(toast), Phase::Removed);
    toaster.advance_to(ms(1_200));
    assert_eq!(toaster.phase(toast), Phase::Removed);
}

#[test]
fn hover_events_bubble_from_inner_elements() {
    let mut toaster = timed(1_000, 500);
    let toast = single(toaster.info("inner", Some("title"), None));
    let title = toaster.document().children(toast)[0];

    assert!(toaster.pointer_enter(title));
    toaster.advance(ms(5_000));
    assert_eq!(toaster.phase(toast), Phase::Visible);
}

#[test]
fn zero_time_out_is_sticky() {
    let mut toaster = timed(0, 0);
    let toast = single(toaster.info("forever", None, None));
    toaster.advance(ms(60_000));
    assert_eq!(toaster.phase(toast), Phase::Visible);

    assert!(toaster.pointer_enter(toast));
    assert!(!toaster.pointer_leave(toast));
    toaster.advance(ms(60_000));
    assert_eq!(toaster.phase(toast), Phase::Visible);
    assert!(toaster.next_deadline().is_none());
}

#[test]
fn focus_inside_blocks_all_but_forced_hides() {
    let mut config = instant_effects();
    config.toast.time_out = ms(1_000);
    config.toast.close_button = true;
    let mut toaster = Toaster::new(config);
    let toast = single(toaster.info("typing", None, None));
    let button = toaster.close_button(toast).unwrap();

    assert!(toaster.focus(button));
    toaster.advance(ms(2_000));
    assert_eq!(toaster.phase(toast), Phase::Visible);

    assert!(!toaster.click(toast));
    assert!(!toaster.dismiss(toast, false));
    assert_eq!(toaster.phase(toast), Phase::Visible);

    assert!(toaster.click(button));
    toaster.advance(Duration::ZERO);
    assert_eq!(toaster.phase(toast), Phase::Removed);
    assert!(toaster.document().focused().is_none());
}

#[test]
fn close_click_skips_on_click_and_focus() {
    let clicks = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&clicks);
    let mut config = Config::default();
    config.toast.close_button = true;
    config.toast.on_click = Some(Callback::new(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));
    let mut toaster = Toaster::new(config);
    let toast = single(toaster.info("closing", Some("title"), None));
    toaster.advance(ms(300));
    let message = *toaster.document().children(toast).last().unwrap();
    let button = toaster.close_button(toast).unwrap();

    assert!(toaster.focus(message));
    assert!(toaster.click(button));
    assert_eq!(clicks.load(Ordering::SeqCst), 0);
    assert_eq!(toaster.phase(toast), Phase::Hiding { forced: true });
}

#[test]
fn unbounded_time_out_never_fires() {
    let mut toaster = timed(1_000, 500);
    toaster.advance(ms(1));
    toaster.options_mut().time_out = Duration::MAX;
    let toast = single(toaster.info("forever", None, None));
    toaster.advance(ms(60_000));
    assert_eq!(toaster.phase(toast), Phase::Visible);
    assert!(toaster.next_deadline().is_none());

    let overrides = OptionsOverride {
        extended_time_out: Some(Duration::MAX),
        ..OptionsOverride::default()
    };
    let hovered = single(toaster.warning("hover", None, Some(overrides)));
    assert!(toaster.pointer_enter(hovered));
    assert!(toaster.pointer_leave(hovered));
    toaster.advance(Duration::MAX);
    assert_eq!(toaster.phase(hovered), Phase::Visible);
    assert_eq!(toaster.now(), Duration::MAX);
}

#[test]
fn blur_lets_the_next_hide_through() {
    let mut toaster = timed(1_000, 500);
    let toast = single(toaster.info("typing", Some("title"), None));
    let title = toaster.document().children(toast)[0];

    assert!(toaster.focus(title));
    assert!(!toaster.dismiss(toast, false));
    toaster.blur();
    assert!(toaster.dismiss(toast, false));
}

#[test]
fn escape_html_escapes_text() {
    let mut config = Config::default();
    config.toast.escape_html = true;
    let mut toaster = Toaster::new(config);
    let toast = single(toaster.info(r#"<b>&"'</b>"#, Some("<i>t</i>"), None));

    let document = toaster.document();
    let blocks: Vec<_> = document
        .children(toast)
        .iter()
        .map(|node| document.get(*node).unwrap().html().to_string())
        .collect();
    assert_eq!(
        blocks,
        ["&lt;i&gt;t&lt;/i&gt;", "&lt;b&gt;&amp;&quot;&#39;&lt;/b&gt;"]
    );
}

#[test]
fn markup_passes_through_unescaped_by_default() {
    let mut toaster = Toaster::new(Config::default());
    let toast = single(toaster.info("<b>bold</b>", None, None));
    let document = toaster.document();
    let message = document.children(toast)[0];
    assert_eq!(document.get(message).unwrap().html(), "<b>bold</b>");
}

#[test]
fn last_removal_drops_the_container_and_a_new_one_follows() {
    let mut toaster = timed(1_000, 500);
    let toast = single(toaster.info("only", None, None));
    let container = single(toaster.containers());

    toaster.advance(ms(1_000));
    assert_eq!(toaster.phase(toast), Phase::Removed);
    assert!(toaster.containers().is_empty());
    assert!(!toaster.document().is_attached(container));

    toaster.info("again", None, None);
    let fresh = single(toaster.containers());
    assert_ne!(fresh, container);
}

#[test]
fn container_survives_while_siblings_remain() {
    let mut toaster = timed(1_000, 500);
    let first = single(toaster.info("first", None, None));
    toaster.advance(ms(500));
    let second = single(toaster.info("second", None, None));

    toaster.advance(ms(500));
    assert_eq!(toaster.phase(first), Phase::Removed);
    assert_eq!(toaster.phase(second), Phase::Visible);
    assert_eq!(toaster.containers().len(), 1);
}

#[test]
fn fan_out_gives_each_root_its_own_toast() {
    let mut document = Document::new();
    let body = document.body();
    for _ in 0..3 {
        let panel = document.create_element("section");
        document.add_class(panel, "panel");
        document.append_child(body, panel);
    }
    let mut toaster = Toaster::with_document(instant_effects(), document);
    let overrides = OptionsOverride {
        target: Some(Selector::from_str(".panel").unwrap()),
        ..OptionsOverride::default()
    };

    let toasts = toaster.info("everywhere", None, Some(overrides));
    assert_eq!(toasts.len(), 3);
    let containers = toaster.containers();
    assert_eq!(containers.len(), 3);
    for (toast, container) in toasts.iter().zip(&containers) {
        assert_eq!(toaster.document().get(*toast).unwrap().parent(), Some(*container));
    }

    assert!(toaster.dismiss(toasts[1], true));
    toaster.advance(Duration::ZERO);
    assert_eq!(toaster.phase(toasts[1]), Phase::Removed);
    assert_eq!(toaster.phase(toasts[0]), Phase::Visible);
    assert_eq!(toaster.phase(toasts[2]), Phase::Visible);
    assert_eq!(toaster.containers().len(), 2);
}

#[test]
fn unmatched_target_shows_nothing() {
    let mut toaster = Toaster::new(Config::default());
    let overrides = OptionsOverride {
        target: Some(Selector::from_str("#missing").unwrap()),
        ..OptionsOverride::default()
    };
    assert!(toaster.info("nowhere", None, Some(overrides)).is_empty());
    assert!(toaster.containers().is_empty());
}

#[test]
fn stacking_follows_newest_on_top() {
    let mut toaster = Toaster::new(Config::default());
    let older = single(toaster.info("older", None, None));
    let newer = single(toaster.info("newer", None, None));
    assert_eq!(toaster.toasts(), vec![newer, older]);

    toaster.clear();
    toaster.options_mut().newest_on_top = false;
    let older = single(toaster.info("older", None, None));
    let newer = single(toaster.info("newer", None, None));
    assert_eq!(toaster.toasts(), vec![older, newer]);
}

#[test]
fn progress_tracks_remaining_time_without_clamping() {
    let mut config = instant_effects();
    config.toast.time_out = ms(1_000);
    config.toast.extended_time_out = ms(500);
    config.toast.progress_bar = true;
    let mut toaster = Toaster::new(config);
    let toast = single(toaster.info("loading", None, None));
    let bar = toaster.progress_bar(toast).unwrap();
    let width = |toaster: &Toaster| toaster.document().get(bar).unwrap().width().unwrap();

    toaster.advance(ms(500));
    assert!((width(&toaster) - 50.0).abs() < 1e-6);

    toaster.pointer_enter(toast);
    toaster.advance(ms(100));
    assert!((width(&toaster) - 50.0).abs() < 1e-6, "hover stops the ticks");

    toaster.pointer_leave(toast);
    toaster.advance(ms(250));
    assert!((width(&toaster) - 50.0).abs() < 1e-6);

    toaster.advance(ms(250));
    assert_eq!(toaster.phase(toast), Phase::Removed);
}

#[test]
fn on_click_runs_before_the_hide() {
    let clicked = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&clicked);
    let mut toaster = Toaster::new(instant_effects());
    toaster.options_mut().tap_to_dismiss = false;
    let overrides = OptionsOverride {
        on_click: Some(Callback::new(move |toast| seen.lock().unwrap().push(toast))),
        ..OptionsOverride::default()
    };
    let toast = single(toaster.info("click me", None, Some(overrides)));

    assert!(toaster.click(toast));
    assert_eq!(*clicked.lock().unwrap(), vec![toast]);
    toaster.advance(Duration::ZERO);
    assert_eq!(toaster.phase(toast), Phase::Removed);
}

#[test]
fn on_shown_fires_when_the_show_effect_ends() {
    let shown = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&shown);
    let mut config = Config::default();
    config.toast.on_shown = Some(Callback::new(move |toast| seen.lock().unwrap().push(toast)));
    let mut toaster = Toaster::new(config);

    let toast = single(toaster.info("hello", None, None));
    toaster.advance(ms(299));
    assert!(shown.lock().unwrap().is_empty());
    toaster.advance(ms(1));
    assert_eq!(*shown.lock().unwrap(), vec![toast]);
}

#[test]
fn phases_serialize_for_hosts() {
    insta::assert_json_snapshot!(Phase::Hiding { forced: true }, @r#"
    {
      "phase": "hiding",
      "forced": true
    }
    "#);
}
