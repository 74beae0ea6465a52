use std::num::NonZeroUsize;
use std::time::Duration;

pub(super) const TARGET: &str = "body";

const DEDUP_CAPACITY: usize = 256;

pub(super) fn toast_class() -> String {
    "toast".to_string()
}

pub(super) fn container_id() -> String {
    "toast-container".to_string()
}

pub(super) fn position_class() -> String {
    "toast-top-right".to_string()
}

pub(super) fn title_class() -> String {
    "toast-title".to_string()
}

pub(super) fn message_class() -> String {
    "toast-message".to_string()
}

pub(super) fn close_html() -> String {
    "&times;".to_string()
}

pub(super) fn show_method() -> String {
    "fadeIn".to_string()
}

pub(super) fn hide_method() -> String {
    "fadeOut".to_string()
}

pub(super) fn easing() -> String {
    "swing".to_string()
}

pub(super) const fn show_duration() -> Duration {
    Duration::from_millis(300)
}

pub(super) const fn hide_duration() -> Duration {
    Duration::from_millis(1_000)
}

pub(super) const fn time_out() -> Duration {
    Duration::from_millis(5_000)
}

pub(super) const fn extended_time_out() -> Duration {
    Duration::from_millis(1_000)
}

pub(super) const fn progress_interval() -> Duration {
    Duration::from_millis(10)
}

pub(super) const fn dedup_capacity() -> NonZeroUsize {
    match NonZeroUsize::new(DEDUP_CAPACITY) {
        Some(capacity) => capacity,
        None => NonZeroUsize::MIN,
    }
}

pub(super) const fn raw_dedup_capacity() -> usize {
    DEDUP_CAPACITY
}
