use std::fmt;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_with::serde_as;

use crate::Result;
use crate::animation::{AnimationMethod, Easing};
use crate::dom::{NodeId, Selector};
use crate::error::Error as ToasterError;
use crate::types::IconClasses;

mod defaults;
mod duration;
mod env;
mod raw;
mod resolve;

pub use duration::HumantimeDuration;
pub use resolve::resolve;

/// Everything needed to build a [`crate::Toaster`].
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub toast: Options,
    pub engine: EngineSettings,
}

#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Number of targets whose last message is remembered for deduplication.
    pub dedup_capacity: NonZeroUsize,
    /// Tick of the progress estimator.
    pub progress_interval: Duration,
}

/// Process-wide toast defaults.
///
/// A zero `time_out` or `extended_time_out` means the toast never hides on its
/// own. The `close_*` fields fall back to their `hide_*` counterparts when unset.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone)]
pub struct Options {
    pub tap_to_dismiss: bool,
    pub toast_class: String,
    pub container_id: String,
    /// Log lifecycle transitions at `info` instead of `debug`.
    pub debug: bool,
    pub show_method: AnimationMethod,
    pub show_duration: Duration,
    pub show_easing: Easing,
    /// Invoked with the toast element once its first show effect completes.
    pub on_shown: Option<Callback>,
    pub hide_method: AnimationMethod,
    pub hide_duration: Duration,
    pub hide_easing: Easing,
    pub close_method: Option<AnimationMethod>,
    pub close_duration: Option<Duration>,
    pub close_easing: Option<Easing>,
    /// Replaces tap-to-dismiss; the toast hides after the callback returns.
    pub on_click: Option<Callback>,
    pub extended_time_out: Duration,
    pub icon_classes: IconClasses,
    pub position_class: String,
    pub time_out: Duration,
    pub title_class: String,
    pub message_class: String,
    pub escape_html: bool,
    pub target: Selector,
    /// Markup placed inside the close button.
    pub close_html: String,
    pub close_button: bool,
    pub newest_on_top: bool,
    pub prevent_duplicates: bool,
    pub progress_bar: bool,
}

/// The options one toast is built with: defaults merged with its overrides.
pub type EffectiveOptions = Options;

/// Per-call overrides. Unset fields keep the process default.
#[allow(clippy::struct_excessive_bools)]
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptionsOverride {
    pub tap_to_dismiss: Option<bool>,
    pub toast_class: Option<String>,
    pub container_id: Option<String>,
    pub debug: Option<bool>,
    pub show_method: Option<AnimationMethod>,
    #[serde_as(as = "Option<HumantimeDuration>")]
    pub show_duration: Option<Duration>,
    pub show_easing: Option<Easing>,
    #[serde(skip)]
    pub on_shown: Option<Callback>,
    pub hide_method: Option<AnimationMethod>,
    #[serde_as(as = "Option<HumantimeDuration>")]
    pub hide_duration: Option<Duration>,
    pub hide_easing: Option<Easing>,
    pub close_method: Option<AnimationMethod>,
    #[serde_as(as = "Option<HumantimeDuration>")]
    pub close_duration: Option<Duration>,
    pub close_easing: Option<Easing>,
    #[serde(skip)]
    pub on_click: Option<Callback>,
    #[serde_as(as = "Option<HumantimeDuration>")]
    pub extended_time_out: Option<Duration>,
    /// Icon for this call only, replacing the severity's class.
    pub icon_class: Option<String>,
    pub position_class: Option<String>,
    #[serde_as(as = "Option<HumantimeDuration>")]
    pub time_out: Option<Duration>,
    pub title_class: Option<String>,
    pub message_class: Option<String>,
    pub escape_html: Option<bool>,
    pub target: Option<Selector>,
    pub close_html: Option<String>,
    pub close_button: Option<bool>,
    pub newest_on_top: Option<bool>,
    pub prevent_duplicates: Option<bool>,
    pub progress_bar: Option<bool>,
}

/// Hook invoked with a toast's element.
#[derive(Clone)]
pub struct Callback(Arc<dyn Fn(NodeId) + Send + Sync>);

impl Callback {
    pub fn new(hook: impl Fn(NodeId) + Send + Sync + 'static) -> Self {
        Self(Arc::new(hook))
    }

    pub(crate) fn call(&self, toast: NodeId) {
        (self.0)(toast);
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

impl Config {
    /// Load configuration from an optional TOML file and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be parsed, when an environment
    /// override is malformed, or when a value fails validation.
    pub fn from_env_and_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut raw = raw::load_file(path.as_ref()).map_err(ToasterError::from)?;
        raw.apply_env_overrides().map_err(ToasterError::from)?;
        raw.validate_and_build()
    }

    /// Load configuration from TOML text alone, ignoring the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the text is not valid TOML or a value fails
    /// validation.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        raw::load_str(source)
            .map_err(ToasterError::from)?
            .validate_and_build()
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            dedup_capacity: defaults::dedup_capacity(),
            progress_interval: defaults::progress_interval(),
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tap_to_dismiss: true,
            toast_class: defaults::toast_class(),
            container_id: defaults::container_id(),
            debug: false,
            show_method: AnimationMethod::FadeIn,
            show_duration: defaults::show_duration(),
            show_easing: Easing::Swing,
            on_shown: None,
            hide_method: AnimationMethod::FadeOut,
            hide_duration: defaults::hide_duration(),
            hide_easing: Easing::Swing,
            close_method: None,
            close_duration: None,
            close_easing: None,
            on_click: None,
            extended_time_out: defaults::extended_time_out(),
            icon_classes: IconClasses::default(),
            position_class: defaults::position_class(),
            time_out: defaults::time_out(),
            title_class: defaults::title_class(),
            message_class: defaults::message_class(),
            escape_html: false,
            target: Selector::for_tag(defaults::TARGET),
            close_html: defaults::close_html(),
            close_button: false,
            newest_on_top: true,
            prevent_duplicates: false,
            progress_bar: false,
        }
    }
}
