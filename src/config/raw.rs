use std::num::NonZeroUsize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use serde_with::serde_as;

use crate::Result;
use crate::animation::{AnimationMethod, Easing};
use crate::dom::Selector;
use crate::error::ConfigError;
use crate::types::IconClasses;

use super::defaults;
use super::env::{duration, flag, lookup, text};
use super::{Config, EngineSettings, HumantimeDuration, Options};

const ENV_PREFIX: &str = "TOASTER";

pub(super) fn load_file(path: &Path) -> std::result::Result<RawConfig, ConfigError> {
    let builder = ::config::Config::builder()
        .add_source(::config::File::from(path).required(false))
        .add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );
    deserialize(builder)
}

pub(super) fn load_str(source: &str) -> std::result::Result<RawConfig, ConfigError> {
    let builder = ::config::Config::builder()
        .add_source(::config::File::from_str(source, ::config::FileFormat::Toml));
    deserialize(builder)
}

fn deserialize(
    builder: ::config::ConfigBuilder<::config::builder::DefaultState>,
) -> std::result::Result<RawConfig, ConfigError> {
    builder
        .build()
        .map_err(|err| ConfigError::Other(err.to_string()))?
        .try_deserialize()
        .map_err(|err| ConfigError::Parse(err.to_string()))
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub(super) toast: RawToast,
    #[serde(default)]
    pub(super) engine: RawEngine,
}

#[allow(clippy::struct_excessive_bools)]
#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(super) struct RawToast {
    pub(super) tap_to_dismiss: bool,
    pub(super) toast_class: String,
    pub(super) container_id: String,
    pub(super) debug: bool,
    pub(super) show_method: String,
    #[serde_as(as = "HumantimeDuration")]
    pub(super) show_duration: Duration,
    pub(super) show_easing: String,
    pub(super) hide_method: String,
    #[serde_as(as = "HumantimeDuration")]
    pub(super) hide_duration: Duration,
    pub(super) hide_easing: String,
    pub(super) close_method: Option<String>,
    #[serde_as(as = "Option<HumantimeDuration>")]
    pub(super) close_duration: Option<Duration>,
    pub(super) close_easing: Option<String>,
    #[serde_as(as = "HumantimeDuration")]
    pub(super) extended_time_out: Duration,
    pub(super) icon_classes: IconClasses,
    pub(super) position_class: String,
    #[serde_as(as = "HumantimeDuration")]
    pub(super) time_out: Duration,
    pub(super) title_class: String,
    pub(super) message_class: String,
    pub(super) escape_html: bool,
    pub(super) target: String,
    pub(super) close_html: String,
    pub(super) close_button: bool,
    pub(super) newest_on_top: bool,
    pub(super) prevent_duplicates: bool,
    pub(super) progress_bar: bool,
}

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(default)]
pub(super) struct RawEngine {
    pub(super) dedup_capacity: usize,
    #[serde_as(as = "HumantimeDuration")]
    pub(super) progress_interval: Duration,
}

impl RawConfig {
    /// Short variables for the handful of settings people flip per run.
    pub(super) fn apply_env_overrides(&mut self) -> std::result::Result<(), ConfigError> {
        if let Some(timeout) = lookup("TOAST_TIMEOUT", duration)? {
            self.toast.time_out = timeout;
        }
        if let Some(timeout) = lookup("TOAST_EXTENDED_TIMEOUT", duration)? {
            self.toast.extended_time_out = timeout;
        }
        if let Some(target) = lookup("TOAST_TARGET", text)? {
            self.toast.target = target;
        }
        if let Some(position) = lookup("TOAST_POSITION", text)? {
            self.toast.position_class = position;
        }
        if let Some(prevent) = lookup("TOAST_PREVENT_DUPLICATES", flag)? {
            self.toast.prevent_duplicates = prevent;
        }
        if let Some(progress) = lookup("TOAST_PROGRESS_BAR", flag)? {
            self.toast.progress_bar = progress;
        }
        Ok(())
    }

    pub(super) fn validate_and_build(self) -> Result<Config> {
        let toast = self.toast;

        let target = Selector::from_str(&toast.target).map_err(|message| {
            ConfigError::InvalidField {
                field: "toast.target",
                message,
            }
        })?;
        let toast_class = single_class("toast.toast_class", toast.toast_class)?;
        let container_id = single_class("toast.container_id", toast.container_id)?;

        let close_method = toast
            .close_method
            .map(|raw| parse_named::<AnimationMethod>("toast.close_method", &raw))
            .transpose()?;
        let close_easing = toast
            .close_easing
            .map(|raw| parse_named::<Easing>("toast.close_easing", &raw))
            .transpose()?;

        let dedup_capacity =
            NonZeroUsize::new(self.engine.dedup_capacity).ok_or(ConfigError::InvalidField {
                field: "engine.dedup_capacity",
                message: "dedup capacity must be greater than zero".to_string(),
            })?;
        if self.engine.progress_interval.is_zero() {
            return Err(ConfigError::InvalidField {
                field: "engine.progress_interval",
                message: "progress interval must be greater than zero".to_string(),
            }
            .into());
        }

        Ok(Config {
            toast: Options {
                tap_to_dismiss: toast.tap_to_dismiss,
                toast_class,
                container_id,
                debug: toast.debug,
                show_method: parse_named("toast.show_method", &toast.show_method)?,
                show_duration: toast.show_duration,
                show_easing: parse_named("toast.show_easing", &toast.show_easing)?,
                on_shown: None,
                hide_method: parse_named("toast.hide_method", &toast.hide_method)?,
                hide_duration: toast.hide_duration,
                hide_easing: parse_named("toast.hide_easing", &toast.hide_easing)?,
                close_method,
                close_duration: toast.close_duration,
                close_easing,
                on_click: None,
                extended_time_out: toast.extended_time_out,
                icon_classes: toast.icon_classes,
                position_class: toast.position_class,
                time_out: toast.time_out,
                title_class: toast.title_class,
                message_class: toast.message_class,
                escape_html: toast.escape_html,
                target,
                close_html: toast.close_html,
                close_button: toast.close_button,
                newest_on_top: toast.newest_on_top,
                prevent_duplicates: toast.prevent_duplicates,
                progress_bar: toast.progress_bar,
            },
            engine: EngineSettings {
                dedup_capacity,
                progress_interval: self.engine.progress_interval,
            },
        })
    }
}

fn parse_named<T>(field: &'static str, raw: &str) -> std::result::Result<T, ConfigError>
where
    T: FromStr<Err = String>,
{
    T::from_str(raw).map_err(|message| ConfigError::InvalidField { field, message })
}

fn single_class(field: &'static str, raw: String) -> std::result::Result<String, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
        return Err(ConfigError::InvalidField {
            field,
            message: format!("expected a single class name, got {raw:?}"),
        });
    }
    Ok(trimmed.to_string())
}

impl Default for RawToast {
    fn default() -> Self {
        Self {
            tap_to_dismiss: true,
            toast_class: defaults::toast_class(),
            container_id: defaults::container_id(),
            debug: false,
            show_method: defaults::show_method(),
            show_duration: defaults::show_duration(),
            show_easing: defaults::easing(),
            hide_method: defaults::hide_method(),
            hide_duration: defaults::hide_duration(),
            hide_easing: defaults::easing(),
            close_method: None,
            close_duration: None,
            close_easing: None,
            extended_time_out: defaults::extended_time_out(),
            icon_classes: IconClasses::default(),
            position_class: defaults::position_class(),
            time_out: defaults::time_out(),
            title_class: defaults::title_class(),
            message_class: defaults::message_class(),
            escape_html: false,
            target: defaults::TARGET.to_string(),
            close_html: defaults::close_html(),
            close_button: false,
            newest_on_top: true,
            prevent_duplicates: false,
            progress_bar: false,
        }
    }
}

impl Default for RawEngine {
    fn default() -> Self {
        Self {
            dedup_capacity: defaults::raw_dedup_capacity(),
            progress_interval: defaults::progress_interval(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RawConfig, load_str};
    use crate::error::{ConfigError, Error};

    fn invalid_field(source: &str) -> &'static str {
        let raw = match load_str(source) {
            Ok(raw) => raw,
            Err(err) => panic!("toml should parse: {err}"),
        };
        match raw.validate_and_build() {
            Err(Error::Config(ConfigError::InvalidField { field, .. })) => field,
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected validation to fail for {source}"),
        }
    }

    #[test]
    fn rejects_bad_target() {
        assert_eq!(invalid_field("[toast]\ntarget = \"body .x\""), "toast.target");
    }

    #[test]
    fn rejects_unknown_animation() {
        assert_eq!(
            invalid_field("[toast]\nhide_method = \"explode\""),
            "toast.hide_method"
        );
        assert_eq!(
            invalid_field("[toast]\nclose_easing = \"bouncy\""),
            "toast.close_easing"
        );
    }

    #[test]
    fn rejects_multi_word_container_class() {
        assert_eq!(
            invalid_field("[toast]\ncontainer_id = \"a b\""),
            "toast.container_id"
        );
    }

    #[test]
    fn rejects_zero_engine_settings() {
        assert_eq!(
            invalid_field("[engine]\ndedup_capacity = 0"),
            "engine.dedup_capacity"
        );
        assert_eq!(
            invalid_field("[engine]\nprogress_interval = 0"),
            "engine.progress_interval"
        );
    }

    #[test]
    fn default_raw_config_is_valid() {
        assert!(RawConfig::default().validate_and_build().is_ok());
    }
}
