use super::{EffectiveOptions, Options, OptionsOverride};

/// Copy each set override field over the defaults.
macro_rules! overlay {
    ($options:ident, $overrides:ident; $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = &$overrides.$field {
                $options.$field = value.clone();
            }
        )+
    };
}

/// Merge process defaults with one call's overrides, key by key.
///
/// No value is checked here: a nonsensical override shows up as odd visuals,
/// never as an error.
#[must_use]
pub fn resolve(defaults: &Options, overrides: Option<&OptionsOverride>) -> EffectiveOptions {
    let mut options = defaults.clone();
    let Some(overrides) = overrides else {
        return options;
    };

    overlay!(options, overrides;
        tap_to_dismiss,
        toast_class,
        container_id,
        debug,
        show_method,
        show_duration,
        show_easing,
        hide_method,
        hide_duration,
        hide_easing,
        extended_time_out,
        position_class,
        time_out,
        title_class,
        message_class,
        escape_html,
        target,
        close_html,
        close_button,
        newest_on_top,
        prevent_duplicates,
        progress_bar,
    );

    if overrides.close_method.is_some() {
        options.close_method = overrides.close_method;
    }
    if overrides.close_duration.is_some() {
        options.close_duration = overrides.close_duration;
    }
    if overrides.close_easing.is_some() {
        options.close_easing = overrides.close_easing;
    }
    if overrides.on_shown.is_some() {
        options.on_shown.clone_from(&overrides.on_shown);
    }
    if overrides.on_click.is_some() {
        options.on_click.clone_from(&overrides.on_click);
    }

    options
}
