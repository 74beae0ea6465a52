//! Named show/hide effects and the timing record the engine keeps for each one.
//!
//! The engine never interpolates anything itself; it only needs to know when an
//! effect ends and whether the element is on screen afterwards. Hosts that draw
//! toasts read [`Animation::progress`] to render the tween.

use std::f64::consts::PI;
use std::fmt::{self, Display};
use std::str::FromStr;
use std::time::Duration;

use serde_with::{DeserializeFromStr, SerializeDisplay};

#[derive(Clone, Copy, Debug, DeserializeFromStr, Eq, Hash, PartialEq, SerializeDisplay)]
pub enum AnimationMethod {
    FadeIn,
    FadeOut,
    SlideDown,
    SlideUp,
    Show,
    Hide,
}

impl AnimationMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FadeIn => "fadeIn",
            Self::FadeOut => "fadeOut",
            Self::SlideDown => "slideDown",
            Self::SlideUp => "slideUp",
            Self::Show => "show",
            Self::Hide => "hide",
        }
    }

    /// Whether the element is displayed once the effect has run.
    #[must_use]
    pub const fn reveals(self) -> bool {
        matches!(self, Self::FadeIn | Self::SlideDown | Self::Show)
    }
}

impl Display for AnimationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnimationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "fadein" => Ok(Self::FadeIn),
            "fadeout" => Ok(Self::FadeOut),
            "slidedown" => Ok(Self::SlideDown),
            "slideup" => Ok(Self::SlideUp),
            "show" => Ok(Self::Show),
            "hide" => Ok(Self::Hide),
            _ => Err(format!("unknown animation method: {s}")),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, DeserializeFromStr, Eq, Hash, PartialEq, SerializeDisplay)]
pub enum Easing {
    #[default]
    Swing,
    Linear,
}

impl Easing {
    /// Map linear time progress (0.0 to 1.0) onto the curve.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Swing => 0.5 - (t * PI).cos() / 2.0,
        }
    }
}

impl Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Swing => "swing",
            Self::Linear => "linear",
        })
    }
}

impl FromStr for Easing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "swing" => Ok(Self::Swing),
            "linear" => Ok(Self::Linear),
            _ => Err(format!("unknown easing: {s}")),
        }
    }
}

fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// One running effect on a toast element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Animation {
    pub method: AnimationMethod,
    pub easing: Easing,
    pub duration: Duration,
    pub started_at: Duration,
}

impl Animation {
    /// Saturates at [`Duration::MAX`].
    #[must_use]
    pub fn ends_at(&self) -> Duration {
        self.started_at.saturating_add(self.duration)
    }

    /// Eased completion fraction at `now`.
    #[must_use]
    pub fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        self.easing
            .apply(elapsed.as_secs_f64() / self.duration.as_secs_f64())
    }
}
