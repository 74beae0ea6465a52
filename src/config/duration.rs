use std::time::Duration;

use humantime::{format_duration, parse_duration};
use serde::Deserialize;
use serde_with::{DeserializeAs, SerializeAs};

/// Duration written either as integer milliseconds (`300`) or as a humantime
/// string (`"300ms"`, `"5s"`). Negative millisecond counts read as zero.
pub struct HumantimeDuration;

#[derive(Deserialize)]
#[serde(untagged)]
enum Written {
    Millis(u64),
    Signed(i64),
    Text(String),
}

pub(super) fn parse_text(raw: &str) -> Result<Duration, String> {
    let raw = raw.trim();
    if let Ok(millis) = raw.parse::<i64>() {
        return Ok(Duration::from_millis(millis.max(0).unsigned_abs()));
    }
    parse_duration(raw).map_err(|err| err.to_string())
}

impl<'de> DeserializeAs<'de, Duration> for HumantimeDuration {
    fn deserialize_as<D>(deserializer: D) -> std::result::Result<Duration, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match Written::deserialize(deserializer)? {
            Written::Millis(millis) => Ok(Duration::from_millis(millis)),
            Written::Signed(millis) => Ok(Duration::from_millis(millis.max(0).unsigned_abs())),
            Written::Text(raw) => parse_text(&raw).map_err(serde::de::Error::custom),
        }
    }
}

impl SerializeAs<Duration> for HumantimeDuration {
    fn serialize_as<S>(value: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format_duration(*value).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::HumantimeDuration;
    use serde::Deserialize;
    use serde_with::serde_as;
    use std::time::Duration;

    #[serde_as]
    #[derive(Deserialize)]
    struct Sample {
        #[serde_as(as = "Option<HumantimeDuration>")]
        duration: Option<Duration>,
    }

    fn parse(json: &str) -> Option<Duration> {
        match serde_json::from_str::<Sample>(json) {
            Ok(sample) => sample.duration,
            Err(err) => panic!("failed to parse sample json {json}: {err}"),
        }
    }

    #[test]
    fn accepts_strings_and_millis() {
        assert_eq!(parse(r#"{"duration":"5s"}"#), Some(Duration::from_secs(5)));
        assert_eq!(parse(r#"{"duration":"250"}"#), Some(Duration::from_millis(250)));
        assert_eq!(parse(r#"{"duration":1500}"#), Some(Duration::from_millis(1_500)));
        assert_eq!(parse(r#"{"duration":null}"#), None);
    }

    #[test]
    fn negative_millis_mean_zero() {
        assert_eq!(parse(r#"{"duration":-1}"#), Some(Duration::ZERO));
    }

    #[test]
    fn rejects_garbage() {
        assert!(serde_json::from_str::<Sample>(r#"{"duration":"soon"}"#).is_err());
    }
}
