//! Serde adapter for [`Duration`] fields, written as fractional milliseconds.
//!
//! ```ignore
//! #[serde(with = "crate::core::duration_ms")]
//! pub latency: Duration,
//! ```

use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64() * 1000.0)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let millis = f64::deserialize(deserializer)?;
    if !millis.is_finite() || millis < 0.0 {
        return Err(serde::de::Error::custom(format!(
            "invalid duration in milliseconds: {}",
            millis
        )));
    }
    Ok(Duration::from_secs_f64(millis / 1000.0))
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Serialize, Deserialize)]
    struct Timed {
        #[serde(with = "super")]
        latency: Duration,
    }

    #[test]
    fn writes_milliseconds() {
        let json = serde_json::to_string(&Timed {
            latency: Duration::from_millis(250),
        })
        .unwrap();
        assert_eq!(json, r#"{"latency":250.0}"#);
    }

    #[test]
    fn rejects_negative() {
        let parsed: Result<Timed, _> = serde_json::from_str(r#"{"latency":-1.0}"#);
        assert!(parsed.is_err());
    }
}
