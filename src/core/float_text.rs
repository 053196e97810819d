//! Serde helpers for `f64` fields that may be non-finite.
//!
//! serde_json writes infinities and NaN as `null`, which hides them and
//! cannot be read back. These helpers write them as the text `inf`, `-inf`
//! and `NaN` instead. Use with `#[serde(with = "crate::core::float_text")]`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

/// Text form of a non-finite value, `None` for finite ones
pub fn label(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("NaN")
    } else if value == f64::INFINITY {
        Some("inf")
    } else if value == f64::NEG_INFINITY {
        Some("-inf")
    } else {
        None
    }
}

pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    match label(*value) {
        Some(text) => serializer.serialize_str(text),
        None => serializer.serialize_f64(*value),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Repr {
    Number(f64),
    Text(String),
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Repr::deserialize(deserializer)? {
        Repr::Number(value) => Ok(value),
        Repr::Text(text) => match text.as_str() {
            "inf" => Ok(f64::INFINITY),
            "-inf" => Ok(f64::NEG_INFINITY),
            "NaN" => Ok(f64::NAN),
            other => Err(D::Error::custom(format!("expected a number, inf, -inf or NaN, got {:?}", other))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "crate::core::float_text")]
        value: f64,
    }

    #[test]
    fn test_labels() {
        assert_eq!(label(f64::INFINITY), Some("inf"));
        assert_eq!(label(f64::NEG_INFINITY), Some("-inf"));
        assert_eq!(label(f64::NAN), Some("NaN"));
        assert_eq!(label(1.5), None);
    }

    #[test]
    fn test_non_finite_written_as_text() {
        let json = serde_json::to_string(&Wrapper { value: f64::INFINITY }).unwrap();
        assert_eq!(json, r#"{"value":"inf"}"#);

        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back.value, f64::INFINITY);

        let nan: Wrapper = serde_json::from_str(r#"{"value":"NaN"}"#).unwrap();
        assert!(nan.value.is_nan());
    }

    #[test]
    fn test_finite_stays_numeric() {
        let json = serde_json::to_string(&Wrapper { value: 1.1125 }).unwrap();
        assert_eq!(json, r#"{"value":1.1125}"#);
        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back.value, 1.1125);
    }

    #[test]
    fn test_rejects_unknown_text() {
        assert!(serde_json::from_str::<Wrapper>(r#"{"value":"infinity"}"#).is_err());
        assert!(serde_json::from_str::<Wrapper>(r#"{"value":null}"#).is_err());
    }
}
