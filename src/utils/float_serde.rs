//! JSON keeps only finite numbers, so infinite and undefined values are
//! written as the strings `"inf"`, `"-inf"` and `"NaN"` instead of `null`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else if value.is_nan() {
        serializer.serialize_str("NaN")
    } else if *value > 0.0 {
        serializer.serialize_str("inf")
    } else {
        serializer.serialize_str("-inf")
    }
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Label(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Number(value) => Ok(value),
        Repr::Label(label) => match label.as_str() {
            "NaN" => Ok(f64::NAN),
            "inf" => Ok(f64::INFINITY),
            "-inf" => Ok(f64::NEG_INFINITY),
            other => Err(D::Error::custom(format!("invalid number '{}'", other))),
        },
    }
}

pub fn serialize_option<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(value) => serializer.serialize_some(&Labelled(*value)),
        None => serializer.serialize_none(),
    }
}

pub fn serialize_map<S: Serializer>(
    map: &BTreeMap<i64, f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(map.iter().map(|(key, value)| (key, Labelled(*value))))
}

struct Labelled(f64);

impl Serialize for Labelled {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize(&self.0, serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize)]
    struct Sample {
        #[serde(with = "super")]
        value: f64,
        #[serde(serialize_with = "serialize_option", skip_deserializing)]
        fill: Option<f64>,
    }

    #[test]
    fn test_labels_for_non_finite_values() {
        let json = |value| {
            serde_json::to_string(&Sample { value, fill: None }).unwrap()
        };
        assert_eq!(json(1.5), r#"{"value":1.5,"fill":null}"#);
        assert_eq!(json(f64::INFINITY), r#"{"value":"inf","fill":null}"#);
        assert_eq!(json(f64::NEG_INFINITY), r#"{"value":"-inf","fill":null}"#);
        assert_eq!(json(f64::NAN), r#"{"value":"NaN","fill":null}"#);
    }

    #[test]
    fn test_labels_are_read_back() {
        let sample: Sample = serde_json::from_str(r#"{"value":"-inf"}"#).unwrap();
        assert_eq!(sample.value, f64::NEG_INFINITY);
        let sample: Sample = serde_json::from_str(r#"{"value":"NaN"}"#).unwrap();
        assert!(sample.value.is_nan());
        assert!(serde_json::from_str::<Sample>(r#"{"value":"fast"}"#).is_err());
    }

    #[test]
    fn test_map_and_option() {
        let map = BTreeMap::from([(8, 20.0), (9, f64::INFINITY)]);
        let mut out = Vec::new();
        serialize_map(&map, &mut serde_json::Serializer::new(&mut out)).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), r#"{"8":20.0,"9":"inf"}"#);

        let json = serde_json::to_string(&Sample {
            value: 0.0,
            fill: Some(f64::NAN),
        })
        .unwrap();
        assert!(json.contains(r#""fill":"NaN""#));
    }
}
