// ── Snapshot ──
//
// The flat, keyed view of one refresh cycle. Consumers read fields by
// their stable key (`"fanspeed"`, `"hashrate_5m"`, ...); the coordinator
// publishes a new snapshot as a whole, never field by field.

use std::collections::{BTreeMap, BTreeSet};
use std::collections::btree_map;
use std::fmt;

use heatctl_api::Payload;
use serde::Serialize;
use serde_json::{Number, Value};

use super::fields::FIELDS;
use super::readings::Readings;

/// A single snapshot value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SnapshotValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl SnapshotValue {
    /// Convert a JSON scalar. Arrays and objects are kept as compact JSON
    /// text; `null` has no snapshot representation.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => Some(Self::from_number(n)),
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => Some(Self::Text(value.to_string())),
        }
    }

    pub fn from_number(n: &Number) -> Self {
        n.as_i64()
            .map(Self::Int)
            .or_else(|| n.as_f64().map(Self::Float))
            .unwrap_or_else(|| Self::Text(n.to_string()))
    }

    /// Convert a response body, parsing numeric text bodies into numbers.
    pub fn from_payload(payload: Payload) -> Self {
        match payload {
            Payload::Json(value) => {
                Self::from_json(&value).unwrap_or_else(|| Self::Text(String::new()))
            }
            Payload::Text(text) => Self::parse_text(text),
        }
    }

    fn parse_text(text: String) -> Self {
        let trimmed = text.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            Self::Int(i)
        } else if let Ok(f) = trimmed.parse::<f64>() {
            Self::Float(f)
        } else {
            Self::Text(text)
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bool(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for SnapshotValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for SnapshotValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for SnapshotValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for SnapshotValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<String> for SnapshotValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for SnapshotValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

/// Keyed field values from one refresh cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    fields: BTreeMap<String, SnapshotValue>,
    /// Keys held over from an earlier cycle rather than read this one.
    #[serde(skip)]
    carried: BTreeSet<String>,
}

impl Snapshot {
    /// Project typed readings onto the field table.
    ///
    /// Fields whose source was absent this cycle (summary sections that
    /// only exist while the control loop runs) are left out.
    pub fn from_readings(readings: &Readings) -> Self {
        FIELDS
            .iter()
            .filter_map(|spec| spec.extract(readings).map(|v| (spec.key.to_owned(), v)))
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&SnapshotValue> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, SnapshotValue> {
        self.fields.iter()
    }

    /// Whether `key` holds a value from an earlier cycle.
    pub fn is_carried(&self, key: &str) -> bool {
        self.carried.contains(key)
    }

    /// The derived `status_running` flag of this snapshot.
    pub fn status_running(&self) -> bool {
        self.get("status_running")
            .and_then(SnapshotValue::as_bool)
            .unwrap_or(false)
    }

    /// Fill keys missing from this snapshot with the values `previous`
    /// held, so the field set never shrinks. Filled keys are marked
    /// carried and never count as current.
    pub(crate) fn carry_forward(mut self, previous: &Self) -> Self {
        for (key, value) in &previous.fields {
            if !self.fields.contains_key(key) {
                self.fields.insert(key.clone(), value.clone());
                self.carried.insert(key.clone());
            }
        }
        self
    }
}

impl FromIterator<(String, SnapshotValue)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, SnapshotValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
            carried: BTreeSet::new(),
        }
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = (&'a String, &'a SnapshotValue);
    type IntoIter = btree_map::Iter<'a, String, SnapshotValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn json_scalars_convert() {
        assert_eq!(SnapshotValue::from_json(&json!(3)), Some(SnapshotValue::Int(3)));
        assert_eq!(
            SnapshotValue::from_json(&json!(2.5)),
            Some(SnapshotValue::Float(2.5))
        );
        assert_eq!(
            SnapshotValue::from_json(&json!("ok")),
            Some(SnapshotValue::Text("ok".into()))
        );
        assert_eq!(SnapshotValue::from_json(&json!(null)), None);
        assert_eq!(
            SnapshotValue::from_json(&json!(["a", 1])),
            Some(SnapshotValue::Text("[\"a\",1]".into()))
        );
    }

    #[test]
    fn text_payloads_parse_numbers() {
        assert_eq!(
            SnapshotValue::from_payload(Payload::Text(" 2 ".into())),
            SnapshotValue::Int(2)
        );
        assert_eq!(
            SnapshotValue::from_payload(Payload::Text("1.5".into())),
            SnapshotValue::Float(1.5)
        );
        assert_eq!(
            SnapshotValue::from_payload(Payload::Text("eco".into())),
            SnapshotValue::Text("eco".into())
        );
    }

    #[test]
    fn carry_forward_keeps_new_values() {
        let previous: Snapshot = [
            ("fanspeed".to_owned(), SnapshotValue::Int(1000)),
            ("hashrate_5s".to_owned(), SnapshotValue::Float(80.0)),
        ]
        .into_iter()
        .collect();
        let current: Snapshot = [("fanspeed".to_owned(), SnapshotValue::Int(1200))]
            .into_iter()
            .collect();

        let merged = current.carry_forward(&previous);
        assert_eq!(merged.get("fanspeed"), Some(&SnapshotValue::Int(1200)));
        assert_eq!(merged.get("hashrate_5s"), Some(&SnapshotValue::Float(80.0)));
        assert_eq!(merged.len(), 2);
        assert!(!merged.is_carried("fanspeed"));
        assert!(merged.is_carried("hashrate_5s"));
    }

    #[test]
    fn carried_mark_clears_once_read_again() {
        let first: Snapshot = [
            ("fanspeed".to_owned(), SnapshotValue::Int(1000)),
            ("hashrate_5s".to_owned(), SnapshotValue::Float(80.0)),
        ]
        .into_iter()
        .collect();
        let second: Snapshot = [("fanspeed".to_owned(), SnapshotValue::Int(1100))]
            .into_iter()
            .collect::<Snapshot>()
            .carry_forward(&first);
        let third: Snapshot = [("hashrate_5s".to_owned(), SnapshotValue::Float(82.0))]
            .into_iter()
            .collect::<Snapshot>()
            .carry_forward(&second);

        assert!(!third.is_carried("hashrate_5s"));
        assert!(third.is_carried("fanspeed"));
        assert_eq!(third.get("fanspeed"), Some(&SnapshotValue::Int(1100)));
    }

    #[test]
    fn serializes_as_flat_object() {
        let snapshot: Snapshot = [
            ("status".to_owned(), SnapshotValue::Bool(true)),
            ("network_quality".to_owned(), SnapshotValue::from("40/70")),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            serde_json::to_value(&snapshot).unwrap(),
            json!({ "status": true, "network_quality": "40/70" })
        );
    }
}
