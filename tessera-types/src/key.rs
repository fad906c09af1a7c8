//! Key-type registry and typed key literals.
//!
//! Every key column of a dataset declares one of the [`KeyType`] tags.
//! Filter values arrive as [`KeyValue`] literals whose concrete type is not
//! known until the column is resolved; [`KeyType::parse_single`] performs
//! that coercion and is the single place where a literal is checked against
//! a key column.

use std::cmp::Ordering;

use tessera_result::{Error, Result};

/// Tag identifying the encoding of one key field.
///
/// The registry is closed: partition-key and row-key columns must carry one
/// of these tags. `Composite` nests an ordered tuple of further key types
/// and exists for callers that encode multi-part values into a single
/// field; the projection layer itself always works with flat per-column
/// schemas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyType {
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// UTF-8 string.
    Utf8,
    /// Millisecond timestamp, ordered as a 64-bit signed integer.
    Timestamp,
    /// Ordered tuple of nested key types.
    Composite(Vec<KeyType>),
}

impl KeyType {
    /// Stable name used in error messages and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            KeyType::Int => "int",
            KeyType::Long => "long",
            KeyType::Utf8 => "string",
            KeyType::Timestamp => "timestamp",
            KeyType::Composite(_) => "composite",
        }
    }

    /// Coerce one literal into this key type.
    ///
    /// Integer literals widen losslessly (`Int` → `Long`/`Timestamp`);
    /// narrowing is accepted only when the value fits. Anything else is a
    /// [`Error::KeyParse`].
    pub fn parse_single(&self, value: &KeyValue) -> Result<KeyValue> {
        match (self, value) {
            (KeyType::Int, KeyValue::Int(v)) => Ok(KeyValue::Int(*v)),
            (KeyType::Int, KeyValue::Long(v)) => i32::try_from(*v)
                .map(KeyValue::Int)
                .map_err(|_| self.parse_error(value)),
            (KeyType::Long, KeyValue::Int(v)) => Ok(KeyValue::Long(i64::from(*v))),
            (KeyType::Long, KeyValue::Long(v)) => Ok(KeyValue::Long(*v)),
            (KeyType::Utf8, KeyValue::Utf8(s)) => Ok(KeyValue::Utf8(s.clone())),
            (KeyType::Timestamp, KeyValue::Timestamp(v)) => Ok(KeyValue::Timestamp(*v)),
            (KeyType::Timestamp, KeyValue::Long(v)) => Ok(KeyValue::Timestamp(*v)),
            (KeyType::Timestamp, KeyValue::Int(v)) => Ok(KeyValue::Timestamp(i64::from(*v))),
            (KeyType::Composite(parts), KeyValue::Composite(values)) => {
                if parts.len() != values.len() {
                    return Err(self.parse_error(value));
                }
                let parsed = parts
                    .iter()
                    .zip(values)
                    .map(|(ty, v)| ty.parse_single(v))
                    .collect::<Result<Vec<_>>>()?;
                Ok(KeyValue::Composite(parsed))
            }
            _ => Err(self.parse_error(value)),
        }
    }

    /// Set form of [`parse_single`](KeyType::parse_single); fails on the
    /// first literal that does not coerce.
    pub fn parse_values(&self, values: &[KeyValue]) -> Result<Vec<KeyValue>> {
        values.iter().map(|v| self.parse_single(v)).collect()
    }

    /// Total order over values of this key type.
    ///
    /// Both operands must already be normalized via
    /// [`parse_single`](KeyType::parse_single); mixed variants fall back to
    /// a stable cross-variant order so the comparison stays total.
    pub fn compare(&self, a: &KeyValue, b: &KeyValue) -> Ordering {
        a.cmp(b)
    }

    fn parse_error(&self, value: &KeyValue) -> Error {
        Error::KeyParse {
            expected: self.name(),
            value: format!("{value:?}"),
        }
    }
}

/// A typed key literal.
///
/// Produced by filter expressions and by callers building partition or row
/// keys. Comparison is total: same-variant values compare natively and
/// cross-variant values order by variant tag, which keeps ordered
/// containers well-defined even before type coercion has run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyValue {
    Int(i32),
    Long(i64),
    Utf8(String),
    Timestamp(i64),
    Composite(Vec<KeyValue>),
}

impl KeyValue {
    fn variant_rank(&self) -> u8 {
        match self {
            KeyValue::Int(_) => 0,
            KeyValue::Long(_) => 1,
            KeyValue::Utf8(_) => 2,
            KeyValue::Timestamp(_) => 3,
            KeyValue::Composite(_) => 4,
        }
    }
}

impl Ord for KeyValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (KeyValue::Int(a), KeyValue::Int(b)) => a.cmp(b),
            (KeyValue::Long(a), KeyValue::Long(b)) => a.cmp(b),
            (KeyValue::Utf8(a), KeyValue::Utf8(b)) => a.cmp(b),
            (KeyValue::Timestamp(a), KeyValue::Timestamp(b)) => a.cmp(b),
            (KeyValue::Composite(a), KeyValue::Composite(b)) => a.cmp(b),
            _ => self.variant_rank().cmp(&other.variant_rank()),
        }
    }
}

impl PartialOrd for KeyValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<i32> for KeyValue {
    fn from(v: i32) -> Self {
        KeyValue::Int(v)
    }
}

impl From<i64> for KeyValue {
    fn from(v: i64) -> Self {
        KeyValue::Long(v)
    }
}

impl From<&str> for KeyValue {
    fn from(v: &str) -> Self {
        KeyValue::Utf8(v.to_string())
    }
}

impl From<String> for KeyValue {
    fn from(v: String) -> Self {
        KeyValue::Utf8(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_widens_to_long_and_timestamp() {
        assert_eq!(
            KeyType::Long.parse_single(&KeyValue::Int(7)).unwrap(),
            KeyValue::Long(7)
        );
        assert_eq!(
            KeyType::Timestamp.parse_single(&KeyValue::Int(7)).unwrap(),
            KeyValue::Timestamp(7)
        );
    }

    #[test]
    fn long_narrows_only_in_range() {
        assert_eq!(
            KeyType::Int.parse_single(&KeyValue::Long(41)).unwrap(),
            KeyValue::Int(41)
        );
        let err = KeyType::Int
            .parse_single(&KeyValue::Long(i64::MAX))
            .unwrap_err();
        assert!(matches!(err, Error::KeyParse { expected: "int", .. }));
    }

    #[test]
    fn string_rejects_numeric_literals() {
        assert!(KeyType::Utf8.parse_single(&KeyValue::Int(1)).is_err());
        assert!(KeyType::Utf8.parse_single(&"ok".into()).is_ok());
    }

    #[test]
    fn composite_parses_elementwise() {
        let ty = KeyType::Composite(vec![KeyType::Int, KeyType::Utf8]);
        let parsed = ty
            .parse_single(&KeyValue::Composite(vec![
                KeyValue::Long(3),
                "x".into(),
            ]))
            .unwrap();
        assert_eq!(
            parsed,
            KeyValue::Composite(vec![KeyValue::Int(3), "x".into()])
        );
        // Arity mismatch is a parse error, not a silent truncation.
        assert!(
            ty.parse_single(&KeyValue::Composite(vec![KeyValue::Int(3)]))
                .is_err()
        );
    }

    #[test]
    fn parse_values_fails_fast() {
        let vals = vec![KeyValue::Int(1), "no".into(), KeyValue::Int(2)];
        assert!(KeyType::Int.parse_values(&vals).is_err());
    }
}
