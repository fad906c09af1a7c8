use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use bytes::Bytes;
use tessera_result::{Error, Result};
use tessera_types::{KeyType, KeyValue};

use crate::codec::{
    i32_from_sortable_bytes, i64_from_sortable_bytes, sortable_bytes_from_i32,
    sortable_bytes_from_i64,
};
use crate::schema::RecordSchema;

/// Immutable byte buffer encoding an ordered tuple of typed key fields.
///
/// Equality is byte equality. Ordering is field-aware lexicographic in
/// declared field order; records with different field counts compare over
/// the common prefix (range bounds are key prefixes), with equal prefixes
/// comparing equal so that `(key, chunk_id)` tiebreaking decides.
#[derive(Clone)]
pub struct BinaryRecord {
    schema: Arc<RecordSchema>,
    bytes: Bytes,
    /// Byte offset of each top-level field, plus the end offset.
    offsets: Vec<u32>,
}

impl BinaryRecord {
    /// Encode `values` against `schema`.
    ///
    /// Literals are coerced per field via [`KeyType::parse_single`]; an
    /// arity mismatch or uncoercible literal is an [`Error::Encoding`].
    pub fn encode(schema: &Arc<RecordSchema>, values: &[KeyValue]) -> Result<Self> {
        if values.len() != schema.len() {
            return Err(Error::encoding(format!(
                "expected {} key fields, got {}",
                schema.len(),
                values.len()
            )));
        }
        let mut buf = Vec::new();
        let mut offsets = Vec::with_capacity(schema.len() + 1);
        offsets.push(0);
        for (ty, value) in schema.fields().iter().zip(values) {
            let value = ty.parse_single(value).map_err(|e| match e {
                Error::KeyParse { expected, value } => Error::encoding(format!(
                    "field does not fit key type {expected}: {value}"
                )),
                other => other,
            })?;
            encode_field(ty, &value, &mut buf)?;
            offsets.push(buf.len() as u32);
        }
        Ok(Self {
            schema: Arc::clone(schema),
            bytes: Bytes::from(buf),
            offsets,
        })
    }

    /// Reconstruct a record from raw bytes previously produced by
    /// [`encode`](BinaryRecord::encode). Validates the layout.
    pub fn from_bytes(schema: &Arc<RecordSchema>, bytes: Bytes) -> Result<Self> {
        let mut offsets = Vec::with_capacity(schema.len() + 1);
        offsets.push(0);
        let mut pos = 0usize;
        for ty in schema.fields() {
            let width = field_width(ty, &bytes[pos..]).ok_or_else(|| {
                Error::encoding("record bytes truncated mid-field".to_string())
            })?;
            pos += width;
            if pos > bytes.len() {
                return Err(Error::encoding("record bytes truncated mid-field"));
            }
            offsets.push(pos as u32);
        }
        if pos != bytes.len() {
            return Err(Error::encoding(format!(
                "{} trailing bytes after last key field",
                bytes.len() - pos
            )));
        }
        Ok(Self {
            schema: Arc::clone(schema),
            bytes,
            offsets,
        })
    }

    #[inline]
    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn num_fields(&self) -> usize {
        self.schema.len()
    }

    fn field_bytes(&self, i: usize) -> &[u8] {
        &self.bytes[self.offsets[i] as usize..self.offsets[i + 1] as usize]
    }

    /// Decode field `i` back into a typed literal.
    pub fn field(&self, i: usize) -> Result<KeyValue> {
        let ty = self
            .schema
            .fields()
            .get(i)
            .ok_or_else(|| Error::invalid_argument(format!("no key field at position {i}")))?;
        decode_field(ty, self.field_bytes(i)).map(|(v, _)| v)
    }

    /// Decode all fields in declared order.
    pub fn values(&self) -> Result<Vec<KeyValue>> {
        (0..self.num_fields()).map(|i| self.field(i)).collect()
    }
}

impl PartialEq for BinaryRecord {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for BinaryRecord {}

impl Hash for BinaryRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl Ord for BinaryRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        let common = self.num_fields().min(other.num_fields());
        for i in 0..common {
            let ty = &self.schema.fields()[i];
            let ord = cmp_field(ty, self.field_bytes(i), other.field_bytes(i));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        // Prefix-equal records compare equal regardless of arity; the
        // unique chunk-id tiebreaker in composite container keys keeps
        // ordered maps well-defined.
        Ordering::Equal
    }
}

impl PartialOrd for BinaryRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for BinaryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.values() {
            Ok(values) => write!(f, "BinaryRecord{values:?}"),
            Err(_) => write!(f, "BinaryRecord(<{} bytes>)", self.bytes.len()),
        }
    }
}

fn encode_field(ty: &KeyType, value: &KeyValue, buf: &mut Vec<u8>) -> Result<()> {
    match (ty, value) {
        (KeyType::Int, KeyValue::Int(v)) => buf.extend_from_slice(&sortable_bytes_from_i32(*v)),
        (KeyType::Long, KeyValue::Long(v)) | (KeyType::Timestamp, KeyValue::Timestamp(v)) => {
            buf.extend_from_slice(&sortable_bytes_from_i64(*v))
        }
        (KeyType::Utf8, KeyValue::Utf8(s)) => {
            let len = u16::try_from(s.len()).map_err(|_| {
                Error::encoding(format!("string key field of {} bytes exceeds u16 length", s.len()))
            })?;
            buf.extend_from_slice(&len.to_be_bytes());
            buf.extend_from_slice(s.as_bytes());
        }
        (KeyType::Composite(parts), KeyValue::Composite(values)) => {
            for (part_ty, part) in parts.iter().zip(values) {
                encode_field(part_ty, part, buf)?;
            }
        }
        _ => {
            return Err(Error::encoding(format!(
                "value {value:?} does not match key type {}",
                ty.name()
            )));
        }
    }
    Ok(())
}

fn decode_field(ty: &KeyType, buf: &[u8]) -> Result<(KeyValue, usize)> {
    let truncated = || Error::encoding("record bytes truncated mid-field".to_string());
    match ty {
        KeyType::Int => {
            let raw: [u8; 4] = buf.get(..4).ok_or_else(truncated)?.try_into().expect("length checked");
            Ok((KeyValue::Int(i32_from_sortable_bytes(raw)), 4))
        }
        KeyType::Long | KeyType::Timestamp => {
            let raw: [u8; 8] = buf.get(..8).ok_or_else(truncated)?.try_into().expect("length checked");
            let v = i64_from_sortable_bytes(raw);
            let value = if matches!(ty, KeyType::Long) {
                KeyValue::Long(v)
            } else {
                KeyValue::Timestamp(v)
            };
            Ok((value, 8))
        }
        KeyType::Utf8 => {
            let raw: [u8; 2] = buf.get(..2).ok_or_else(truncated)?.try_into().expect("length checked");
            let len = u16::from_be_bytes(raw) as usize;
            let content = buf.get(2..2 + len).ok_or_else(truncated)?;
            let s = std::str::from_utf8(content)
                .map_err(|_| Error::encoding("string key field is not valid UTF-8"))?;
            Ok((KeyValue::Utf8(s.to_string()), 2 + len))
        }
        KeyType::Composite(parts) => {
            let mut values = Vec::with_capacity(parts.len());
            let mut pos = 0usize;
            for part_ty in parts {
                let (v, w) = decode_field(part_ty, &buf[pos..])?;
                values.push(v);
                pos += w;
            }
            Ok((KeyValue::Composite(values), pos))
        }
    }
}

/// Encoded width of the field at the head of `buf`, or `None` if truncated.
fn field_width(ty: &KeyType, buf: &[u8]) -> Option<usize> {
    match ty {
        KeyType::Int => (buf.len() >= 4).then_some(4),
        KeyType::Long | KeyType::Timestamp => (buf.len() >= 8).then_some(8),
        KeyType::Utf8 => {
            let raw: [u8; 2] = buf.get(..2)?.try_into().ok()?;
            let len = u16::from_be_bytes(raw) as usize;
            (buf.len() >= 2 + len).then_some(2 + len)
        }
        KeyType::Composite(parts) => {
            let mut pos = 0usize;
            for part_ty in parts {
                pos += field_width(part_ty, buf.get(pos..)?)?;
            }
            Some(pos)
        }
    }
}

/// Field-aware comparison of two encoded fields of the same type.
fn cmp_field(ty: &KeyType, a: &[u8], b: &[u8]) -> Ordering {
    match ty {
        // Fixed-width sortable encodings compare directly.
        KeyType::Int | KeyType::Long | KeyType::Timestamp => a.cmp(b),
        // Length prefix is excluded: "ab" < "b" holds despite the lengths.
        KeyType::Utf8 => a.get(2..).unwrap_or(&[]).cmp(b.get(2..).unwrap_or(&[])),
        KeyType::Composite(parts) => {
            let mut pa = 0usize;
            let mut pb = 0usize;
            for part_ty in parts {
                let (Some(wa), Some(wb)) = (
                    field_width(part_ty, &a[pa..]),
                    field_width(part_ty, &b[pb..]),
                ) else {
                    return a[pa..].cmp(&b[pb..]);
                };
                let ord = cmp_field(part_ty, &a[pa..pa + wa], &b[pb..pb + wb]);
                if ord != Ordering::Equal {
                    return ord;
                }
                pa += wa;
                pb += wb;
            }
            Ordering::Equal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(schema: &Arc<RecordSchema>, values: &[KeyValue]) -> BinaryRecord {
        BinaryRecord::encode(schema, values).unwrap()
    }

    #[test]
    fn numeric_ordering_spans_signs() {
        let schema = RecordSchema::new(vec![KeyType::Int]);
        let keys = [-5, -1, 0, 3, 1000];
        let records: Vec<_> = keys.iter().map(|v| rec(&schema, &[(*v).into()])).collect();
        for w in records.windows(2) {
            assert!(w[0] < w[1]);
        }
    }

    #[test]
    fn string_ordering_ignores_length_prefix() {
        let schema = RecordSchema::new(vec![KeyType::Utf8]);
        let ab = rec(&schema, &["ab".into()]);
        let b = rec(&schema, &["b".into()]);
        // Raw byte order would put "b" first (shorter length prefix wins);
        // the field-aware comparator must not.
        assert!(ab < b);
    }

    #[test]
    fn multi_field_order_is_declared_order() {
        let schema = RecordSchema::new(vec![KeyType::Int, KeyType::Int]);
        let a = rec(&schema, &[1979.into(), 3.into()]);
        let b = rec(&schema, &[1979.into(), 9.into()]);
        let c = rec(&schema, &[1980.into(), 1.into()]);
        assert!(a < b && b < c);
    }

    #[test]
    fn prefix_records_compare_over_common_fields() {
        let full = RecordSchema::new(vec![KeyType::Int, KeyType::Int, KeyType::Utf8]);
        let bound = full.prefix(2);
        let key = rec(&full, &[1979.into(), 9.into(), "zzz".into()]);
        let hi = rec(&bound, &[1979.into(), 9.into()]);
        let lo = rec(&bound, &[1979.into(), 3.into()]);
        assert_eq!(key.cmp(&hi), Ordering::Equal);
        assert!(key > lo);
    }

    #[test]
    fn round_trips_all_field_types() {
        let schema = RecordSchema::new(vec![
            KeyType::Int,
            KeyType::Long,
            KeyType::Utf8,
            KeyType::Timestamp,
        ]);
        let values = vec![
            KeyValue::Int(-7),
            KeyValue::Long(1 << 40),
            "actor".into(),
            KeyValue::Timestamp(1_234_567_890_123),
        ];
        let r = rec(&schema, &values);
        assert_eq!(r.values().unwrap(), values);

        let reparsed = BinaryRecord::from_bytes(&schema, Bytes::copy_from_slice(r.as_bytes()))
            .unwrap();
        assert_eq!(reparsed, r);
    }

    #[test]
    fn encode_rejects_arity_and_type_mismatches() {
        let schema = RecordSchema::new(vec![KeyType::Int, KeyType::Utf8]);
        assert!(matches!(
            BinaryRecord::encode(&schema, &[1.into()]),
            Err(Error::Encoding(_))
        ));
        assert!(matches!(
            BinaryRecord::encode(&schema, &["x".into(), "y".into()]),
            Err(Error::Encoding(_))
        ));
    }

    #[test]
    fn from_bytes_rejects_truncation_and_trailing_bytes() {
        let schema = RecordSchema::new(vec![KeyType::Long]);
        let r = rec(&schema, &[KeyValue::Long(9)]);
        let mut short = r.as_bytes().to_vec();
        short.pop();
        assert!(BinaryRecord::from_bytes(&schema, Bytes::from(short)).is_err());

        let mut long = r.as_bytes().to_vec();
        long.push(0);
        assert!(BinaryRecord::from_bytes(&schema, Bytes::from(long)).is_err());
    }

    #[test]
    fn composite_fields_flatten_in_order() {
        let schema = RecordSchema::new(vec![KeyType::Composite(vec![
            KeyType::Int,
            KeyType::Utf8,
        ])]);
        let a = rec(
            &schema,
            &[KeyValue::Composite(vec![1.into(), "a".into()])],
        );
        let b = rec(
            &schema,
            &[KeyValue::Composite(vec![1.into(), "b".into()])],
        );
        assert!(a < b);
        assert_eq!(
            a.field(0).unwrap(),
            KeyValue::Composite(vec![1.into(), "a".into()])
        );
    }
}
