//! The closed filter surface consumed by the scan planner.
//!
//! Filters arrive as a flat conjunctive list; there are no boolean
//! connectives. The planner groups them by column name and decides per
//! key-column role what is pushable.

use tessera_types::KeyValue;

/// Single predicate against a named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub op: Operator,
}

impl Filter {
    pub fn new(column: impl Into<String>, op: Operator) -> Self {
        Self {
            column: column.into(),
            op,
        }
    }

    /// Equality filter.
    #[inline]
    pub fn eq(column: impl Into<String>, value: impl Into<KeyValue>) -> Self {
        Self::new(column, Operator::Eq(value.into()))
    }

    /// Set-membership filter.
    #[inline]
    pub fn in_set<V: Into<KeyValue>>(
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::new(
            column,
            Operator::In(values.into_iter().map(Into::into).collect()),
        )
    }

    #[inline]
    pub fn gt(column: impl Into<String>, value: impl Into<KeyValue>) -> Self {
        Self::new(column, Operator::Gt(value.into()))
    }

    #[inline]
    pub fn gte(column: impl Into<String>, value: impl Into<KeyValue>) -> Self {
        Self::new(column, Operator::Gte(value.into()))
    }

    #[inline]
    pub fn lt(column: impl Into<String>, value: impl Into<KeyValue>) -> Self {
        Self::new(column, Operator::Lt(value.into()))
    }

    #[inline]
    pub fn lte(column: impl Into<String>, value: impl Into<KeyValue>) -> Self {
        Self::new(column, Operator::Lte(value.into()))
    }
}

/// Comparison operators over typed key literals.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    Eq(KeyValue),
    In(Vec<KeyValue>),
    Gt(KeyValue),
    Gte(KeyValue),
    Lt(KeyValue),
    Lte(KeyValue),
}

impl Operator {
    /// Stable operator name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Eq(_) => "=",
            Operator::In(_) => "IN",
            Operator::Gt(_) => ">",
            Operator::Gte(_) => ">=",
            Operator::Lt(_) => "<",
            Operator::Lte(_) => "<=",
        }
    }

    /// True for the lower-bound operators of a paired range.
    #[inline]
    pub fn is_lower_bound(&self) -> bool {
        matches!(self, Operator::Gt(_) | Operator::Gte(_))
    }

    /// True for the upper-bound operators of a paired range.
    #[inline]
    pub fn is_upper_bound(&self) -> bool {
        matches!(self, Operator::Lt(_) | Operator::Lte(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_build_expected_shapes() {
        let f = Filter::eq("year", 1979);
        assert_eq!(f.column, "year");
        assert_eq!(f.op, Operator::Eq(KeyValue::Int(1979)));

        let f = Filter::in_set("actor2Code", ["AGR", "CHN"]);
        match f.op {
            Operator::In(ref vs) => assert_eq!(vs.len(), 2),
            _ => panic!("expected In"),
        }
    }

    #[test]
    fn bound_classification() {
        assert!(Filter::gt("m", 3).op.is_lower_bound());
        assert!(Filter::gte("m", 3).op.is_lower_bound());
        assert!(Filter::lte("m", 9).op.is_upper_bound());
        assert!(!Filter::eq("m", 9).op.is_upper_bound());
    }
}
