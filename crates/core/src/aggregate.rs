//! Folding rules for each aggregation kind.

use std::cmp::Ordering;

use tally_types::Value;

use crate::definition::AggregationKind;

impl AggregationKind {
    /// The value a fresh accumulator starts from. Count and Sum start at
    /// zero; Min and Max have no value until the first contribution.
    pub fn identity(self) -> Value {
        match self {
            AggregationKind::Count | AggregationKind::Sum => Value::Integer(0),
            AggregationKind::Min | AggregationKind::Max => Value::Null,
        }
    }

    /// Folds one contribution into `acc`. A `Null` contribution leaves the
    /// accumulator unchanged, and so does a value the kind cannot fold.
    pub fn combine(self, acc: &Value, contribution: &Value) -> Value {
        if contribution.is_null() {
            return acc.clone();
        }
        match self {
            AggregationKind::Count => acc
                .checked_add(&Value::Integer(1))
                .unwrap_or(Value::Integer(1)),
            AggregationKind::Sum => {
                if !contribution.is_numeric() {
                    return acc.clone();
                }
                acc.checked_add(contribution).unwrap_or_else(|| acc.clone())
            }
            AggregationKind::Min => pick(acc, contribution, Ordering::Less),
            AggregationKind::Max => pick(acc, contribution, Ordering::Greater),
        }
    }
}

/// Keeps `candidate` if it compares as `wanted` against `acc`. Values that
/// are neither numeric nor text cannot be ordered and are skipped.
fn pick(acc: &Value, candidate: &Value, wanted: Ordering) -> Value {
    if !candidate.is_numeric() && !matches!(candidate, Value::Text(_)) {
        return acc.clone();
    }
    if acc.is_null() {
        return candidate.clone();
    }
    let ordering = match (acc, candidate) {
        (Value::Text(a), Value::Text(b)) => Some(b.as_ref().cmp(a.as_ref())),
        _ => candidate.numeric_cmp(acc),
    };
    match ordering {
        Some(o) if o == wanted => candidate.clone(),
        _ => acc.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold(kind: AggregationKind, values: &[Value]) -> Value {
        values
            .iter()
            .fold(kind.identity(), |acc, v| kind.combine(&acc, v))
    }

    #[test]
    fn identity_is_neutral() {
        for kind in [
            AggregationKind::Sum,
            AggregationKind::Min,
            AggregationKind::Max,
        ] {
            assert_eq!(kind.combine(&kind.identity(), &Value::from(7)), Value::from(7));
        }
        assert_eq!(
            AggregationKind::Count.combine(&AggregationKind::Count.identity(), &Value::from(7)),
            Value::from(1)
        );
    }

    #[test]
    fn count_ignores_nulls() {
        let values = [Value::from(true), Value::Null, Value::from("x")];
        assert_eq!(fold(AggregationKind::Count, &values), Value::from(2));
        assert_eq!(fold(AggregationKind::Count, &[]), Value::from(0));
    }

    #[test]
    fn sum_without_values_is_zero() {
        assert_eq!(fold(AggregationKind::Sum, &[Value::Null]), Value::from(0));
        assert_eq!(fold(AggregationKind::Sum, &[]), Value::from(0));
        assert_eq!(
            fold(AggregationKind::Sum, &[Value::from(2), Value::Null, Value::from(1.5)]),
            Value::from(3.5)
        );
    }

    #[test]
    fn sum_skips_text() {
        assert_eq!(
            fold(AggregationKind::Sum, &[Value::from(2), Value::from("n/a")]),
            Value::from(2)
        );
    }

    #[test]
    fn min_and_max() {
        let values = [Value::from(4), Value::from(-1.5), Value::Null, Value::from(9)];
        assert_eq!(fold(AggregationKind::Min, &values), Value::from(-1.5));
        assert_eq!(fold(AggregationKind::Max, &values), Value::from(9));

        let names = [Value::from("pear"), Value::from("apple")];
        assert_eq!(fold(AggregationKind::Min, &names), Value::from("apple"));
    }

    #[test]
    fn min_and_max_skip_unordered_values() {
        let values = [Value::from(true), Value::from(3), Value::from(1)];
        assert_eq!(fold(AggregationKind::Min, &values), Value::from(1));
        assert_eq!(fold(AggregationKind::Max, &values), Value::from(3));
        assert_eq!(fold(AggregationKind::Max, &[Value::from(false)]), Value::Null);
    }
}
