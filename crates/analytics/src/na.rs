use core_types::NaStrategy;
use rust_decimal::Decimal;

/// Applies `strategy` to `(key, value)` rows before aggregation.
///
/// `Keep` returns the rows untouched, `Zero` fills missing values with zero,
/// `Drop` removes rows whose value is missing.
pub fn apply<K>(strategy: NaStrategy, rows: Vec<(K, Option<Decimal>)>) -> Vec<(K, Option<Decimal>)> {
    match strategy {
        NaStrategy::Keep => rows,
        NaStrategy::Zero => rows
            .into_iter()
            .map(|(key, value)| (key, Some(value.unwrap_or(Decimal::ZERO))))
            .collect(),
        NaStrategy::Drop => rows.into_iter().filter(|(_, value)| value.is_some()).collect(),
    }
}

/// Applies `strategy` to a bare series and returns its values, or `None` if any value
/// is still missing afterwards.
pub fn complete_values(strategy: NaStrategy, values: &[Option<Decimal>]) -> Option<Vec<Decimal>> {
    let rows: Vec<((), Option<Decimal>)> = values.iter().map(|v| ((), *v)).collect();
    apply(strategy, rows).into_iter().map(|(_, v)| v).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn series() -> Vec<Option<Decimal>> {
        vec![Some(dec!(0.01)), None, Some(dec!(0.03))]
    }

    #[test]
    fn drop_removes_exactly_the_missing_row() {
        assert_eq!(
            complete_values(NaStrategy::Drop, &series()),
            Some(vec![dec!(0.01), dec!(0.03)])
        );
    }

    #[test]
    fn zero_keeps_the_row_with_zero() {
        assert_eq!(
            complete_values(NaStrategy::Zero, &series()),
            Some(vec![dec!(0.01), dec!(0), dec!(0.03)])
        );
    }

    #[test]
    fn keep_reports_not_available() {
        assert_eq!(complete_values(NaStrategy::Keep, &series()), None);
        assert_eq!(
            complete_values(NaStrategy::Keep, &[Some(dec!(0.02))]),
            Some(vec![dec!(0.02)])
        );
    }

    #[test]
    fn apply_keeps_keys_aligned() {
        let rows = vec![("NA", Some(dec!(0.1))), ("EM Asia", None)];
        assert_eq!(apply(NaStrategy::Drop, rows.clone()), vec![("NA", Some(dec!(0.1)))]);
        assert_eq!(
            apply(NaStrategy::Zero, rows),
            vec![("NA", Some(dec!(0.1))), ("EM Asia", Some(dec!(0)))]
        );
    }
}
