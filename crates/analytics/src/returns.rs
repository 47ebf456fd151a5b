use crate::error::AnalyticsError;
use crate::na;
use crate::report::{RangeReturns, WindowReturns};
use chrono::{Duration, NaiveDate};
use core_types::{NaStrategy, Table};
use rust_decimal::Decimal;

/// The columns of a returns table that hold the date and the two return series.
#[derive(Debug, Clone, Copy)]
pub struct SeriesColumns<'a> {
    pub date: &'a str,
    pub fund: &'a str,
    pub benchmark: &'a str,
}

/// Compounds daily fractional returns: Π(1 + vᵢ) − 1.
///
/// This is the raw cumulative return over the whole period, not a per-period
/// geometric mean. An empty series compounds to zero. Returns `None` if the product
/// leaves the range of `Decimal`.
pub fn geometric_cumulative_return(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return Some(Decimal::ZERO);
    }
    let growth = values.iter().try_fold(Decimal::ONE, |acc, v| {
        Decimal::ONE.checked_add(*v).and_then(|factor| acc.checked_mul(factor))
    })?;
    growth.checked_sub(Decimal::ONE)
}

/// Cumulative returns and alpha over `start..=end`, both ends inclusive.
///
/// A range that selects no rows yields zeros rather than an error.
pub fn compute_range(
    table: &Table,
    columns: SeriesColumns<'_>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<RangeReturns, AnalyticsError> {
    let dates = table.dates(columns.date)?;
    let fund = table.numbers(columns.fund)?;
    let benchmark = table.numbers(columns.benchmark)?;

    let selected: Vec<usize> = dates
        .iter()
        .enumerate()
        .filter(|(_, d)| start <= **d && **d <= end)
        .map(|(i, _)| i)
        .collect();

    if selected.is_empty() {
        tracing::debug!(%start, %end, "No returns in range.");
        return Ok(RangeReturns::zero());
    }

    let fund_geom = compound(columns.fund, &require_complete(columns.fund, &fund, &selected)?)?;
    let benchmark_geom = compound(
        columns.benchmark,
        &require_complete(columns.benchmark, &benchmark, &selected)?,
    )?;
    let alpha = fund_geom
        .checked_sub(benchmark_geom)
        .ok_or_else(|| AnalyticsError::Overflow {
            column: columns.fund.to_string(),
        })?;

    Ok(RangeReturns {
        fund_geom,
        benchmark_geom,
        alpha,
    })
}

/// Cumulative returns and alpha for each trailing window ending at `as_of`.
///
/// A window of `w` days covers `(as_of - w, as_of]`: the start is exclusive, the end
/// inclusive. A window reaching past the earliest representable date covers the whole
/// history. Missing values are handled per series with `strategy`; a series that is
/// empty, still has a missing value, or overflows is "not available", and so is its alpha.
/// Results follow the order of `windows`. A zero-day window is an error.
pub fn compute_windows(
    table: &Table,
    columns: SeriesColumns<'_>,
    as_of: NaiveDate,
    windows: &[u32],
    strategy: NaStrategy,
) -> Result<Vec<WindowReturns>, AnalyticsError> {
    if windows.contains(&0) {
        return Err(AnalyticsError::ZeroWindow);
    }

    let dates = table.dates(columns.date)?;
    let fund = table.numbers(columns.fund)?;
    let benchmark = table.numbers(columns.benchmark)?;

    let results = windows
        .iter()
        .map(|&window_days| {
            let start = as_of
                .checked_sub_signed(Duration::days(i64::from(window_days)))
                .unwrap_or(NaiveDate::MIN);
            let in_window = |i: &usize| start < dates[*i] && dates[*i] <= as_of;

            let fund_values: Vec<Option<Decimal>> =
                (0..dates.len()).filter(in_window).map(|i| fund[i]).collect();
            let bench_values: Vec<Option<Decimal>> =
                (0..dates.len()).filter(in_window).map(|i| benchmark[i]).collect();

            let fund_cum_return = windowed_return(strategy, &fund_values);
            let bench_cum_return = windowed_return(strategy, &bench_values);
            let alpha = match (fund_cum_return, bench_cum_return) {
                (Some(f), Some(b)) => f.checked_sub(b),
                _ => None,
            };

            WindowReturns {
                window_days,
                as_of,
                fund_cum_return,
                bench_cum_return,
                alpha,
            }
        })
        .collect();

    Ok(results)
}

fn windowed_return(strategy: NaStrategy, values: &[Option<Decimal>]) -> Option<Decimal> {
    let values = na::complete_values(strategy, values)?;
    if values.is_empty() {
        return None;
    }
    geometric_cumulative_return(&values)
}

fn compound(column: &str, values: &[Decimal]) -> Result<Decimal, AnalyticsError> {
    geometric_cumulative_return(values).ok_or_else(|| AnalyticsError::Overflow {
        column: column.to_string(),
    })
}

fn require_complete(
    column: &str,
    values: &[Option<Decimal>],
    selected: &[usize],
) -> Result<Vec<Decimal>, AnalyticsError> {
    let picked: Vec<Option<Decimal>> = selected.iter().map(|&i| values[i]).collect();
    let missing = picked.iter().filter(|v| v.is_none()).count();
    if missing > 0 {
        return Err(AnalyticsError::MissingValues {
            column: column.to_string(),
            count: missing,
        });
    }
    Ok(picked.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Cell, Column, CoreError};
    use rust_decimal_macros::dec;

    const COLUMNS: SeriesColumns<'static> = SeriesColumns {
        date: "ReturnDate",
        fund: "FundReturn",
        benchmark: "BenchmarkReturn",
    };

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn returns_table(rows: &[(NaiveDate, Option<Decimal>, Option<Decimal>)]) -> Table {
        Table::new(vec![
            Column::new("ReturnDate", rows.iter().map(|r| r.0)),
            Column::new("FundReturn", rows.iter().map(|r| Cell::from(r.1))),
            Column::new("BenchmarkReturn", rows.iter().map(|r| Cell::from(r.2))),
        ])
        .unwrap()
    }

    fn sample() -> Table {
        returns_table(&[
            (ymd(2025, 1, 1), Some(dec!(0.01)), Some(dec!(0.005))),
            (ymd(2025, 1, 2), Some(dec!(-0.02)), Some(dec!(0.01))),
            (ymd(2025, 1, 3), Some(dec!(0.03)), Some(dec!(0.00))),
        ])
    }

    #[test]
    fn compounds_rather_than_averages() {
        let values = [dec!(0.01), dec!(-0.02), dec!(0.03)];
        // 1.01 * 0.98 * 1.03 - 1
        assert_eq!(geometric_cumulative_return(&values), Some(dec!(0.019494)));
        assert_ne!(geometric_cumulative_return(&values), Some(dec!(0.02) / dec!(3)));
    }

    #[test]
    fn empty_series_compounds_to_zero() {
        assert_eq!(geometric_cumulative_return(&[]), Some(Decimal::ZERO));
    }

    #[test]
    fn compounding_past_decimal_range_is_none() {
        assert_eq!(geometric_cumulative_return(&[dec!(10); 30]), None);
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let result = compute_range(&sample(), COLUMNS, ymd(2025, 1, 1), ymd(2025, 1, 3)).unwrap();

        assert_eq!(result.fund_geom, dec!(0.019494));
        // 1.005 * 1.01 * 1.00 - 1
        assert_eq!(result.benchmark_geom, dec!(0.01505));
        assert_eq!(result.alpha, dec!(0.004444));
    }

    #[test]
    fn single_day_range() {
        let result = compute_range(&sample(), COLUMNS, ymd(2025, 1, 2), ymd(2025, 1, 2)).unwrap();
        assert_eq!(result.fund_geom, dec!(-0.02));
        assert_eq!(result.alpha, dec!(-0.03));
    }

    #[test]
    fn empty_range_is_all_zero() {
        let result = compute_range(&sample(), COLUMNS, ymd(2024, 1, 1), ymd(2024, 12, 31)).unwrap();
        assert_eq!(result, RangeReturns::zero());

        let inverted = compute_range(&sample(), COLUMNS, ymd(2025, 1, 3), ymd(2025, 1, 1)).unwrap();
        assert_eq!(inverted, RangeReturns::zero());
    }

    #[test]
    fn range_rejects_missing_values() {
        let table = returns_table(&[
            (ymd(2025, 1, 1), Some(dec!(0.01)), Some(dec!(0.01))),
            (ymd(2025, 1, 2), None, Some(dec!(0.01))),
        ]);

        let err = compute_range(&table, COLUMNS, ymd(2025, 1, 1), ymd(2025, 1, 2)).unwrap_err();

        assert_eq!(
            err,
            AnalyticsError::MissingValues {
                column: "FundReturn".to_string(),
                count: 1
            }
        );
    }

    #[test]
    fn range_reports_unknown_columns() {
        let columns = SeriesColumns {
            fund: "Fund",
            ..COLUMNS
        };
        let err = compute_range(&sample(), columns, ymd(2025, 1, 1), ymd(2025, 1, 3)).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::Table(CoreError::UnknownColumn("Fund".to_string()))
        );
    }

    #[test]
    fn window_start_is_exclusive_and_end_inclusive() {
        // A 2-day window ending 2025-01-03 covers (2025-01-01, 2025-01-03].
        let results =
            compute_windows(&sample(), COLUMNS, ymd(2025, 1, 3), &[2], NaStrategy::Keep).unwrap();

        assert_eq!(results.len(), 1);
        let w = &results[0];
        assert_eq!(w.window_days, 2);
        assert_eq!(w.as_of, ymd(2025, 1, 3));
        // 0.98 * 1.03 - 1
        assert_eq!(w.fund_cum_return, Some(dec!(0.0094)));
        assert_eq!(w.bench_cum_return, Some(dec!(0.01)));
        assert_eq!(w.alpha, Some(dec!(-0.0006)));
    }

    #[test]
    fn windows_keep_request_order() {
        let results = compute_windows(
            &sample(),
            COLUMNS,
            ymd(2025, 1, 3),
            &[30, 1, 2],
            NaStrategy::Keep,
        )
        .unwrap();

        let days: Vec<u32> = results.iter().map(|w| w.window_days).collect();
        assert_eq!(days, vec![30, 1, 2]);
        assert_eq!(results[0].fund_cum_return, Some(dec!(0.019494)));
        assert_eq!(results[1].fund_cum_return, Some(dec!(0.03)));
    }

    #[test]
    fn empty_window_is_not_available() {
        let results =
            compute_windows(&sample(), COLUMNS, ymd(2024, 6, 30), &[30], NaStrategy::Zero).unwrap();

        assert_eq!(results[0].fund_cum_return, None);
        assert_eq!(results[0].bench_cum_return, None);
        assert_eq!(results[0].alpha, None);
    }

    #[test]
    fn na_strategies_in_windows() {
        let table = returns_table(&[
            (ymd(2025, 1, 1), Some(dec!(0.01)), Some(dec!(0.01))),
            (ymd(2025, 1, 2), None, Some(dec!(0.02))),
            (ymd(2025, 1, 3), Some(dec!(0.03)), Some(dec!(0.00))),
        ]);
        let as_of = ymd(2025, 1, 3);

        let keep = compute_windows(&table, COLUMNS, as_of, &[30], NaStrategy::Keep).unwrap();
        assert_eq!(keep[0].fund_cum_return, None);
        assert_eq!(keep[0].bench_cum_return, Some(dec!(0.0302)));
        assert_eq!(keep[0].alpha, None);

        // Zero and drop agree for compounding: a zero return leaves the product unchanged.
        let zero = compute_windows(&table, COLUMNS, as_of, &[30], NaStrategy::Zero).unwrap();
        let drop = compute_windows(&table, COLUMNS, as_of, &[30], NaStrategy::Drop).unwrap();
        assert_eq!(zero[0].fund_cum_return, Some(dec!(0.0403)));
        assert_eq!(drop[0].fund_cum_return, Some(dec!(0.0403)));
        assert_eq!(drop[0].alpha, Some(dec!(0.0101)));
    }

    #[test]
    fn drop_of_the_only_value_is_not_available() {
        let table = returns_table(&[(ymd(2025, 1, 3), None, Some(dec!(0.01)))]);
        let results =
            compute_windows(&table, COLUMNS, ymd(2025, 1, 3), &[1], NaStrategy::Drop).unwrap();
        assert_eq!(results[0].fund_cum_return, None);
        assert_eq!(results[0].bench_cum_return, Some(dec!(0.01)));
    }

    #[test]
    fn range_overflow_is_an_error() {
        let rows: Vec<_> = (1..=30)
            .map(|d| (ymd(2025, 1, d), Some(dec!(10)), Some(dec!(0.01))))
            .collect();
        let table = returns_table(&rows);

        let err = compute_range(&table, COLUMNS, ymd(2025, 1, 1), ymd(2025, 1, 30)).unwrap_err();

        assert_eq!(
            err,
            AnalyticsError::Overflow {
                column: "FundReturn".to_string()
            }
        );
    }

    #[test]
    fn window_overflow_is_not_available() {
        let rows: Vec<_> = (1..=30)
            .map(|d| (ymd(2025, 1, d), Some(dec!(10)), Some(dec!(0.01))))
            .collect();
        let table = returns_table(&rows);

        let results =
            compute_windows(&table, COLUMNS, ymd(2025, 1, 30), &[60], NaStrategy::Keep).unwrap();

        assert_eq!(results[0].fund_cum_return, None);
        assert!(results[0].bench_cum_return.is_some());
        assert_eq!(results[0].alpha, None);
    }

    #[test]
    fn window_longer_than_the_calendar_covers_all_history() {
        let results = compute_windows(
            &sample(),
            COLUMNS,
            ymd(2025, 1, 3),
            &[u32::MAX],
            NaStrategy::Keep,
        )
        .unwrap();

        assert_eq!(results[0].window_days, u32::MAX);
        assert_eq!(results[0].fund_cum_return, Some(dec!(0.019494)));
        assert_eq!(results[0].alpha, Some(dec!(0.004444)));
    }

    #[test]
    fn zero_day_window_is_rejected() {
        let err = compute_windows(&sample(), COLUMNS, ymd(2025, 1, 3), &[30, 0], NaStrategy::Keep)
            .unwrap_err();
        assert_eq!(err, AnalyticsError::ZeroWindow);
    }
}
