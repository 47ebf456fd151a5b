use crate::error::AnalyticsError;
use crate::na;
use crate::report::ExposureDiff;
use chrono::NaiveDate;
use core_types::{NaStrategy, Table};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

/// The columns of a constituents table used to compute exposures.
#[derive(Debug, Clone, Copy)]
pub struct ExposureColumns<'a> {
    pub date: &'a str,
    pub weight: &'a str,
    pub group: &'a str,
}

/// Restricts constituents to those whose `column` equals `value`.
#[derive(Debug, Clone, Copy)]
pub struct IndexFilter<'a> {
    pub column: &'a str,
    pub value: &'a str,
}

/// Summed weight per group on exactly `as_of`.
///
/// Groups with no rows on that date are absent from the map. Rows with an empty group cell
/// are skipped. Under `NaStrategy::Keep`, a group with a missing weight sums to `None`.
pub fn sum_by_group(
    table: &Table,
    columns: ExposureColumns<'_>,
    as_of: NaiveDate,
    index: Option<IndexFilter<'_>>,
    strategy: NaStrategy,
) -> Result<BTreeMap<String, Option<Decimal>>, AnalyticsError> {
    let dates = table.dates(columns.date)?;
    let weights = table.numbers(columns.weight)?;
    let groups = table.labels(columns.group)?;
    let index_labels = index
        .map(|filter| table.labels(filter.column))
        .transpose()?;

    let rows: Vec<(String, Option<Decimal>)> = (0..dates.len())
        .filter(|&i| dates[i] == as_of)
        .filter(|&i| match (&index, &index_labels) {
            (Some(filter), Some(labels)) => labels[i].as_deref() == Some(filter.value.trim()),
            _ => true,
        })
        .filter_map(|i| groups[i].clone().map(|group| (group, weights[i])))
        .collect();

    let mut sums: BTreeMap<String, Option<Decimal>> = BTreeMap::new();
    for (group, weight) in na::apply(strategy, rows) {
        let entry = sums.entry(group).or_insert(Some(Decimal::ZERO));
        *entry = match (*entry, weight) {
            (Some(total), Some(w)) => Some(total.checked_add(w).ok_or_else(|| {
                AnalyticsError::Overflow {
                    column: columns.weight.to_string(),
                }
            })?),
            _ => None,
        };
    }

    Ok(sums)
}

/// Per-group exposure at `start` and `end`, and the change between them.
///
/// Every group present on either date appears once, sorted by name. A group absent on one
/// side counts as zero there. The difference is `end - start`.
/// Sums or differences outside the range of `Decimal` are an error.
pub fn difference(
    table: &Table,
    columns: ExposureColumns<'_>,
    start: NaiveDate,
    end: NaiveDate,
    index: Option<IndexFilter<'_>>,
    strategy: NaStrategy,
) -> Result<Vec<ExposureDiff>, AnalyticsError> {
    let at_start = sum_by_group(table, columns, start, index, strategy)?;
    let at_end = sum_by_group(table, columns, end, index, strategy)?;

    let groups: BTreeSet<&String> = at_start.keys().chain(at_end.keys()).collect();

    groups
        .into_iter()
        .map(|group| {
            let sum_weight_start = at_start.get(group).copied().unwrap_or(Some(Decimal::ZERO));
            let sum_weight_end = at_end.get(group).copied().unwrap_or(Some(Decimal::ZERO));
            let difference = match (sum_weight_start, sum_weight_end) {
                (Some(s), Some(e)) => Some(e.checked_sub(s).ok_or_else(|| {
                    AnalyticsError::Overflow {
                        column: columns.weight.to_string(),
                    }
                })?),
                _ => None,
            };
            Ok(ExposureDiff {
                group: group.clone(),
                sum_weight_start,
                sum_weight_end,
                difference,
            })
        })
        .collect()
}
