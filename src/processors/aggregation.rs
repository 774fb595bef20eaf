//! Group-by aggregation over enriched records.
//!
//! Every query is a filter (inclusive ranges, all must match) followed by a
//! grouping on a discrete field. [`group_fold`] is the shared primitive;
//! [`count_by_group`] and [`mean_by_group`] are reducers on top of it.

use crate::error::{PipelineError, Result};
use crate::models::{Field, FieldAccess};
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Inclusive `start..=end` bound on one field. Equality is `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeFilter {
    pub field: Field,
    pub start: f64,
    pub end: f64,
}

impl RangeFilter {
    pub fn new(field: Field, start: f64, end: f64) -> Self {
        Self { field, start, end }
    }

    pub fn equals(field: Field, value: f64) -> Self {
        Self::new(field, value, value)
    }

    /// NaN never matches.
    pub fn matches(&self, value: f64) -> bool {
        value >= self.start && value <= self.end
    }
}

impl FromStr for RangeFilter {
    type Err = PipelineError;

    /// Parses `field=value` or `field=start..end`.
    fn from_str(s: &str) -> Result<Self> {
        let (name, bounds) = s.split_once('=').ok_or_else(|| {
            PipelineError::Config(format!(
                "Invalid filter '{}': expected FIELD=VALUE or FIELD=START..END",
                s
            ))
        })?;
        let field = name.parse::<Field>()?;

        let parse_bound = |value: &str| {
            value.trim().parse::<f64>().map_err(|_| {
                PipelineError::Config(format!("Invalid bound '{}' in filter '{}'", value, s))
            })
        };

        match bounds.split_once("..") {
            Some((start, end)) => Ok(Self::new(field, parse_bound(start)?, parse_bound(end)?)),
            None => Ok(Self::equals(field, parse_bound(bounds)?)),
        }
    }
}

/// What to group on and which records take part.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupQuery {
    group_by: Field,
    filters: Vec<RangeFilter>,
}

impl GroupQuery {
    pub fn new(group_by: Field) -> Self {
        Self {
            group_by,
            filters: Vec::new(),
        }
    }

    pub fn with_filter(mut self, filter: RangeFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_range(self, field: Field, start: f64, end: f64) -> Self {
        self.with_filter(RangeFilter::new(field, start, end))
    }

    pub fn group_by(&self) -> Field {
        self.group_by
    }

    pub fn filters(&self) -> &[RangeFilter] {
        &self.filters
    }

    /// Check every referenced field against the record schema before any
    /// record is touched, so an empty input still reports bad fields.
    fn validate<R: FieldAccess>(&self) -> Result<()> {
        R::ensure_field(self.group_by)?;
        if !self.group_by.is_discrete() {
            return Err(PipelineError::NotGroupable(self.group_by.name()));
        }
        for filter in &self.filters {
            R::ensure_field(filter.field)?;
        }
        Ok(())
    }

    fn matches<R: FieldAccess>(&self, record: &R) -> bool {
        self.filters.iter().all(|filter| {
            record
                .field_value(filter.field)
                .is_some_and(|value| filter.matches(value))
        })
    }
}

/// Per-group results keyed by the group field's value, ascending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregation<V> {
    pub group_by: Field,
    pub groups: BTreeMap<i64, V>,
}

impl<V> Aggregation<V> {
    pub fn get(&self, key: i64) -> Option<&V> {
        self.groups.get(&key)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &V)> {
        self.groups.iter().map(|(k, v)| (*k, v))
    }
}

impl Aggregation<usize> {
    /// Number of records that passed the filters.
    pub fn total(&self) -> usize {
        self.groups.values().sum()
    }
}

/// Per-group means after the fill policy has been applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeanAggregation {
    pub group_by: Field,
    pub value_field: Field,
    #[serde(serialize_with = "crate::utils::float_serde::serialize_map")]
    pub groups: BTreeMap<i64, f64>,
    /// Keys whose mean was undefined and replaced by `fill_value`
    pub filled_keys: Vec<i64>,
    #[serde(serialize_with = "crate::utils::float_serde::serialize_option")]
    pub fill_value: Option<f64>,
}

impl MeanAggregation {
    pub fn get(&self, key: i64) -> Option<f64> {
        self.groups.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// True when no group has a defined mean, i.e. there was not enough data
    /// to compute or fill anything.
    pub fn is_insufficient(&self) -> bool {
        self.groups.values().all(|m| m.is_nan())
    }
}

/// Filter `records`, partition them by the query's group field and fold each
/// partition into an accumulator.
pub fn group_fold<R, A, F>(records: &[R], query: &GroupQuery, mut fold: F) -> Result<BTreeMap<i64, A>>
where
    R: FieldAccess,
    A: Default,
    F: FnMut(&mut A, &R),
{
    query.validate::<R>()?;

    let mut groups: BTreeMap<i64, A> = BTreeMap::new();
    for record in records.iter().filter(|r| query.matches(*r)) {
        let Some(key) = record.field_value(query.group_by) else {
            continue;
        };
        fold(groups.entry(key as i64).or_default(), record);
    }

    Ok(groups)
}

/// Count records per group. Groups without members are absent.
pub fn count_by_group<R: FieldAccess>(records: &[R], query: &GroupQuery) -> Result<Aggregation<usize>> {
    let groups = group_fold(records, query, |count: &mut usize, _| *count += 1)?;
    tracing::debug!(
        "Counted {} groups by {} over {} records",
        groups.len(),
        query.group_by,
        records.len()
    );

    Ok(Aggregation {
        group_by: query.group_by,
        groups,
    })
}

#[derive(Debug, Default)]
struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    fn push(&mut self, value: f64) {
        if !value.is_nan() {
            self.sum += value;
            self.count += 1;
        }
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Mean of `value` per group, NaN inputs skipped.
///
/// With a `key_domain`, keys of the domain that no record falls into are
/// included as undefined. Every undefined mean is then replaced by the mean of
/// the defined group means. If no group is defined the result stays NaN.
pub fn mean_by_group<R: FieldAccess>(
    records: &[R],
    query: &GroupQuery,
    value: Field,
    key_domain: Option<RangeInclusive<i64>>,
) -> Result<MeanAggregation> {
    R::ensure_field(value)?;

    let accumulators = group_fold(records, query, |acc: &mut MeanAccumulator, record| {
        acc.push(record.field_value(value).unwrap_or(f64::NAN));
    })?;

    let mut groups: BTreeMap<i64, f64> = accumulators
        .iter()
        .map(|(key, acc)| (*key, acc.mean()))
        .collect();
    if let Some(domain) = key_domain {
        for key in domain {
            groups.entry(key).or_insert(f64::NAN);
        }
    }

    let (fill_value, filled_keys) = fill_undefined(&mut groups);
    if !filled_keys.is_empty() {
        tracing::debug!(
            "Filled {} undefined {} means by {} with {:?}",
            filled_keys.len(),
            value,
            query.group_by,
            fill_value
        );
    }

    Ok(MeanAggregation {
        group_by: query.group_by,
        value_field: value,
        groups,
        filled_keys,
        fill_value,
    })
}

/// Replace NaN means with the mean of the remaining ones.
fn fill_undefined(groups: &mut BTreeMap<i64, f64>) -> (Option<f64>, Vec<i64>) {
    let defined: Vec<f64> = groups.values().copied().filter(|m| !m.is_nan()).collect();
    if defined.is_empty() {
        return (None, Vec::new());
    }

    let fill = defined.iter().sum::<f64>() / defined.len() as f64;
    let mut filled = Vec::new();
    for (key, mean) in groups.iter_mut() {
        if mean.is_nan() {
            *mean = fill;
            filled.push(*key);
        }
    }

    (Some(fill), filled)
}
