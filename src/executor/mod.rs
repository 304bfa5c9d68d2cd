//! Query state and execution pipeline.
//!
//! [`ArrayQuery`] accumulates a record source, a compiled condition tree, an
//! ordering spec, and pagination, then executes the pipeline on demand:
//! filter → stable sort → offset/limit → return (or aggregate over the
//! pre-limit filtered set). Executing never mutates the source collection and
//! never consumes the query, so the same state can be re-run.

use std::cmp::Ordering;

use serde_json::Value;

use crate::condition::{self, Condition};
use crate::error::{QueryError, QueryResult};
use crate::value::{compare_values, get_field, to_f64};

/// Sort direction for one ordering key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Ordering spec: (field, direction) pairs, first field most significant.
///
/// Built from a bare field name (ascending) or from explicit pairs:
///
/// ```rust
/// use arrayquery::{OrderBy, SortDirection};
///
/// let _single: OrderBy = "email".into();
/// let _multi: OrderBy = [("amount", SortDirection::Desc), ("id", SortDirection::Asc)].into();
/// ```
#[derive(Debug, Clone, Default)]
pub struct OrderBy(Vec<(String, SortDirection)>);

impl From<&str> for OrderBy {
    fn from(field: &str) -> Self {
        OrderBy(vec![(field.to_string(), SortDirection::Asc)])
    }
}

impl From<String> for OrderBy {
    fn from(field: String) -> Self {
        OrderBy(vec![(field, SortDirection::Asc)])
    }
}

impl From<(&str, SortDirection)> for OrderBy {
    fn from((field, direction): (&str, SortDirection)) -> Self {
        OrderBy(vec![(field.to_string(), direction)])
    }
}

impl<const N: usize> From<[(&str, SortDirection); N]> for OrderBy {
    fn from(fields: [(&str, SortDirection); N]) -> Self {
        OrderBy(
            fields
                .into_iter()
                .map(|(field, direction)| (field.to_string(), direction))
                .collect(),
        )
    }
}

impl From<Vec<(String, SortDirection)>> for OrderBy {
    fn from(fields: Vec<(String, SortDirection)>) -> Self {
        OrderBy(fields)
    }
}

/// SQL-like query over an in-memory collection of records.
///
/// Records are JSON objects; the collection is assigned once via
/// [`ArrayQuery::from`] and treated as shared, read-only input.
#[derive(Debug)]
pub struct ArrayQuery {
    source: Option<Vec<Value>>,
    condition: Option<Condition>,
    order: Vec<(String, SortDirection)>,
    limit: Option<usize>,
    offset: Option<usize>,
    /// Name of the primary key field. Caller-facing metadata only; no
    /// execution behavior depends on it.
    pub primary_key_name: String,
}

impl Default for ArrayQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl ArrayQuery {
    /// Create an empty query with the default primary key name `"id"`.
    pub fn new() -> Self {
        Self {
            source: None,
            condition: None,
            order: Vec::new(),
            limit: None,
            offset: None,
            primary_key_name: "id".to_string(),
        }
    }

    /// Assign the record collection to query, replacing any prior source.
    pub fn from(&mut self, records: Vec<Value>) -> &mut Self {
        self.source = Some(records);
        self
    }

    /// Set the condition, replacing the current one.
    pub fn where_(&mut self, expr: Value) -> QueryResult<&mut Self> {
        self.condition = Some(condition::compile(&expr)?);
        Ok(self)
    }

    /// AND a condition onto the current one. With no condition set yet this
    /// behaves like [`ArrayQuery::where_`].
    pub fn and_where(&mut self, expr: Value) -> QueryResult<&mut Self> {
        let compiled = condition::compile(&expr)?;
        self.combine(compiled, Condition::And);
        Ok(self)
    }

    /// OR a condition onto the current one. With no condition set yet this
    /// behaves like [`ArrayQuery::where_`].
    pub fn or_where(&mut self, expr: Value) -> QueryResult<&mut Self> {
        let compiled = condition::compile(&expr)?;
        self.combine(compiled, Condition::Or);
        Ok(self)
    }

    /// Like [`ArrayQuery::where_`], but empty-valued leaves (null, `""`,
    /// `[]`) are stripped first. A fully stripped expression clears the
    /// condition (match all).
    pub fn filter_where(&mut self, expr: Value) -> QueryResult<&mut Self> {
        match condition::prune_empty(&expr) {
            Some(pruned) => self.where_(pruned),
            None => {
                self.condition = None;
                Ok(self)
            }
        }
    }

    /// Filtering variant of [`ArrayQuery::and_where`]. A fully stripped
    /// expression leaves the condition unchanged.
    pub fn and_filter_where(&mut self, expr: Value) -> QueryResult<&mut Self> {
        match condition::prune_empty(&expr) {
            Some(pruned) => self.and_where(pruned),
            None => Ok(self),
        }
    }

    /// Filtering variant of [`ArrayQuery::or_where`]. A fully stripped
    /// expression leaves the condition unchanged.
    pub fn or_filter_where(&mut self, expr: Value) -> QueryResult<&mut Self> {
        match condition::prune_empty(&expr) {
            Some(pruned) => self.or_where(pruned),
            None => Ok(self),
        }
    }

    fn combine(&mut self, compiled: Condition, op: fn(Vec<Condition>) -> Condition) {
        self.condition = Some(match self.condition.take() {
            Some(current) => op(vec![current, compiled]),
            None => compiled,
        });
    }

    /// Set the ordering spec: a field name for a single ascending key, or
    /// (field, direction) pairs for a lexicographic multi-key sort.
    pub fn order_by(&mut self, spec: impl Into<OrderBy>) -> &mut Self {
        self.order = spec.into().0;
        self
    }

    /// Cap the number of rows returned by [`ArrayQuery::all`]. Aggregates and
    /// [`ArrayQuery::exists`] ignore the limit.
    pub fn limit(&mut self, n: usize) -> &mut Self {
        self.limit = Some(n);
        self
    }

    /// Skip the first `n` rows of the sorted result. Aggregates and
    /// [`ArrayQuery::exists`] ignore the offset.
    pub fn offset(&mut self, n: usize) -> &mut Self {
        self.offset = Some(n);
        self
    }

    // Execution :

    /// Run the full pipeline and return the matching records, each with its
    /// original field order intact.
    pub fn all(&self) -> QueryResult<Vec<Value>> {
        self.fetch(self.limit)
    }

    /// Return the first row of the sorted filtered set, or None when nothing
    /// matches.
    pub fn one(&self) -> QueryResult<Option<Value>> {
        Ok(self.fetch(Some(1))?.into_iter().next())
    }

    /// Whether at least one record matches. Short-circuits on the first match
    /// and ignores limit/offset.
    pub fn exists(&self) -> QueryResult<bool> {
        let records = self.records()?;
        Ok(match &self.condition {
            Some(condition) => records.iter().any(|record| condition.matches(record)),
            None => !records.is_empty(),
        })
    }

    /// Number of matching records, ignoring limit/offset.
    pub fn count(&self) -> QueryResult<usize> {
        Ok(self.matched()?.len())
    }

    /// Sum of `field` over the filtered set, ignoring limit/offset.
    ///
    /// Per record the field coerces to a number (numeric strings included);
    /// non-numeric or missing values contribute 0.
    pub fn sum(&self, field: &str) -> QueryResult<f64> {
        let mut sum = 0.0;
        for record in self.matched()? {
            if let Some(n) = to_f64(&get_field(record, field)) {
                sum += n;
            }
        }
        Ok(sum)
    }

    /// Arithmetic mean of `field` over the filtered set, ignoring
    /// limit/offset.
    ///
    /// Non-numeric and missing values are excluded from the denominator. With
    /// no numeric values at all this returns 0.0, never an error.
    pub fn average(&self, field: &str) -> QueryResult<f64> {
        let mut sum = 0.0;
        let mut count = 0usize;
        for record in self.matched()? {
            if let Some(n) = to_f64(&get_field(record, field)) {
                sum += n;
                count += 1;
            }
        }
        if count > 0 {
            Ok(sum / count as f64)
        } else {
            Ok(0.0)
        }
    }

    /// Smallest non-null value of `field` over the filtered set, or None when
    /// every matching record lacks the field.
    pub fn min(&self, field: &str) -> QueryResult<Option<Value>> {
        let mut min: Option<Value> = None;
        for record in self.matched()? {
            let value = get_field(record, field);
            if value.is_null() {
                continue;
            }
            min = Some(match min {
                None => value,
                Some(current) => {
                    if compare_values(&value, &current) == Ordering::Less {
                        value
                    } else {
                        current
                    }
                }
            });
        }
        Ok(min)
    }

    /// Largest non-null value of `field` over the filtered set, or None when
    /// every matching record lacks the field.
    pub fn max(&self, field: &str) -> QueryResult<Option<Value>> {
        let mut max: Option<Value> = None;
        for record in self.matched()? {
            let value = get_field(record, field);
            if value.is_null() {
                continue;
            }
            max = Some(match max {
                None => value,
                Some(current) => {
                    if compare_values(&value, &current) == Ordering::Greater {
                        value
                    } else {
                        current
                    }
                }
            });
        }
        Ok(max)
    }

    fn records(&self) -> QueryResult<&[Value]> {
        match &self.source {
            Some(records) => Ok(records),
            None => Err(QueryError::MissingSource),
        }
    }

    /// Filter the source through the condition. Selection is a stable
    /// subsequence: ties keep their original relative order.
    fn matched(&self) -> QueryResult<Vec<&Value>> {
        let records = self.records()?;
        Ok(match &self.condition {
            Some(condition) => records
                .iter()
                .filter(|record| condition.matches(record))
                .collect(),
            None => records.iter().collect(),
        })
    }

    fn fetch(&self, limit: Option<usize>) -> QueryResult<Vec<Value>> {
        let mut rows = self.matched()?;
        tracing::debug!(
            "query matched {} of {} records",
            rows.len(),
            self.records()?.len()
        );

        if !self.order.is_empty() {
            // Vec::sort_by is stable, so equal keys keep filtered order.
            rows.sort_by(|a, b| {
                for (field, direction) in &self.order {
                    let ordering = compare_values(&get_field(a, field), &get_field(b, field));
                    if ordering != Ordering::Equal {
                        return match direction {
                            SortDirection::Asc => ordering,
                            SortDirection::Desc => ordering.reverse(),
                        };
                    }
                }
                Ordering::Equal
            });
        }

        let offset = self.offset.unwrap_or(0);
        let limit = limit.unwrap_or(usize::MAX);
        Ok(rows.into_iter().skip(offset).take(limit).cloned().collect())
    }
}
