//! Aggregation primitives: frequency counts, numeric summaries, and
//! grouped means. All of them skip missing values instead of failing.

use serde::Serialize;
use std::collections::HashMap;

/// One distinct value and how often it appears.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyEntry {
    pub value: String,
    pub count: usize,
}

/// Distinct-value counts for one categorical column, ordered by count
/// descending (ties by value ascending, so output is stable across runs).
#[derive(Debug, Clone, Default, Serialize)]
pub struct FrequencyTable {
    pub entries: Vec<FrequencyEntry>,
    pub total: usize,
}

impl FrequencyTable {
    /// Counts the non-empty values of an iterator.
    pub fn from_values<'a, I>(values: I) -> Self
    where
        I: Iterator<Item = &'a str>,
    {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut total = 0usize;
        for value in values {
            if value.is_empty() {
                continue;
            }
            *counts.entry(value).or_default() += 1;
            total += 1;
        }

        let mut entries: Vec<FrequencyEntry> = counts
            .into_iter()
            .map(|(value, count)| FrequencyEntry {
                value: value.to_string(),
                count,
            })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));

        Self { entries, total }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `n` most frequent entries.
    pub fn head(&self, n: usize) -> Vec<FrequencyEntry> {
        self.entries.iter().take(n).cloned().collect()
    }
}

/// count/mean/median/min/max over the present values of a numeric column.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

impl NumericSummary {
    /// Summarizes the `Some` values; empty input yields a zero-count
    /// default rather than an error.
    pub fn from_values(values: &[Option<f64>]) -> Self {
        let mut present: Vec<f64> = values.iter().filter_map(|v| *v).collect();
        if present.is_empty() {
            return Self::default();
        }
        present.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        Self {
            count: present.len(),
            mean: mean(&present),
            median: median_of_sorted(&present),
            min: present[0],
            max: present[present.len() - 1],
        }
    }
}

/// Arithmetic mean. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Mean of a numeric column per group label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean {
    pub group: String,
    pub mean: f64,
    pub count: usize,
}

/// Pairs each label with the value at the same row and averages per label.
/// Rows with an empty label or a missing value are skipped. Output is
/// ordered by mean descending (ties by group ascending).
pub fn mean_by_group<'a, I>(labels: I, values: &[Option<f64>]) -> Vec<GroupMean>
where
    I: Iterator<Item = &'a str>,
{
    let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();
    for (label, value) in labels.zip(values.iter()) {
        if label.is_empty() {
            continue;
        }
        let Some(v) = *value else {
            continue;
        };
        let slot = sums.entry(label).or_insert((0.0, 0));
        slot.0 += v;
        slot.1 += 1;
    }

    let mut groups: Vec<GroupMean> = sums
        .into_iter()
        .map(|(group, (sum, count))| GroupMean {
            group: group.to_string(),
            mean: sum / count as f64,
            count,
        })
        .collect();
    groups.sort_by(|a, b| {
        b.mean
            .partial_cmp(&a.mean)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.group.cmp(&b.group))
    });
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_counts_and_order() {
        let values = ["card", "cash", "card", "voucher", "cash", "card"];
        let freq = FrequencyTable::from_values(values.iter().copied());

        assert_eq!(freq.total, 6);
        assert_eq!(freq.entries[0].value, "card");
        assert_eq!(freq.entries[0].count, 3);
        assert_eq!(freq.entries[1].value, "cash");
        assert_eq!(freq.entries[2].value, "voucher");
    }

    #[test]
    fn test_frequency_total_matches_sum_of_counts() {
        let values = ["a", "", "b", "a", ""];
        let freq = FrequencyTable::from_values(values.iter().copied());
        let sum: usize = freq.entries.iter().map(|e| e.count).sum();
        assert_eq!(freq.total, sum);
        assert_eq!(freq.total, 3); // empties excluded
    }

    #[test]
    fn test_frequency_ties_order_by_value() {
        let values = ["b", "a", "c", "a", "c", "b"];
        let freq = FrequencyTable::from_values(values.iter().copied());
        let order: Vec<&str> = freq.entries.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_frequency_head() {
        let values = ["a", "a", "a", "b", "b", "c"];
        let freq = FrequencyTable::from_values(values.iter().copied());
        let top = freq.head(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].value, "a");
        assert_eq!(top[1].value, "b");
    }

    #[test]
    fn test_numeric_summary_odd_count() {
        let values = vec![Some(3.0), Some(1.0), None, Some(2.0)];
        let s = NumericSummary::from_values(&values);
        assert_eq!(s.count, 3);
        assert_eq!(s.mean, 2.0);
        assert_eq!(s.median, 2.0);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 3.0);
    }

    #[test]
    fn test_numeric_summary_even_count() {
        let values = vec![Some(4.0), Some(1.0), Some(3.0), Some(2.0)];
        let s = NumericSummary::from_values(&values);
        assert_eq!(s.median, 2.5);
        assert!(s.mean >= s.min && s.mean <= s.max);
    }

    #[test]
    fn test_numeric_summary_empty_is_zero_count() {
        let s = NumericSummary::from_values(&[None, None]);
        assert_eq!(s.count, 0);
        assert_eq!(s.mean, 0.0);
    }

    #[test]
    fn test_mean_by_group() {
        let labels = ["sp", "rio", "sp", "", "rio"];
        let values = vec![Some(10.0), Some(4.0), Some(20.0), Some(99.0), None];
        let groups = mean_by_group(labels.iter().copied(), &values);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].group, "sp");
        assert_eq!(groups[0].mean, 15.0);
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[1].group, "rio");
        assert_eq!(groups[1].mean, 4.0);
    }

    #[test]
    fn test_mean_by_group_tie_orders_by_name() {
        let labels = ["b", "a"];
        let values = vec![Some(5.0), Some(5.0)];
        let groups = mean_by_group(labels.iter().copied(), &values);
        assert_eq!(groups[0].group, "a");
        assert_eq!(groups[1].group, "b");
    }
}
