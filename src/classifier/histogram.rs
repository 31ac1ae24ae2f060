//! Equal-width histograms over bootstrap values

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBucket {
    /// `"{lo:.2} - {hi:.2}"`, empty when there were no values
    pub label: String,
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Bucket `values` into `buckets` equal-width bins over [min, max].
///
/// The last bin is closed on both ends. Non-finite values are ignored; with no
/// values every bin is empty and unlabeled. When all values are equal they all
/// land in the first bin.
pub fn histogram(values: &[f64], buckets: usize) -> Vec<HistogramBucket> {
    if buckets == 0 {
        return Vec::new();
    }

    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return (0..buckets)
            .map(|_| HistogramBucket {
                label: String::new(),
                lower: 0.0,
                upper: 0.0,
                count: 0,
            })
            .collect();
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / buckets as f64;

    let mut result: Vec<HistogramBucket> = (0..buckets)
        .map(|i| {
            let lower = min + width * i as f64;
            let upper = if i + 1 == buckets {
                max
            } else {
                min + width * (i + 1) as f64
            };
            HistogramBucket {
                label: format!("{:.2} - {:.2}", lower, upper),
                lower,
                upper,
                count: 0,
            }
        })
        .collect();

    for v in finite {
        let idx = if width > 0.0 {
            (((v - min) / width) as usize).min(buckets - 1)
        } else {
            0
        };
        result[idx].count += 1;
    }

    result
}
