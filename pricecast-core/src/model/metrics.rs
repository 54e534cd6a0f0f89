//! Binary classification metrics.
//!
//! Class 0 is "no rise", class 1 is "rise". Any ratio whose denominator is
//! zero is reported as 0.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const CLASS_NAMES: [&str; 2] = ["No Rise", "Rise"];

/// Counts indexed `[actual][predicted]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub counts: [[usize; 2]; 2],
}

impl ConfusionMatrix {
    pub fn from_labels(actual: &[u8], predicted: &[u8]) -> Self {
        let mut counts = [[0usize; 2]; 2];
        for (&a, &p) in actual.iter().zip(predicted) {
            counts[usize::from(a.min(1))][usize::from(p.min(1))] += 1;
        }
        Self { counts }
    }

    pub fn true_negatives(&self) -> usize {
        self.counts[0][0]
    }

    pub fn false_positives(&self) -> usize {
        self.counts[0][1]
    }

    pub fn false_negatives(&self) -> usize {
        self.counts[1][0]
    }

    pub fn true_positives(&self) -> usize {
        self.counts[1][1]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Each row divided by its sum; an empty row stays all zeros.
    pub fn row_normalized(&self) -> [[f64; 2]; 2] {
        let mut out = [[0.0; 2]; 2];
        for (actual, row) in self.counts.iter().enumerate() {
            let sum: usize = row.iter().sum();
            if sum == 0 {
                continue;
            }
            for (predicted, &n) in row.iter().enumerate() {
                out[actual][predicted] = n as f64 / sum as f64;
            }
        }
        out
    }
}

/// Precision, recall, F1 and support for one class or one average.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub accuracy: f64,
    pub per_class: [ClassMetrics; 2],
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
    pub confusion: ConfusionMatrix,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

impl ClassificationReport {
    pub fn from_labels(actual: &[u8], predicted: &[u8]) -> Self {
        let confusion = ConfusionMatrix::from_labels(actual, predicted);
        let c = &confusion.counts;
        let total = confusion.total();

        let per_class: [ClassMetrics; 2] = std::array::from_fn(|k| {
            let tp = c[k][k];
            let predicted_k = c[0][k] + c[1][k];
            let support = c[k][0] + c[k][1];
            let precision = ratio(tp, predicted_k);
            let recall = ratio(tp, support);
            ClassMetrics {
                precision,
                recall,
                f1: f1(precision, recall),
                support,
            }
        });

        let macro_avg = ClassMetrics {
            precision: (per_class[0].precision + per_class[1].precision) / 2.0,
            recall: (per_class[0].recall + per_class[1].recall) / 2.0,
            f1: (per_class[0].f1 + per_class[1].f1) / 2.0,
            support: total,
        };

        let weigh = |get: fn(&ClassMetrics) -> f64| {
            if total == 0 {
                return 0.0;
            }
            per_class
                .iter()
                .map(|m| get(m) * m.support as f64)
                .sum::<f64>()
                / total as f64
        };
        let weighted_avg = ClassMetrics {
            precision: weigh(|m| m.precision),
            recall: weigh(|m| m.recall),
            f1: weigh(|m| m.f1),
            support: total,
        };

        Self {
            accuracy: ratio(c[0][0] + c[1][1], total),
            per_class,
            macro_avg,
            weighted_avg,
            confusion,
        }
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>14} {:>10} {:>10} {:>10} {:>10}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for (name, m) in CLASS_NAMES.iter().zip(&self.per_class) {
            writeln!(
                f,
                "{:>14} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                name, m.precision, m.recall, m.f1, m.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>14} {:>10} {:>10} {:>10.2} {:>10}",
            "accuracy",
            "",
            "",
            self.accuracy,
            self.confusion.total()
        )?;
        for (name, m) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            writeln!(
                f,
                "{:>14} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                name, m.precision, m.recall, m.f1, m.support
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-10,
            "actual={actual}, expected={expected}"
        );
    }

    #[test]
    fn confusion_counts() {
        let cm = ConfusionMatrix::from_labels(&[0, 0, 1, 1, 1], &[0, 1, 1, 1, 0]);
        assert_eq!(cm.true_negatives(), 1);
        assert_eq!(cm.false_positives(), 1);
        assert_eq!(cm.false_negatives(), 1);
        assert_eq!(cm.true_positives(), 2);
        assert_eq!(cm.total(), 5);
    }

    #[test]
    fn row_normalization() {
        let cm = ConfusionMatrix {
            counts: [[3, 1], [0, 0]],
        };
        let n = cm.row_normalized();
        assert_approx(n[0][0], 0.75);
        assert_approx(n[0][1], 0.25);
        assert_eq!(n[1], [0.0, 0.0]);
    }

    #[test]
    fn report_matches_hand_computation() {
        // actual:    0 0 1 1 1
        // predicted: 0 1 1 1 0
        let r = ClassificationReport::from_labels(&[0, 0, 1, 1, 1], &[0, 1, 1, 1, 0]);
        assert_approx(r.accuracy, 0.6);

        let down = r.per_class[0];
        assert_approx(down.precision, 0.5);
        assert_approx(down.recall, 0.5);
        assert_eq!(down.support, 2);

        let up = r.per_class[1];
        assert_approx(up.precision, 2.0 / 3.0);
        assert_approx(up.recall, 2.0 / 3.0);
        assert_eq!(up.support, 3);

        assert_approx(r.macro_avg.f1, (0.5 + 2.0 / 3.0) / 2.0);
        assert_approx(r.weighted_avg.recall, (0.5 * 2.0 + 2.0 / 3.0 * 3.0) / 5.0);
    }

    #[test]
    fn zero_division_reports_zero() {
        let r = ClassificationReport::from_labels(&[1, 1], &[1, 1]);
        assert_eq!(r.per_class[0].precision, 0.0);
        assert_eq!(r.per_class[0].recall, 0.0);
        assert_eq!(r.per_class[0].f1, 0.0);
        assert_approx(r.accuracy, 1.0);

        let empty = ClassificationReport::from_labels(&[], &[]);
        assert_eq!(empty.accuracy, 0.0);
        assert_eq!(empty.weighted_avg.f1, 0.0);
    }

    #[test]
    fn display_lists_both_classes() {
        let text = ClassificationReport::from_labels(&[0, 1], &[0, 1]).to_string();
        assert!(text.contains("No Rise"));
        assert!(text.contains("Rise"));
        assert!(text.contains("weighted avg"));
    }
}
