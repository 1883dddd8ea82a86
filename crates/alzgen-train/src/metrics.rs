//! Held-out evaluation of a fitted classifier.

use alzgen_risk::classifier::ConfusionMatrix;
use alzgen_risk::ModelMetrics;

/// Decision threshold for the confusion matrix.
pub const DECISION_THRESHOLD: f64 = 0.5;

pub fn confusion_matrix(probabilities: &[f64], labels: &[bool], threshold: f64) -> ConfusionMatrix {
    let mut cm = ConfusionMatrix::default();
    for (&p, &y) in probabilities.iter().zip(labels) {
        match (p >= threshold, y) {
            (true, true)   => cm.true_positive += 1,
            (true, false)  => cm.false_positive += 1,
            (false, true)  => cm.false_negative += 1,
            (false, false) => cm.true_negative += 1,
        }
    }
    cm
}

fn ratio(num: u64, denom: u64) -> f64 {
    if denom == 0 {
        0.0
    } else {
        num as f64 / denom as f64
    }
}

/// ROC-AUC via the Mann–Whitney rank-sum; tied scores share their average
/// rank. Returns 0.5 when either class is absent.
pub fn roc_auc(probabilities: &[f64], labels: &[bool]) -> f64 {
    let n_pos = labels.iter().filter(|&&l| l).count();
    let n_neg = labels.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return 0.5;
    }

    let mut indexed: Vec<(f64, bool)> = probabilities
        .iter()
        .copied()
        .zip(labels.iter().copied())
        .collect();
    indexed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let n = indexed.len();
    let mut positive_rank_sum = 0.0;
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j < n - 1 && (indexed[j].0 - indexed[j + 1].0).abs() < 1e-12 {
            j += 1;
        }
        let avg_rank = (i + 1 + j + 1) as f64 / 2.0;
        positive_rank_sum += avg_rank * indexed[i..=j].iter().filter(|(_, l)| *l).count() as f64;
        i = j + 1;
    }

    let n_pos = n_pos as f64;
    let n_neg = n_neg as f64;
    (positive_rank_sum - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg)
}

/// Mean squared error of the probabilities against the 0/1 outcomes.
pub fn brier_score(probabilities: &[f64], labels: &[bool]) -> f64 {
    if probabilities.is_empty() {
        return 0.0;
    }
    probabilities
        .iter()
        .zip(labels)
        .map(|(&p, &y)| {
            let y = if y { 1.0 } else { 0.0 };
            (p - y).powi(2)
        })
        .sum::<f64>()
        / probabilities.len() as f64
}

pub fn evaluate(probabilities: &[f64], labels: &[bool]) -> ModelMetrics {
    let cm = confusion_matrix(probabilities, labels, DECISION_THRESHOLD);
    let total = cm.true_positive + cm.false_positive + cm.true_negative + cm.false_negative;
    ModelMetrics {
        accuracy: ratio(cm.true_positive + cm.true_negative, total),
        sensitivity: ratio(cm.true_positive, cm.true_positive + cm.false_negative),
        specificity: ratio(cm.true_negative, cm.true_negative + cm.false_positive),
        auc: roc_auc(probabilities, labels),
        brier: brier_score(probabilities, labels),
        confusion: cm,
        test_size: labels.len(),
    }
}
