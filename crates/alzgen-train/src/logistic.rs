//! Batch gradient-descent fitting for the logistic model and its Platt
//! calibration.

use alzgen_common::GeneId;
use alzgen_risk::classifier::sigmoid;
use alzgen_risk::PlattCalibration;

use crate::cohort::Sample;

const PLATT_LEARNING_RATE: f64 = 0.1;
const PLATT_ITERATIONS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticFit {
    pub weights: [f64; GeneId::COUNT],
    pub intercept: f64,
}

impl LogisticFit {
    pub fn logit(&self, sample: &Sample) -> f64 {
        sample
            .features
            .as_array()
            .iter()
            .zip(self.weights.iter())
            .map(|(x, w)| x * w)
            .sum::<f64>()
            + self.intercept
    }
}

/// Minimise mean log-loss. Returns the zero model for an empty set.
pub fn fit_logistic(samples: &[Sample], learning_rate: f64, epochs: usize) -> LogisticFit {
    let mut fit = LogisticFit {
        weights: [0.0; GeneId::COUNT],
        intercept: 0.0,
    };
    if samples.is_empty() {
        return fit;
    }
    let n = samples.len() as f64;

    for _ in 0..epochs {
        let mut grad_w = [0.0; GeneId::COUNT];
        let mut grad_b = 0.0;
        for sample in samples {
            let y = if sample.label { 1.0 } else { 0.0 };
            let diff = sigmoid(fit.logit(sample)) - y;
            for (g, x) in grad_w.iter_mut().zip(sample.features.as_array()) {
                *g += diff * x;
            }
            grad_b += diff;
        }
        for (w, g) in fit.weights.iter_mut().zip(grad_w) {
            *w -= learning_rate * g / n;
        }
        fit.intercept -= learning_rate * grad_b / n;
    }
    fit
}

/// Fit p = σ(slope · logit + offset) on held-out (logit, label) pairs.
pub fn fit_platt(logits: &[f64], labels: &[bool]) -> PlattCalibration {
    let mut cal = PlattCalibration::default();
    if logits.is_empty() || logits.len() != labels.len() {
        return cal;
    }
    let n = logits.len() as f64;

    for _ in 0..PLATT_ITERATIONS {
        let mut grad_a = 0.0;
        let mut grad_b = 0.0;
        for (&z, &y) in logits.iter().zip(labels) {
            let y = if y { 1.0 } else { 0.0 };
            let diff = cal.apply(z) - y;
            grad_a += diff * z;
            grad_b += diff;
        }
        cal.slope -= PLATT_LEARNING_RATE * grad_a / n;
        cal.offset -= PLATT_LEARNING_RATE * grad_b / n;
    }
    cal
}
