use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Per-attempt sub-scores; any field may be absent and is then skipped,
/// never counted as zero.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttemptScores {
    pub grammar: Option<f64>,
    pub pronunciation: Option<f64>,
    pub semantic: Option<f64>,
    pub fluency: Option<f64>,
}

/// One practice attempt as loaded from the store. `mistakes` is opaque to
/// the aggregator except for being an array or not.
#[derive(Debug, Clone, Default)]
pub struct AttemptData {
    pub scores: AttemptScores,
    pub mistakes: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateScores {
    pub grammar: f64,
    pub pronunciation: f64,
    pub semantic: f64,
    pub fluency: f64,
    #[serde(rename = "final")]
    pub final_score: f64,
}

#[derive(Debug, Clone)]
pub struct SessionReport {
    pub scores: AggregateScores,
    pub mistakes: Vec<Value>,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    round2(values.iter().sum::<f64>() / values.len() as f64)
}

fn field_average(attempts: &[AttemptData], get: fn(&AttemptScores) -> Option<f64>) -> f64 {
    let values: Vec<f64> = attempts.iter().filter_map(|a| get(&a.scores)).collect();
    average(&values)
}

/// Average each sub-score across the attempts that supply it and flatten the
/// mistake lists. Performs no persistence.
///
/// `final` is the mean of the four defaulted averages, except that a session
/// where every average is zero reports `final = 0` outright; "all genuinely
/// zero" and "no data" are indistinguishable here on purpose.
pub fn aggregate(attempts: &[AttemptData]) -> SessionReport {
    let grammar = field_average(attempts, |s| s.grammar);
    let pronunciation = field_average(attempts, |s| s.pronunciation);
    let semantic = field_average(attempts, |s| s.semantic);
    let fluency = field_average(attempts, |s| s.fluency);

    let parts = [grammar, pronunciation, semantic, fluency];
    let final_score = if parts.iter().any(|v| *v != 0.0) {
        round2(parts.iter().sum::<f64>() / 4.0)
    } else {
        0.0
    };

    // Attempt iteration order, then per-attempt order; non-array values are
    // skipped rather than treated as single mistakes.
    let mistakes = attempts
        .iter()
        .filter_map(|a| a.mistakes.as_array())
        .flatten()
        .cloned()
        .collect();

    SessionReport {
        scores: AggregateScores {
            grammar,
            pronunciation,
            semantic,
            fluency,
            final_score,
        },
        mistakes,
    }
}
