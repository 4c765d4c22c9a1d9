//! Win probability and accuracy curves — pure functions only
//! (No Engine/Game dependencies)

use crate::engine::Evaluation;

/// Slope of the logistic curve mapping centipawns to win probability.
const WIN_CURVE_SLOPE: f64 = 0.00368208;

/// Pseudo-centipawn value of a mate score before per-move scaling.
const MATE_BASE_CP: i32 = 32768;

/// Pseudo-centipawns subtracted per move until mate.
const MATE_STEP_CP: i32 = 1000;

/// Accuracy curve: `ACCURACY_SCALE * exp(-ACCURACY_DECAY * delta) - ACCURACY_OFFSET`
const ACCURACY_SCALE: f64 = 1.031668;
const ACCURACY_DECAY: f64 = 4.354;
const ACCURACY_OFFSET: f64 = 0.031669;

/// Lowest accuracy ever reported. Zero is reserved for "no data".
pub const ACCURACY_FLOOR: f64 = 0.000001;

/// Win probability in [0, 1] for a centipawn score seen from `is_white`.
pub fn win(centipawn: f64, is_white: bool) -> f64 {
    let cp = if is_white { centipawn } else { -centipawn };
    0.5 + 0.5 * (2.0 / (1.0 + (-WIN_CURVE_SLOPE * cp).exp()) - 1.0)
}

/// Convert an engine evaluation into a win probability for the side
/// `is_white`. Mate scores are folded onto the centipawn scale first.
pub fn win_probability(evaluation: &Evaluation, is_white: bool) -> f64 {
    let centipawn = match *evaluation {
        Evaluation::Centipawn(cp) => cp,
        Evaluation::Mate(0) => {
            if is_white {
                MATE_BASE_CP
            } else {
                -MATE_BASE_CP
            }
        }
        Evaluation::Mate(n) => (MATE_BASE_CP - n * MATE_STEP_CP) * n.signum(),
    };
    win(centipawn as f64, is_white)
}

/// Accuracy in (0, 1] for a win-probability swing `change_win` (>= 0).
pub fn move_accuracy(change_win: f64) -> f64 {
    let acc = ACCURACY_SCALE * (-ACCURACY_DECAY * change_win).exp() - ACCURACY_OFFSET;
    if acc <= 0.0 {
        return ACCURACY_FLOOR;
    }
    acc
}

/// Harmonic mean of per-move accuracies. An empty slice or any zero
/// entry yields 0.
pub fn harmonic_mean(values: &[f64]) -> f64 {
    if values.is_empty() || values.iter().any(|v| *v == 0.0) {
        return 0.0;
    }
    let inverse_sum: f64 = values.iter().map(|v| 1.0 / v).sum();
    values.len() as f64 / inverse_sum
}
