//! Scoring module - weighted task priority
//!
//! Each attribute is normalized onto `[0, 1]` by its scale maximum and
//! combined with the user's weights:
//!
//! ```text
//! effort_penalty = wC * 0.1 * norm(effort, 8)
//! score = max(0, wI*norm(impact, 10) + wU*norm(urgency, 10)
//!              + wE*norm(energy_fit, 5) - wC*norm(complexity, 5)
//!              - effort_penalty)
//! ```
//!
//! Impact, urgency and energy fit raise the score; complexity and effort lower
//! it. Negative or non-finite weights count as zero, so the result is always a
//! finite, non-negative number.

use std::cmp::Ordering;

use crate::types::{
    Task, Weights, COMPLEXITY_MAX, EFFORT_MAX, ENERGY_FIT_MAX, IMPACT_MAX, URGENCY_MAX,
};

/// Share of the complexity weight applied to normalized effort.
pub const EFFORT_PENALTY_FACTOR: f64 = 0.1;

fn norm(value: u8, max: u8) -> f64 {
    if max == 0 {
        return 0.0;
    }
    (f64::from(value) / f64::from(max)).clamp(0.0, 1.0)
}

fn weight(w: f64) -> f64 {
    if w.is_finite() && w > 0.0 {
        w
    } else {
        0.0
    }
}

/// Priority score of a task under the given weights (higher is more urgent).
pub fn score(task: &Task, weights: &Weights) -> f64 {
    let complexity_weight = weight(weights.complexity);
    let effort_penalty = complexity_weight * EFFORT_PENALTY_FACTOR * norm(task.effort, EFFORT_MAX);

    let raw = weight(weights.impact) * norm(task.impact, IMPACT_MAX)
        + weight(weights.urgency) * norm(task.urgency, URGENCY_MAX)
        + weight(weights.energy_fit) * norm(task.energy_fit, ENERGY_FIT_MAX)
        - complexity_weight * norm(task.complexity, COMPLEXITY_MAX)
        - effort_penalty;

    raw.max(0.0)
}

/// Tasks paired with their score, highest first. Equal scores keep input order.
pub fn rank_tasks<'a>(tasks: &'a [Task], weights: &Weights) -> Vec<(&'a Task, f64)> {
    let mut ranked: Vec<(&Task, f64)> = tasks.iter().map(|t| (t, score(t, weights))).collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ranked
}

/// Highest-ranked task that is still open.
pub fn recommend<'a>(tasks: &'a [Task], weights: &Weights) -> Option<&'a Task> {
    rank_tasks(tasks, weights)
        .into_iter()
        .find(|(task, _)| !task.completed)
        .map(|(task, _)| task)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: u64, impact: u8, urgency: u8, energy_fit: u8, complexity: u8, effort: u8) -> Task {
        Task {
            impact,
            urgency,
            energy_fit,
            complexity,
            effort,
            ..Task::new(id, format!("task {id}"))
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_score_formula() {
        let w = Weights::default();
        // 1.0*1 + 1.0*0.5 + 0.5*1 - 0.5*0 - 0.5*0.1*0 = 2.0
        assert!(approx(score(&task(1, 10, 5, 5, 0, 0), &w), 2.0));
        // 0.5 + 0.5 + 0.3 - 0.5*0.4 - 0.05*0.5 = 1.075
        assert!(approx(score(&task(2, 5, 5, 3, 2, 4), &w), 1.075));
    }

    #[test]
    fn test_score_floor_is_zero() {
        let w = Weights::default();
        let s = score(&task(1, 0, 0, 0, 5, 8), &w);
        assert_eq!(s, 0.0);
    }

    #[test]
    fn test_out_of_scale_values_are_clamped() {
        let w = Weights::default();
        assert!(approx(
            score(&task(1, 200, 0, 0, 0, 0), &w),
            score(&task(1, 10, 0, 0, 0, 0), &w)
        ));
    }

    #[test]
    fn test_bad_weights_count_as_zero() {
        let w = Weights {
            impact: f64::NAN,
            urgency: -3.0,
            energy_fit: f64::INFINITY,
            complexity: 0.0,
        };
        assert_eq!(score(&task(1, 10, 10, 5, 0, 0), &w), 0.0);
    }

    #[test]
    fn test_monotone_in_each_attribute() {
        let w = Weights::default();
        let base = task(1, 5, 5, 2, 2, 4);
        let s = score(&base, &w);
        assert!(score(&Task { impact: 6, ..base.clone() }, &w) >= s);
        assert!(score(&Task { urgency: 6, ..base.clone() }, &w) >= s);
        assert!(score(&Task { energy_fit: 3, ..base.clone() }, &w) >= s);
        assert!(score(&Task { complexity: 3, ..base.clone() }, &w) <= s);
        assert!(score(&Task { effort: 5, ..base.clone() }, &w) <= s);
    }

    #[test]
    fn test_rank_is_descending_and_stable() {
        let w = Weights::default();
        let tasks = vec![
            task(1, 2, 2, 0, 0, 0),
            task(2, 9, 9, 0, 0, 0),
            task(3, 2, 2, 0, 0, 0),
        ];
        let ids: Vec<u64> = rank_tasks(&tasks, &w).iter().map(|(t, _)| t.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_recommend_skips_completed() {
        let w = Weights::default();
        let mut top = task(1, 10, 10, 5, 0, 0);
        top.completed = true;
        let tasks = vec![top, task(2, 3, 3, 0, 0, 0), task(3, 6, 6, 0, 0, 0)];
        assert_eq!(recommend(&tasks, &w).map(|t| t.id), Some(3));

        let done: Vec<Task> = tasks
            .into_iter()
            .map(|mut t| {
                t.completed = true;
                t
            })
            .collect();
        assert!(recommend(&done, &w).is_none());
        assert!(recommend(&[], &w).is_none());
    }
}
