//! # Progress Projector
//!
//! Pure projection from a wizard position to the progress indicator.

use serde::{Deserialize, Serialize};

use crate::step::WizardStep;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Active,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub index: usize,
    pub label: String,
    pub status: StepStatus,
}

/// One entry per step: below `position` completed, at `position` active,
/// above it pending.
pub fn project(position: usize, total_steps: usize) -> Vec<ProgressEntry> {
    (0..total_steps)
        .map(|index| ProgressEntry {
            index,
            label: WizardStep::from_index(index)
                .map(|step| step.label().to_string())
                .unwrap_or_else(|| format!("Step {}", index + 1)),
            status: match index.cmp(&position) {
                std::cmp::Ordering::Less => StepStatus::Completed,
                std::cmp::Ordering::Equal => StepStatus::Active,
                std::cmp::Ordering::Greater => StepStatus::Pending,
            },
        })
        .collect()
}

/// Fill of the progress bar, `position / (total - 1)` in percent, clamped to
/// `0..=100`.
pub fn progress_percent(position: usize, total_steps: usize) -> f64 {
    if total_steps <= 1 {
        return 100.0;
    }
    let last = total_steps - 1;
    position.min(last) as f64 / last as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn projection_at_business() {
        let entries = project(1, WizardStep::STEP_COUNT);
        let statuses: Vec<_> = entries.iter().map(|e| e.status).collect();
        assert_eq!(
            statuses,
            vec![StepStatus::Completed, StepStatus::Active, StepStatus::Pending, StepStatus::Pending]
        );
        assert_eq!(entries[2].label, "Review & Confirm");
    }

    #[test]
    fn percent_matches_bar() {
        assert_eq!(progress_percent(0, 4), 0.0);
        assert!((progress_percent(1, 4) - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(progress_percent(3, 4), 100.0);
        assert_eq!(progress_percent(9, 4), 100.0);
        assert_eq!(progress_percent(0, 1), 100.0);
    }

    #[test]
    fn labels_past_known_steps_are_generic() {
        let entries = project(0, 6);
        assert_eq!(entries[5].label, "Step 6");
    }

    proptest! {
        #[test]
        fn exactly_one_active_when_in_range(total in 1usize..10, pos in 0usize..10) {
            prop_assume!(pos < total);
            let entries = project(pos, total);
            prop_assert_eq!(entries.len(), total);
            let active = entries.iter().filter(|e| e.status == StepStatus::Active).count();
            let completed = entries.iter().filter(|e| e.status == StepStatus::Completed).count();
            prop_assert_eq!(active, 1);
            prop_assert_eq!(completed, pos);
        }
    }
}
