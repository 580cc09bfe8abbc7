use gaze_protocol::{ActionParams, TaskStep};

/// Check the planner-contract rules spec.md §4.12 names as mechanically
/// checkable by the core (the rest are "enforced by the prompt" and are
/// not re-derivable from a step list alone — matching a target zone
/// description, or that a TYPE_TEXT follows its own field's CLICK, need
/// context this function does not have).
///
/// Returns the first violation found, or `None` if the plan is well-formed.
#[must_use]
pub fn validate(steps: &[TaskStep]) -> Option<String> {
    for step in steps {
        if let ActionParams::Click { .. } = &step.action {
            if step.is_global() {
                return Some(format!(
                    "step {} is a CLICK but carries the __global__ sentinel zone id (rule 2)",
                    step.step_number
                ));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use gaze_protocol::MouseButton;

    use super::*;

    fn step(zone_id: &str, action: ActionParams) -> TaskStep {
        TaskStep {
            step_number: 1,
            zone_id: zone_id.into(),
            zone_label: String::new(),
            action,
            expected_change: String::new(),
            description: "s".into(),
        }
    }

    #[test]
    fn accepts_a_click_against_a_real_zone() {
        let steps = vec![step(
            "z1",
            ActionParams::Click { x: None, y: None, button: MouseButton::Left },
        )];
        assert!(validate(&steps).is_none());
    }

    #[test]
    fn rejects_a_global_click() {
        let steps = vec![step(
            "__global__",
            ActionParams::Click { x: Some(1.0), y: Some(1.0), button: MouseButton::Left },
        )];
        assert!(validate(&steps).is_some());
    }

    #[test]
    fn a_global_key_press_is_fine() {
        let steps = vec![step("__global__", ActionParams::KeyPress { key: "enter".into() })];
        assert!(validate(&steps).is_none());
    }
}
