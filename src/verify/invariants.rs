use std::collections::BTreeMap;

use crate::data::Dataset;
use crate::engine::animation::{AnimationOrchestrator, Phase};
use crate::engine::state::ViewState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    pub msg: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.msg)
    }
}

impl std::error::Error for InvariantViolation {}

/// No group may move backwards between two observations.
pub fn assert_phases_monotonic(
    before: &BTreeMap<String, Phase>,
    after: &BTreeMap<String, Phase>,
) -> Result<(), InvariantViolation> {
    for (group, prev) in before {
        match after.get(group) {
            Some(next) if next < prev => {
                return Err(InvariantViolation {
                    msg: format!("group {} went {} -> {}", group, prev.as_str(), next.as_str()),
                });
            }
            None => {
                return Err(InvariantViolation {
                    msg: format!("group {} disappeared", group),
                });
            }
            _ => {}
        }
    }
    Ok(())
}

/// The active point must be one of the literal stored points.
pub fn assert_hover_in_dataset(state: &ViewState, dataset: &Dataset) -> Result<(), InvariantViolation> {
    match state.chart.active_index() {
        Some(i) if i >= dataset.market.len() => Err(InvariantViolation {
            msg: format!("active marker {} outside market series", i),
        }),
        _ => Ok(()),
    }
}

/// Flip keys are exactly the provider ids.
pub fn assert_flip_keys(state: &ViewState, dataset: &Dataset) -> Result<(), InvariantViolation> {
    let n = state.flips.len();
    if n != dataset.providers.len() || !dataset.provider_ids().all(|id| state.flips.contains(id)) {
        return Err(InvariantViolation {
            msg: format!(
                "flip registry has {} cards, catalog has {}",
                n,
                dataset.providers.len()
            ),
        });
    }
    Ok(())
}

/// Within each reveal set, entering times strictly increase with index.
pub fn assert_stagger_order(animation: &AnimationOrchestrator) -> Result<(), InvariantViolation> {
    for set in animation.sets() {
        let mut prev: Option<(usize, u64)> = None;
        for (index, member) in set.members.iter().enumerate() {
            let entered = animation.group(member).and_then(|g| g.entered_at);
            if let (Some((pi, pt)), Some(t)) = (prev, entered) {
                if t <= pt {
                    return Err(InvariantViolation {
                        msg: format!(
                            "set {}: member {} entered at {} not after member {} at {}",
                            set.id, index, t, pi, pt
                        ),
                    });
                }
            }
            if let Some(t) = entered {
                prev = Some((index, t));
            }
        }
    }
    Ok(())
}

/// Run every check; `before` is the phase snapshot taken ahead of the event.
pub fn check_view(
    before: &BTreeMap<String, Phase>,
    state: &ViewState,
    dataset: &Dataset,
) -> Vec<InvariantViolation> {
    let after = state.animation.phases();
    [
        assert_phases_monotonic(before, &after),
        assert_hover_in_dataset(state, dataset),
        assert_flip_keys(state, dataset),
        assert_stagger_order(&state.animation),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect()
}
