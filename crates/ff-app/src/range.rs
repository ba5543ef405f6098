//! Range axes: the swept variables of a run.

use ff_core::{Real, VarId};
use ff_graph::Value;

/// Relative slack so `0.1`-style steps still land on `stop`.
const STEP_SLACK: Real = 1e-9;

/// One axis of the cell grid.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeAxis {
    /// One implicit cell.
    None,
    /// Item positions of a discrete variable.
    Discrete { var: VarId, items: Vec<usize> },
    /// Native values of a continuous variable.
    Continuous { var: VarId, values: Vec<Real> },
}

impl RangeAxis {
    /// Continuous axis from `start` to `stop` by `step`, at most `max_steps`
    /// values. When the plain step would need more, the step is widened so
    /// `max_steps` values still span `start..=stop`.
    pub fn stepped(var: VarId, start: Real, stop: Real, step: Real, max_steps: usize) -> Self {
        RangeAxis::Continuous {
            var,
            values: stepped_values(start, stop, step, max_steps),
        }
    }

    /// Number of cells along this axis; `None` counts as one.
    pub fn len(&self) -> usize {
        match self {
            RangeAxis::None => 1,
            RangeAxis::Discrete { items, .. } => items.len(),
            RangeAxis::Continuous { values, .. } => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn var(&self) -> Option<VarId> {
        match self {
            RangeAxis::None => None,
            RangeAxis::Discrete { var, .. } | RangeAxis::Continuous { var, .. } => Some(*var),
        }
    }

    /// Leaf value for position `i`, or `None` for the implicit axis.
    pub fn value_at(&self, i: usize) -> Option<Value> {
        match self {
            RangeAxis::None => None,
            RangeAxis::Discrete { items, .. } => items.get(i).map(|item| Value::Item(*item)),
            RangeAxis::Continuous { values, .. } => values.get(i).map(|v| Value::Number(*v)),
        }
    }
}

pub fn stepped_values(start: Real, stop: Real, step: Real, max_steps: usize) -> Vec<Real> {
    let max_steps = max_steps.max(1);
    if step <= 0.0 || stop <= start {
        return vec![start];
    }
    let span = stop - start;
    // Kept in floating point until it is known to fit; also catches inf/NaN.
    let count = (span / step * (1.0 + STEP_SLACK)).floor() + 1.0;
    if count < max_steps as Real + 1.0 {
        return (0..count as usize).map(|i| start + step * i as Real).collect();
    }
    if max_steps == 1 {
        return vec![start];
    }
    let wide = span / (max_steps - 1) as Real;
    (0..max_steps).map(|i| start + wide * i as Real).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var() -> VarId {
        VarId::from_index(0)
    }

    #[test]
    fn plain_steps_include_stop() {
        assert_eq!(stepped_values(0.0, 4.0, 1.0, 20), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        let tenths = stepped_values(0.0, 0.3, 0.1, 20);
        assert_eq!(tenths.len(), 4);
    }

    #[test]
    fn steps_short_of_stop_are_dropped() {
        assert_eq!(stepped_values(0.0, 5.0, 2.0, 20), vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn count_snaps_to_max_steps() {
        let values = stepped_values(0.0, 100.0, 1.0, 5);
        assert_eq!(values, vec![0.0, 25.0, 50.0, 75.0, 100.0]);
        assert_eq!(stepped_values(3.0, 100.0, 1.0, 1), vec![3.0]);
    }

    #[test]
    fn tiny_step_over_huge_span_snaps_instead_of_overflowing() {
        let values = stepped_values(0.0, 1.0e10, 1.0e-300, 20);
        assert_eq!(values.len(), 20);
        assert_eq!(values[0], 0.0);
        assert!((values[19] - 1.0e10).abs() < 1.0);

        let infinite = stepped_values(0.0, Real::MAX, Real::MIN_POSITIVE, 3);
        assert_eq!(infinite.len(), 3);
        assert_eq!(infinite[2], Real::MAX);
    }

    #[test]
    fn axis_lengths() {
        assert_eq!(RangeAxis::None.len(), 1);
        let axis = RangeAxis::stepped(var(), 0.0, 2.0, 1.0, 20);
        assert_eq!(axis.len(), 3);
        assert_eq!(axis.value_at(2), Some(Value::Number(2.0)));
        assert_eq!(axis.value_at(3), None);
        let items = RangeAxis::Discrete {
            var: var(),
            items: vec![0, 3],
        };
        assert_eq!(items.value_at(1), Some(Value::Item(3)));
    }
}
