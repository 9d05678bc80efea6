use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A dense table of action values indexed by a discrete state and an action
///
/// The table has one axis per state dimension followed by an action axis, stored
/// row-major so the values of all actions in a state are contiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionTable {
    shape: Vec<usize>,
    values: Vec<f32>,
}

impl ActionTable {
    /// A zero-initialised table with `state_shape` bins per state dimension and `actions` actions
    pub fn zeros(state_shape: &[usize], actions: usize) -> Self {
        let mut shape = state_shape.to_vec();
        shape.push(actions);
        let len = shape.iter().product();
        Self {
            shape,
            values: vec![0.0; len],
        }
    }

    /// Full shape including the trailing action axis
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn action_count(&self) -> usize {
        self.shape.last().copied().unwrap_or(0)
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// **Errors** with [`Error::ShapeMismatch`] unless the table has exactly `expected` shape
    pub fn ensure_shape(&self, expected: &[usize]) -> Result<()> {
        if self.shape != expected {
            return Err(Error::ShapeMismatch {
                expected: expected.to_vec(),
                found: self.shape.clone(),
            });
        }
        Ok(())
    }

    /// Checks that the value count agrees with the shape, as a decoded table may not
    pub(crate) fn ensure_consistent(&self) -> Result<()> {
        let len: usize = self.shape.iter().product();
        if self.shape.is_empty() || len != self.values.len() {
            return Err(Error::ShapeMismatch {
                expected: self.shape.clone(),
                found: vec![self.values.len()],
            });
        }
        Ok(())
    }

    fn row_offset(&self, state: &[usize]) -> usize {
        assert_eq!(
            state.len() + 1,
            self.shape.len(),
            "state has {} dimensions, table expects {}",
            state.len(),
            self.shape.len() - 1
        );
        state
            .iter()
            .zip(&self.shape)
            .fold(0, |offset, (&ix, &dim)| {
                assert!(ix < dim, "state index {ix} out of bounds for axis of length {dim}");
                offset * dim + ix
            })
            * self.action_count()
    }

    /// Values of every action in `state`
    ///
    /// **Panics** if `state` does not index into the table
    pub fn row(&self, state: &[usize]) -> &[f32] {
        let offset = self.row_offset(state);
        &self.values[offset..offset + self.action_count()]
    }

    pub fn get(&self, state: &[usize], action: usize) -> f32 {
        self.row(state)[action]
    }

    pub fn get_mut(&mut self, state: &[usize], action: usize) -> &mut f32 {
        let offset = self.row_offset(state);
        let actions = self.action_count();
        assert!(action < actions, "action {action} out of bounds for {actions} actions");
        &mut self.values[offset + action]
    }

    /// Whether every value is finite
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|x| x.is_finite())
    }
}
