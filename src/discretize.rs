#![allow(clippy::len_without_is_empty)]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Evenly spaced boundaries over a closed interval, endpoints included
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinSpace {
    pub start: f32,
    pub stop: f32,
    pub num: usize,
}

impl LinSpace {
    pub fn new(start: f32, stop: f32, num: usize) -> Self {
        Self { start, stop, num }
    }
}

/// A strictly increasing sequence of bin boundaries for one observation dimension
///
/// `n` boundaries split the real line into `n + 1` bins.
#[derive(Debug, Clone, PartialEq)]
pub struct Bins {
    edges: Vec<f32>,
}

impl Bins {
    /// **Errors** if `edges` is empty, not finite, or not strictly increasing
    pub fn new(edges: Vec<f32>) -> Result<Self> {
        if edges.is_empty() {
            return Err(Error::InvalidBins("at least one boundary is required".into()));
        }
        if edges.iter().any(|x| !x.is_finite()) {
            return Err(Error::InvalidBins(format!("boundaries must be finite: {edges:?}")));
        }
        if edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::InvalidBins(format!(
                "boundaries must be strictly increasing: {edges:?}"
            )));
        }
        Ok(Self { edges })
    }

    /// Build `num` evenly spaced boundaries from `start` to `stop`
    pub fn linspace(space: LinSpace) -> Result<Self> {
        let LinSpace { start, stop, num } = space;
        let edges = match num {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (stop - start) / (num - 1) as f32;
                (0..num)
                    .map(|i| if i == num - 1 { stop } else { start + step * i as f32 })
                    .collect()
            }
        };
        Self::new(edges)
    }

    pub fn edges(&self) -> &[f32] {
        &self.edges
    }

    /// Number of bins, one more than the number of boundaries
    pub fn len(&self) -> usize {
        self.edges.len() + 1
    }

    /// Index of the bin containing `x`
    ///
    /// Bins are left-closed and right-open: the result is `i` such that
    /// `edges[i - 1] <= x < edges[i]`, so a value equal to a boundary falls in the bin to its
    /// right. Values below the first boundary give `0`, values at or above the last give
    /// `edges.len()`. `NaN` gives `0`.
    pub fn digitize(&self, x: f32) -> usize {
        self.edges.partition_point(|&edge| edge <= x)
    }
}

/// Maps continuous observations to discrete states, one [`Bins`] per dimension
#[derive(Debug, Clone, PartialEq)]
pub struct Discretizer<const N: usize> {
    bins: [Bins; N],
}

impl<const N: usize> Discretizer<N> {
    pub fn new(bins: [Bins; N]) -> Self {
        Self { bins }
    }

    pub fn from_spaces(spaces: [LinSpace; N]) -> Result<Self> {
        let mut bins = Vec::with_capacity(N);
        for space in spaces {
            bins.push(Bins::linspace(space)?);
        }
        let bins: [Bins; N] = bins
            .try_into()
            .map_err(|_| Error::InvalidBins("dimension count changed".into()))?;
        Ok(Self::new(bins))
    }

    pub fn bins(&self) -> &[Bins; N] {
        &self.bins
    }

    /// Number of bins along each dimension
    pub fn shape(&self) -> [usize; N] {
        std::array::from_fn(|i| self.bins[i].len())
    }

    pub fn discretize(&self, observation: &[f32; N]) -> [usize; N] {
        std::array::from_fn(|i| self.bins[i].digitize(observation[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position_bins() -> Bins {
        Bins::linspace(LinSpace::new(-2.4, 2.4, 10)).unwrap()
    }

    #[test]
    fn linspace_functional() {
        let bins = Bins::linspace(LinSpace::new(-1.0, 1.0, 5)).unwrap();
        assert_eq!(bins.edges(), [-1.0, -0.5, 0.0, 0.5, 1.0], "evenly spaced");
        assert_eq!(bins.len(), 6, "one more bin than boundaries");

        let bins = position_bins();
        assert_eq!(bins.edges()[0], -2.4, "first boundary is exact");
        assert_eq!(bins.edges()[9], 2.4, "last boundary is exact");
    }

    #[test]
    fn invalid_bins_rejected() {
        assert!(Bins::new(vec![]).is_err(), "empty");
        assert!(Bins::new(vec![1.0, 1.0]).is_err(), "not strictly increasing");
        assert!(Bins::new(vec![2.0, 1.0]).is_err(), "decreasing");
        assert!(Bins::new(vec![0.0, f32::NAN]).is_err(), "nan");
        assert!(Bins::linspace(LinSpace::new(1.0, -1.0, 3)).is_err(), "reversed space");
    }

    #[test]
    fn out_of_range_clamps() {
        let bins = position_bins();
        for x in [-1e9, -100.0, -2.41, f32::NEG_INFINITY] {
            assert_eq!(bins.digitize(x), 0, "{x} maps to the lowest bin");
        }
        for x in [2.41, 100.0, 1e9, f32::INFINITY] {
            assert_eq!(bins.digitize(x), 10, "{x} maps to the highest bin");
        }
    }

    #[test]
    fn edges_are_left_closed() {
        let bins = Bins::new(vec![-1.0, 0.0, 1.0]).unwrap();
        assert_eq!(bins.digitize(-1.0), 1, "lowest edge opens bin 1");
        assert_eq!(bins.digitize(-0.5), 1);
        assert_eq!(bins.digitize(0.0), 2, "edge belongs to the bin on its right");
        assert_eq!(bins.digitize(0.999), 2);
        assert_eq!(bins.digitize(1.0), 3, "last edge opens the top bin");
        assert_eq!(bins.digitize(f32::NAN), 0, "nan maps to bin 0");
    }

    #[test]
    fn discretizer_functional() {
        let d = Discretizer::from_spaces([
            LinSpace::new(-2.4, 2.4, 10),
            LinSpace::new(-4.0, 4.0, 10),
            LinSpace::new(-0.2095, 0.2095, 10),
            LinSpace::new(-4.0, 4.0, 10),
        ])
        .unwrap();
        assert_eq!(d.shape(), [11; 4], "eleven bins per dimension");
        assert_eq!(d.discretize(&[0.01, 0.01, 0.01, 0.01]), [5; 4], "near zero is central");
        assert_eq!(d.discretize(&[-3.0, 5.0, 0.0, -0.01]), [0, 10, 5, 5]);
    }
}
