//! Episode records, progress lines and trailing means.
use std::{
    fmt,
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use crate::error::Result;

/// A periodic summary of training progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressRecord {
    pub episode: usize,
    pub reward: f32,
    pub epsilon: f32,
    pub mean_reward: f32,
}

impl fmt::Display for ProgressRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Episode: {} {}  Epsilon: {:.2}  Mean Rewards {:.1}",
            self.episode, self.reward, self.epsilon, self.mean_reward
        )
    }
}

/// Append-only text file of [`ProgressRecord`]s, one per line
///
/// The file is opened and closed for every record, so lines from earlier runs are kept.
#[derive(Debug, Clone)]
pub struct ProgressLog {
    path: PathBuf,
}

impl ProgressLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &ProgressRecord) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{record}")?;
        file.flush()?;
        Ok(())
    }
}

/// Mean of the `window` rewards ending at each episode
///
/// Early episodes average over all rewards seen so far.
pub fn trailing_means(rewards: &[f32], window: usize) -> Vec<f32> {
    let window = window.max(1);
    (0..rewards.len())
        .map(|t| {
            let slice = &rewards[(t + 1).saturating_sub(window)..=t];
            slice.iter().sum::<f32>() / slice.len() as f32
        })
        .collect()
}
