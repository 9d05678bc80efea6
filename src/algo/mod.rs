pub mod sarsa;

pub use sarsa::{Episode, EpisodeEnd, SarsaAgent, SarsaAgentConfig};
