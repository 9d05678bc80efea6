mod cart_pole;
mod log;

pub use cart_pole::CartPoleView;
pub use log::Logs;
