pub mod cart_pole;
#[cfg(feature = "gym")]
pub mod gym_adapter;

pub use cart_pole::{CPAction, CartPole};
#[cfg(feature = "gym")]
pub use gym_adapter::GymCartPole;
