pub mod assign;
pub mod color;
pub mod condition;
pub mod generate;
pub mod house;
pub mod mine;
pub mod perturb;
pub mod render;
pub mod rng;
pub mod scenario;

pub use generate::Difficulty;
pub use scenario::{GenerateConfig, Scenario, generate_scenario};
