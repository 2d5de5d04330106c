mod agent;
mod engine;
mod grid;
mod rules;

pub use agent::Heading;
pub use engine::{PaintInstruction, SimulationEngine};
pub use grid::Grid;
pub use rules::{ColorState, GroupId, Rgb, RuleTable};
