mod engine;
mod solver;
mod types;

pub use engine::{independence_year, project};
pub use solver::{GoalSolveConfig, GoalSolveIteration, GoalSolveResult, GoalType, solve_goal};
pub use types::{Configuration, ProjectionResult};
