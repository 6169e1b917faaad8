use serde::Serialize;

use super::engine::{independence_year, project};
use super::types::Configuration;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalType {
    RequiredRate,
    RequiredAssets,
}

#[derive(Debug, Clone, Copy)]
pub struct GoalSolveConfig {
    pub goal_type: GoalType,
    pub target_year: i32,
    pub search_min: f64,
    pub search_max: f64,
    pub tolerance: f64,
    pub max_iterations: u32,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSolveIteration {
    pub iteration: u32,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub candidate_value: f64,
    pub independence_year: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSolveResult {
    pub goal_type: GoalType,
    pub target_year: i32,
    pub search_min: f64,
    pub search_max: f64,
    pub tolerance: f64,
    pub max_iterations: u32,
    pub solved_value: Option<f64>,
    pub achieved_independence_year: Option<u32>,
    pub iterations: Vec<GoalSolveIteration>,
    pub converged: bool,
    pub feasible: bool,
    pub message: String,
}

/// Bisects the chosen configuration field for the smallest value that
/// reaches financial independence on or before `target_year`. Both goals
/// are monotone: a higher rate or a larger asset base never delays the
/// crossover.
pub fn solve_goal(
    configuration: &Configuration,
    config: GoalSolveConfig,
) -> Result<GoalSolveResult, String> {
    validate_config(configuration, config)?;

    let mut iterations = Vec::with_capacity(config.max_iterations as usize);
    let low_eval = evaluate_candidate(configuration, config, config.search_min);
    let high_eval = evaluate_candidate(configuration, config, config.search_max);

    let mut solved_value = None;
    let mut converged = false;
    let feasible;
    let message;

    if low_eval.meets_target {
        solved_value = Some(config.search_min);
        converged = true;
        feasible = true;
        message = "Already independent at the lower search bound.".to_string();
    } else if !high_eval.meets_target {
        feasible = false;
        message = "No feasible value found within the search bounds.".to_string();
    } else {
        let mut lo = config.search_min;
        let mut hi = config.search_max;
        let mut it = 0;
        while it < config.max_iterations {
            it += 1;
            let mid = (lo + hi) * 0.5;
            let eval = evaluate_candidate(configuration, config, mid);
            iterations.push(GoalSolveIteration {
                iteration: it,
                lower_bound: lo,
                upper_bound: hi,
                candidate_value: mid,
                independence_year: eval.independence_year,
            });

            if eval.meets_target {
                hi = mid;
            } else {
                lo = mid;
            }

            if (hi - lo).abs() <= config.tolerance {
                converged = true;
                solved_value = Some(hi);
                break;
            }
        }
        if solved_value.is_none() {
            solved_value = Some(hi);
        }
        feasible = true;
        message = if converged {
            match config.goal_type {
                GoalType::RequiredRate => "Solved required annualized rate.".to_string(),
                GoalType::RequiredAssets => "Solved required starting assets.".to_string(),
            }
        } else {
            "Reached max iterations before tolerance was met; returning best estimate.".to_string()
        };
    }

    let achieved_independence_year = solved_value
        .and_then(|value| evaluate_candidate(configuration, config, value).independence_year);

    Ok(GoalSolveResult {
        goal_type: config.goal_type,
        target_year: config.target_year,
        search_min: config.search_min,
        search_max: config.search_max,
        tolerance: config.tolerance,
        max_iterations: config.max_iterations,
        solved_value,
        achieved_independence_year,
        iterations,
        converged,
        feasible,
        message,
    })
}

#[derive(Debug, Clone, Copy)]
struct CandidateEval {
    meets_target: bool,
    independence_year: Option<u32>,
}

fn evaluate_candidate(
    base_configuration: &Configuration,
    config: GoalSolveConfig,
    candidate_value: f64,
) -> CandidateEval {
    let mut configuration = base_configuration.clone();
    match config.goal_type {
        GoalType::RequiredRate => configuration.annualized_rate = candidate_value,
        GoalType::RequiredAssets => configuration.total_assets = candidate_value.max(0.0),
    }

    let year = independence_year(&project(&configuration)).map(|year| year as u32);
    CandidateEval {
        meets_target: year.is_some_and(|year| year as i32 <= config.target_year),
        independence_year: year,
    }
}

fn validate_config(configuration: &Configuration, config: GoalSolveConfig) -> Result<(), String> {
    if config.target_year < 0 {
        return Err("target_year must be >= 0".to_string());
    }
    if config.target_year > configuration.number_of_years.max(0) {
        return Err("target_year must be within the projection horizon".to_string());
    }
    if !config.search_min.is_finite() || !config.search_max.is_finite() {
        return Err("search bounds must be finite".to_string());
    }
    if config.search_max <= config.search_min {
        return Err("search_max must be greater than search_min".to_string());
    }
    if !config.tolerance.is_finite() || config.tolerance <= 0.0 {
        return Err("tolerance must be > 0".to_string());
    }
    if config.max_iterations == 0 {
        return Err("max_iterations must be > 0".to_string());
    }
    Ok(())
}
