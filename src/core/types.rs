use serde::Serialize;

/// Immutable projection input. Rate fields are percentages (divided by 100
/// when applied); currency fields share one arbitrary unit.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub number_of_years: i32,
    pub total_assets: f64,
    pub annualized_rate: f64,
    pub income: f64,
    pub income_increase_rate: f64,
    pub expense: f64,
    pub inflation_rate: f64,
    pub maximum_income: f64,
    pub minimum_income: f64,
    pub minimum_income_increase_rate: f64,
    pub working_years: i32,
}

/// Four positionally aligned series of length `number_of_years.max(0) + 1`.
/// Index 0 is the baseline row; index i is the end-of-year-i state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub total_assets: Vec<f64>,
    pub income: Vec<f64>,
    pub passive_income: Vec<f64>,
    pub expense: Vec<f64>,
}

impl ProjectionResult {
    pub fn year_count(&self) -> usize {
        self.total_assets.len()
    }
}
