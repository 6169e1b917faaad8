use super::types::{Configuration, ProjectionResult};

#[derive(Debug, Clone, Copy)]
struct YearRow {
    assets: f64,
    income: f64,
    passive_income: f64,
    expense: f64,
}

/// Projects year-by-year asset accumulation for the given configuration.
///
/// Deterministic and side-effect free: the same configuration always yields
/// the same result. A negative horizon is clamped to zero, leaving only the
/// baseline row.
pub fn project(configuration: &Configuration) -> ProjectionResult {
    let horizon = configuration.number_of_years.max(0) as usize;

    let mut total_assets = Vec::with_capacity(horizon + 1);
    let mut income = Vec::with_capacity(horizon + 1);
    let mut passive_income = Vec::with_capacity(horizon + 1);
    let mut expense = Vec::with_capacity(horizon + 1);

    let mut row = baseline_row(configuration);
    total_assets.push(row.assets);
    income.push(row.income);
    passive_income.push(row.passive_income);
    expense.push(row.expense);

    for year in 1..=horizon {
        row = step_year(configuration, year as i32, row);
        total_assets.push(row.assets);
        income.push(row.income);
        passive_income.push(row.passive_income);
        expense.push(row.expense);
    }

    ProjectionResult {
        total_assets,
        income,
        passive_income,
        expense,
    }
}

/// First index (baseline included) at which passive income covers expense,
/// `None` if the horizon never crosses.
pub fn independence_year(result: &ProjectionResult) -> Option<usize> {
    result
        .passive_income
        .iter()
        .zip(result.expense.iter())
        .position(|(passive, expense)| passive >= expense)
}

fn baseline_row(configuration: &Configuration) -> YearRow {
    YearRow {
        assets: configuration.total_assets,
        income: configuration.income,
        passive_income: configuration.total_assets * configuration.annualized_rate / 100.0,
        expense: configuration.expense,
    }
}

fn step_year(configuration: &Configuration, year: i32, prev: YearRow) -> YearRow {
    // Return on the prior year's asset base; the same term feeds the asset
    // recurrence below.
    let passive_income = prev.assets * configuration.annualized_rate / 100.0;
    let expense = prev.expense * (1.0 + configuration.inflation_rate / 100.0);
    let income = next_income(configuration, year, prev.income);
    let assets = prev.assets + passive_income + income - expense;

    YearRow {
        assets,
        income,
        passive_income,
        expense,
    }
}

fn next_income(configuration: &Configuration, year: i32, prev_income: f64) -> f64 {
    if year <= configuration.working_years {
        let candidate = prev_income * (1.0 + configuration.income_increase_rate / 100.0);
        if candidate >= configuration.maximum_income {
            configuration.maximum_income
        } else {
            candidate
        }
    } else if year == configuration.working_years.saturating_add(1) {
        // The floor applies exactly once, as a hard reset rather than a
        // growth step.
        configuration.minimum_income
    } else {
        prev_income * (1.0 + configuration.minimum_income_increase_rate / 100.0)
    }
}
