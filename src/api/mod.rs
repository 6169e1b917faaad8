use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    Configuration, GoalSolveConfig, GoalType, independence_year, project, solve_goal,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiGoalType {
    #[serde(alias = "requiredRate", alias = "required_rate", alias = "rate")]
    RequiredRate,
    #[serde(alias = "requiredAssets", alias = "required_assets", alias = "assets")]
    RequiredAssets,
}

impl From<ApiGoalType> for GoalType {
    fn from(value: ApiGoalType) -> Self {
        match value {
            ApiGoalType::RequiredRate => GoalType::RequiredRate,
            ApiGoalType::RequiredAssets => GoalType::RequiredAssets,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "fiplan",
    about = "Deterministic financial-independence projector (assets, income, passive income, expense)"
)]
struct Cli {
    #[arg(long, default_value_t = 30, help = "Projection horizon in years")]
    number_of_years: i32,
    #[arg(long, default_value_t = 10.0, help = "Starting net assets")]
    total_assets: f64,
    #[arg(
        long,
        default_value_t = 20.0,
        help = "Annual return on assets in percent"
    )]
    annualized_rate: f64,
    #[arg(long, default_value_t = 20.0, help = "Starting annual income")]
    income: f64,
    #[arg(
        long,
        default_value_t = 8.0,
        help = "Annual income growth during the working years in percent"
    )]
    income_increase_rate: f64,
    #[arg(long, default_value_t = 10.0, help = "Starting annual expense")]
    expense: f64,
    #[arg(
        long,
        default_value_t = 4.0,
        help = "Annual expense growth in percent"
    )]
    inflation_rate: f64,
    #[arg(
        long,
        default_value_t = 50.0,
        help = "Cap on income during the working years"
    )]
    maximum_income: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Income floor applied in the first year after the working years"
    )]
    minimum_income: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Annual growth of income after the floor applies, in percent"
    )]
    minimum_income_increase_rate: f64,
    #[arg(long, default_value_t = 10, help = "Last year with active income")]
    working_years: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    number_of_years: Option<i32>,
    total_assets: Option<f64>,
    annualized_rate: Option<f64>,
    income: Option<f64>,
    income_increase_rate: Option<f64>,
    expense: Option<f64>,
    inflation_rate: Option<f64>,
    maximum_income: Option<f64>,
    minimum_income: Option<f64>,
    minimum_income_increase_rate: Option<f64>,
    working_years: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SolvePayload {
    #[serde(flatten)]
    configuration: ProjectPayload,
    goal: Option<ApiGoalType>,
    target_year: Option<i32>,
    search_min: Option<f64>,
    search_max: Option<f64>,
    tolerance: Option<f64>,
    max_iterations: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    number_of_years: i32,
    year_labels: Vec<String>,
    total_assets: Vec<f64>,
    income: Vec<f64>,
    passive_income: Vec<f64>,
    expense: Vec<f64>,
    independence_year: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_configuration(cli: Cli) -> Result<Configuration, String> {
    if cli.number_of_years < 0 {
        return Err("--number-of-years must be >= 0".to_string());
    }

    if cli.working_years < 0 {
        return Err("--working-years must be >= 0".to_string());
    }

    for (name, value) in [
        ("--total-assets", cli.total_assets),
        ("--annualized-rate", cli.annualized_rate),
        ("--income", cli.income),
        ("--income-increase-rate", cli.income_increase_rate),
        ("--expense", cli.expense),
        ("--inflation-rate", cli.inflation_rate),
        ("--maximum-income", cli.maximum_income),
        ("--minimum-income", cli.minimum_income),
        (
            "--minimum-income-increase-rate",
            cli.minimum_income_increase_rate,
        ),
    ] {
        if !value.is_finite() {
            return Err(format!("{name} must be a finite number"));
        }
    }

    Ok(Configuration {
        number_of_years: cli.number_of_years,
        total_assets: cli.total_assets,
        annualized_rate: cli.annualized_rate,
        income: cli.income,
        income_increase_rate: cli.income_increase_rate,
        expense: cli.expense,
        inflation_rate: cli.inflation_rate,
        maximum_income: cli.maximum_income,
        minimum_income: cli.minimum_income,
        minimum_income_increase_rate: cli.minimum_income_increase_rate,
        working_years: cli.working_years,
    })
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .route("/api/solve", post(solve_post_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("fiplan HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

pub fn run_projection_cli(args: Vec<String>) -> Result<(), String> {
    let cli = Cli::parse_from(args);
    let configuration = build_configuration(cli)?;
    let response = build_project_response(&configuration);
    let json = serde_json::to_string_pretty(&response)
        .map_err(|e| format!("Failed to serialize projection: {e}"))?;
    println!("{json}");
    Ok(())
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(Query(payload): Query<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_handler_impl(payload: ProjectPayload) -> Response {
    let configuration = match configuration_from_payload(payload) {
        Ok(configuration) => configuration,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    json_response(StatusCode::OK, build_project_response(&configuration))
}

async fn solve_post_handler(Json(payload): Json<SolvePayload>) -> Response {
    let (configuration, config) = match solve_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    match solve_goal(&configuration, config) {
        Ok(result) => json_response(StatusCode::OK, result),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn configuration_from_json(json: &str) -> Result<Configuration, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    configuration_from_payload(payload)
}

#[cfg(test)]
fn solve_request_from_json(json: &str) -> Result<(Configuration, GoalSolveConfig), String> {
    let payload = serde_json::from_str::<SolvePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    solve_request_from_payload(payload)
}

fn configuration_from_payload(payload: ProjectPayload) -> Result<Configuration, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.number_of_years {
        cli.number_of_years = v;
    }
    if let Some(v) = payload.total_assets {
        cli.total_assets = v;
    }
    if let Some(v) = payload.annualized_rate {
        cli.annualized_rate = v;
    }
    if let Some(v) = payload.income {
        cli.income = v;
    }
    if let Some(v) = payload.income_increase_rate {
        cli.income_increase_rate = v;
    }
    if let Some(v) = payload.expense {
        cli.expense = v;
    }
    if let Some(v) = payload.inflation_rate {
        cli.inflation_rate = v;
    }
    if let Some(v) = payload.maximum_income {
        cli.maximum_income = v;
    }
    if let Some(v) = payload.minimum_income {
        cli.minimum_income = v;
    }
    if let Some(v) = payload.minimum_income_increase_rate {
        cli.minimum_income_increase_rate = v;
    }
    if let Some(v) = payload.working_years {
        cli.working_years = v;
    }

    build_configuration(cli)
}

fn solve_request_from_payload(
    payload: SolvePayload,
) -> Result<(Configuration, GoalSolveConfig), String> {
    let configuration = configuration_from_payload(payload.configuration)?;

    let goal_type = payload
        .goal
        .map(GoalType::from)
        .unwrap_or(GoalType::RequiredRate);
    let (default_min, default_max) = match goal_type {
        GoalType::RequiredRate => (0.0, 100.0),
        GoalType::RequiredAssets => (0.0, 1_000_000.0),
    };

    let config = GoalSolveConfig {
        goal_type,
        target_year: payload
            .target_year
            .unwrap_or(configuration.number_of_years),
        search_min: payload.search_min.unwrap_or(default_min),
        search_max: payload.search_max.unwrap_or(default_max),
        tolerance: payload.tolerance.unwrap_or(0.01),
        max_iterations: payload.max_iterations.unwrap_or(64),
    };

    Ok((configuration, config))
}

fn default_cli_for_api() -> Cli {
    Cli {
        number_of_years: 30,
        total_assets: 10.0,
        annualized_rate: 20.0,
        income: 20.0,
        income_increase_rate: 8.0,
        expense: 10.0,
        inflation_rate: 4.0,
        maximum_income: 50.0,
        minimum_income: 0.0,
        minimum_income_increase_rate: 0.0,
        working_years: 10,
    }
}

fn build_project_response(configuration: &Configuration) -> ProjectResponse {
    let result = project(configuration);
    let independence = independence_year(&result).map(|year| year as u32);
    let year_labels = (0..result.year_count())
        .map(|year| format!("Year {year}"))
        .collect();

    ProjectResponse {
        number_of_years: result.year_count() as i32 - 1,
        year_labels,
        total_assets: result.total_assets,
        income: result.income,
        passive_income: result.passive_income,
        expense: result.expense,
        independence_year: independence,
    }
}
