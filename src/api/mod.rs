use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::core::{
    BracketContribution, CalculationInput, CalculationResult, Comparison, Direction,
    INSURANCE_RATES, InputError, InsuranceBase, Region, RegimeConfig, RegimeId, SolveConfig,
    compare_regimes, compute_breakdown, compute_gross_to_net, list_regimes, regime_config,
    social_health_cap, solve_net_to_gross,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliDirection {
    GrossToNet,
    NetToGross,
}

impl From<CliDirection> for Direction {
    fn from(value: CliDirection) -> Self {
        match value {
            CliDirection::GrossToNet => Direction::GrossToNet,
            CliDirection::NetToGross => Direction::NetToGross,
        }
    }
}

impl From<Direction> for CliDirection {
    fn from(value: Direction) -> Self {
        match value {
            Direction::GrossToNet => CliDirection::GrossToNet,
            Direction::NetToGross => CliDirection::NetToGross,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiInsuranceBase {
    #[serde(alias = "official", alias = "grossSalary", alias = "gross_salary")]
    Gross,
    Other,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CalculatePayload {
    amount: Option<f64>,
    direction: Option<String>,
    dependents: Option<u32>,
    region: Option<u8>,
    regime: Option<String>,
    insurance_base: Option<ApiInsuranceBase>,
    insurance_salary: Option<f64>,
}

#[derive(Parser, Debug)]
#[command(
    name = "vn-salary calc",
    about = "Vietnamese personal income tax and gross/net salary calculator"
)]
struct Cli {
    #[arg(long, help = "Gross or net monthly income in VND, depending on --direction")]
    amount: f64,
    #[arg(long, value_enum, default_value_t = CliDirection::GrossToNet)]
    direction: CliDirection,
    #[arg(long, default_value_t = 0, help = "Number of registered dependents")]
    dependents: u32,
    #[arg(long, default_value_t = 1, help = "Minimum-wage region, 1 to 4")]
    region: u8,
    #[arg(long, default_value = "2025", help = "Tax regime: 2025, 2026-h1 or 2026-h2")]
    regime: String,
    #[arg(
        long,
        help = "Salary insurance is declared on, if different from gross (VND)"
    )]
    insurance_salary: Option<f64>,
    #[arg(long, help = "Run the input under every regime side by side")]
    compare: bool,
    #[arg(long, help = "Print JSON instead of a table")]
    json: bool,
}

#[derive(Debug)]
struct ApiRequest {
    input: CalculationInput,
    regime: RegimeId,
}

/// Monetary figures rounded to whole dong for display.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
struct DisplayResult {
    gross: i64,
    net: i64,
    social_ins: i64,
    health_ins: i64,
    unemployment_ins: i64,
    total_insurance: i64,
    pre_tax_income: i64,
    total_deduction: i64,
    dependent_deduction: i64,
    taxable_income: i64,
    pit: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BreakdownRow {
    level: usize,
    rate_percent: f64,
    upper_bound: Option<i64>,
    income: i64,
    tax: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolverInfo {
    iterations: u32,
    converged: bool,
    hit_ceiling: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BracketSummary {
    level: usize,
    upper_bound: Option<i64>,
    rate_percent: f64,
    subtract: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegionSummary {
    region: Region,
    min_wage: i64,
    unemployment_cap: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegimeSummary {
    id: RegimeId,
    label: &'static str,
    note: Option<&'static str>,
    personal_deduction: i64,
    dependent_deduction: i64,
    brackets: Vec<BracketSummary>,
    regions: Vec<RegionSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InsuranceSummary {
    social_rate_percent: f64,
    health_rate_percent: f64,
    unemployment_rate_percent: f64,
    social_health_cap: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegimesResponse {
    insurance: InsuranceSummary,
    regimes: Vec<RegimeSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CalculateResponse {
    regime: RegimeSummary,
    direction: Direction,
    region: Region,
    dependents: u32,
    result: DisplayResult,
    breakdown: Vec<BreakdownRow>,
    solver: Option<SolverInfo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompareRow {
    regime: RegimeId,
    label: &'static str,
    result: DisplayResult,
    net_diff_vs_baseline: i64,
    pit_diff_vs_baseline: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompareResponse {
    direction: Direction,
    rows: Vec<CompareRow>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn validate_amount(value: f64, field: &'static str) -> Result<f64, InputError> {
    if !value.is_finite() || value < 0.0 {
        return Err(InputError::InvalidAmount { field });
    }
    Ok(value)
}

fn build_request(cli: &Cli) -> Result<ApiRequest, InputError> {
    let amount = validate_amount(cli.amount, "amount")?;
    let insurance_base = match cli.insurance_salary {
        Some(v) => InsuranceBase::OnOtherAmount(validate_amount(v, "insuranceSalary")?),
        None => InsuranceBase::OnGrossSalary,
    };

    Ok(ApiRequest {
        input: CalculationInput {
            amount,
            direction: cli.direction.into(),
            dependents: cli.dependents,
            region: Region::try_from(cli.region)?,
            insurance_base,
        },
        regime: cli.regime.parse()?,
    })
}

fn router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/calculate",
            get(calculate_get_handler).post(calculate_post_handler),
        )
        .route(
            "/api/compare",
            get(compare_get_handler).post(compare_post_handler),
        )
        .route("/api/regimes", get(regimes_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("salary calculator listening on http://{addr}");
    info!("local access: http://127.0.0.1:{port}/");

    axum::serve(listener, router()).await
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

async fn calculate_get_handler(Query(payload): Query<CalculatePayload>) -> Response {
    calculate_handler_impl(payload)
}

async fn calculate_post_handler(Json(payload): Json<CalculatePayload>) -> Response {
    calculate_handler_impl(payload)
}

async fn compare_get_handler(Query(payload): Query<CalculatePayload>) -> Response {
    compare_handler_impl(payload)
}

async fn compare_post_handler(Json(payload): Json<CalculatePayload>) -> Response {
    compare_handler_impl(payload)
}

async fn regimes_handler() -> Response {
    json_response(StatusCode::OK, build_regimes_response())
}

fn calculate_handler_impl(payload: CalculatePayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
    };
    debug!(?request, "calculate");
    json_response(StatusCode::OK, build_calculate_response(&request))
}

fn compare_handler_impl(payload: CalculatePayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
    };
    debug!(?request, "compare");
    json_response(
        StatusCode::OK,
        build_compare_response(&compare_regimes(&request.input)),
    )
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
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
fn api_request_from_json(json: &str) -> Result<ApiRequest, String> {
    let payload = serde_json::from_str::<CalculatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload).map_err(|e| e.to_string())
}

fn api_request_from_payload(payload: CalculatePayload) -> Result<ApiRequest, InputError> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.amount {
        cli.amount = v;
    }
    if let Some(v) = payload.direction {
        cli.direction = v.parse::<Direction>()?.into();
    }
    if let Some(v) = payload.dependents {
        cli.dependents = v;
    }
    if let Some(v) = payload.region {
        cli.region = v;
    }
    if let Some(v) = payload.regime {
        cli.regime = v;
    }
    // A declared salary only counts when the caller picked the "other" base.
    cli.insurance_salary = match payload.insurance_base {
        Some(ApiInsuranceBase::Other) => payload.insurance_salary,
        Some(ApiInsuranceBase::Gross) => None,
        None => payload.insurance_salary,
    };

    build_request(&cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        amount: 0.0,
        direction: CliDirection::GrossToNet,
        dependents: 0,
        region: 1,
        regime: RegimeId::Current2025.as_str().to_string(),
        insurance_salary: None,
        compare: false,
        json: true,
    }
}

fn round_money(value: f64) -> i64 {
    value.round() as i64
}

fn display_result(result: &CalculationResult, regime: &RegimeConfig) -> DisplayResult {
    DisplayResult {
        gross: round_money(result.gross),
        net: round_money(result.net),
        social_ins: round_money(result.social_ins),
        health_ins: round_money(result.health_ins),
        unemployment_ins: round_money(result.unemployment_ins),
        total_insurance: round_money(result.total_insurance()),
        pre_tax_income: round_money(result.pre_tax_income),
        total_deduction: round_money(result.total_deduction),
        dependent_deduction: round_money(
            (result.total_deduction - regime.personal_deduction).max(0.0),
        ),
        taxable_income: round_money(result.taxable_income),
        pit: round_money(result.pit),
    }
}

fn breakdown_rows(rows: &[BracketContribution]) -> Vec<BreakdownRow> {
    rows.iter()
        .map(|row| BreakdownRow {
            level: row.level,
            rate_percent: percent(row.rate),
            upper_bound: row.upper_bound.map(round_money),
            income: round_money(row.income),
            tax: round_money(row.tax),
        })
        .collect()
}

fn percent(rate: f64) -> f64 {
    (rate * 1_000.0).round() / 10.0
}

fn regime_summary(regime: &RegimeConfig) -> RegimeSummary {
    RegimeSummary {
        id: regime.id,
        label: regime.label,
        note: regime.note,
        personal_deduction: round_money(regime.personal_deduction),
        dependent_deduction: round_money(regime.dependent_deduction),
        brackets: regime
            .brackets
            .iter()
            .enumerate()
            .map(|(i, b)| BracketSummary {
                level: i + 1,
                upper_bound: b.upper_bound.map(round_money),
                rate_percent: percent(b.marginal_rate),
                subtract: round_money(b.cumulative_subtract),
            })
            .collect(),
        regions: Region::ALL
            .iter()
            .map(|region| RegionSummary {
                region: *region,
                min_wage: round_money(regime.regional_min_wage(*region)),
                unemployment_cap: round_money(regime.unemployment_cap(*region)),
            })
            .collect(),
    }
}

fn build_regimes_response() -> RegimesResponse {
    RegimesResponse {
        insurance: InsuranceSummary {
            social_rate_percent: percent(INSURANCE_RATES.social),
            health_rate_percent: percent(INSURANCE_RATES.health),
            unemployment_rate_percent: percent(INSURANCE_RATES.unemployment),
            social_health_cap: round_money(social_health_cap()),
        },
        regimes: list_regimes()
            .iter()
            .map(|id| regime_summary(regime_config(*id)))
            .collect(),
    }
}

fn build_calculate_response(request: &ApiRequest) -> CalculateResponse {
    let regime = regime_config(request.regime);
    let (result, solver) = match request.input.direction {
        Direction::GrossToNet => (compute_gross_to_net(&request.input, regime), None),
        Direction::NetToGross => {
            let outcome = solve_net_to_gross(&request.input, regime, SolveConfig::default());
            (
                outcome.result,
                Some(SolverInfo {
                    iterations: outcome.iterations,
                    converged: outcome.converged,
                    hit_ceiling: outcome.hit_ceiling,
                }),
            )
        }
    };

    CalculateResponse {
        regime: regime_summary(regime),
        direction: request.input.direction,
        region: request.input.region,
        dependents: request.input.dependents,
        result: display_result(&result, regime),
        breakdown: breakdown_rows(&compute_breakdown(result.taxable_income, regime)),
        solver,
    }
}

fn build_compare_response(comparison: &Comparison) -> CompareResponse {
    CompareResponse {
        direction: comparison.direction,
        rows: comparison
            .outcomes
            .iter()
            .map(|outcome| {
                let regime = regime_config(outcome.regime);
                CompareRow {
                    regime: outcome.regime,
                    label: regime.label,
                    result: display_result(&outcome.result, regime),
                    net_diff_vs_baseline: round_money(outcome.net_diff_vs_baseline),
                    pit_diff_vs_baseline: round_money(outcome.pit_diff_vs_baseline),
                }
            })
            .collect(),
    }
}

/// Runs the `calc` subcommand. `args[0]` is taken as the command name.
/// Returns the process exit code.
pub fn run_cli<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return e.exit_code();
        }
    };

    let request = match build_request(&cli) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };

    let rendered = if cli.compare {
        let response = build_compare_response(&compare_regimes(&request.input));
        if cli.json {
            serde_json::to_string_pretty(&response)
        } else {
            Ok(render_compare_table(&response))
        }
    } else {
        let response = build_calculate_response(&request);
        if cli.json {
            serde_json::to_string_pretty(&response)
        } else {
            Ok(render_result_table(&response))
        }
    };

    match rendered {
        Ok(text) => {
            println!("{text}");
            0
        }
        Err(e) => {
            eprintln!("error: failed to serialize result: {e}");
            1
        }
    }
}

fn format_vnd(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn format_signed_vnd(value: i64) -> String {
    if value >= 0 {
        format!("+{}", format_vnd(value))
    } else {
        format_vnd(value)
    }
}

fn render_result_table(response: &CalculateResponse) -> String {
    let r = &response.result;
    let mut lines = vec![
        format!("Regime: {} ({})", response.regime.id, response.regime.label),
        format!("{:<28}{:>16}", "Gross", format_vnd(r.gross)),
        format!("{:<28}{:>16}", "Social insurance", format_vnd(r.social_ins)),
        format!("{:<28}{:>16}", "Health insurance", format_vnd(r.health_ins)),
        format!("{:<28}{:>16}", "Unemployment insurance", format_vnd(r.unemployment_ins)),
        format!("{:<28}{:>16}", "Pre-tax income", format_vnd(r.pre_tax_income)),
        format!(
            "{:<28}{:>16}",
            "Personal deduction",
            format_vnd(response.regime.personal_deduction)
        ),
        format!("{:<28}{:>16}", "Dependent deduction", format_vnd(r.dependent_deduction)),
        format!("{:<28}{:>16}", "Taxable income", format_vnd(r.taxable_income)),
        format!("{:<28}{:>16}", "Personal income tax", format_vnd(r.pit)),
        format!("{:<28}{:>16}", "Net", format_vnd(r.net)),
    ];
    if !response.breakdown.is_empty() {
        lines.push(String::new());
        for row in &response.breakdown {
            lines.push(format!(
                "  Bracket {} ({}%){:>16}{:>16}",
                row.level,
                row.rate_percent,
                format_vnd(row.income),
                format_vnd(row.tax)
            ));
        }
    }
    lines.join("\n")
}

fn render_compare_table(response: &CompareResponse) -> String {
    let mut lines = vec![format!(
        "{:<10}{:>16}{:>16}{:>16}{:>16}",
        "Regime", "Gross", "Net", "PIT", "Net vs 2025"
    )];
    for row in &response.rows {
        lines.push(format!(
            "{:<10}{:>16}{:>16}{:>16}{:>16}",
            row.regime.as_str(),
            format_vnd(row.result.gross),
            format_vnd(row.result.net),
            format_vnd(row.result.pit),
            format_signed_vnd(row.net_diff_vs_baseline)
        ));
    }
    lines.join("\n")
}
