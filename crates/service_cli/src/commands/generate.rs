//! Generate command implementation
//!
//! Generates three paths through the session scheduler and prints their
//! statistics, rescaled-range and DFA Hurst estimates and, optionally, the
//! final values of the projected price paths.

use serde::Serialize;
use sim_core::{GenerationResult, PathStatistics, SimulationParameters, PATH_COUNT};
use sim_paths::PriceProjection;
use sim_session::config::SimulatorConfig;
use tracing::info;

use crate::{OutputFormat, Result};

/// Printable summary of one committed generation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReport {
    request_id: u64,
    committed_at: String,
    parameters: SimulationParameters,
    statistics: [PathStatistics; PATH_COUNT],
    estimated_hurst: [Option<f64>; PATH_COUNT],
    dfa_hurst: [Option<f64>; PATH_COUNT],
    #[serde(skip_serializing_if = "Option::is_none")]
    projected_final_prices: Option<Vec<f64>>,
}

impl GenerateReport {
    /// Build the report, projecting price paths when `initial_price` is given
    pub fn new(result: &GenerationResult, initial_price: Option<f64>) -> Result<Self> {
        let projected_final_prices = initial_price
            .map(|price| projected_final_prices(result, price))
            .transpose()?;

        Ok(Self {
            request_id: result.request.id,
            committed_at: result.committed_at.to_rfc3339(),
            parameters: *result.parameters(),
            statistics: *result.statistics(),
            estimated_hurst: result.output.estimated_hurst,
            dfa_hurst: result.output.dfa_hurst,
            projected_final_prices,
        })
    }

    /// Render as a box-drawn table
    pub fn to_table(&self) -> String {
        let mut lines = Vec::new();
        lines.push(format!("Parameters: {}", self.parameters));
        lines.push("┌────────┬────────────┬────────────┬────────────┬────────────┬────────────┬──────────┬──────────┐".to_string());
        lines.push("│ Path   │ Final      │ Max        │ Min        │ Range      │ Avg |dX|   │ R/S H    │ DFA H    │".to_string());
        lines.push("├────────┼────────────┼────────────┼────────────┼────────────┼────────────┼──────────┼──────────┤".to_string());
        for (k, stats) in self.statistics.iter().enumerate() {
            lines.push(format!(
                "│ path{:<2} │ {:>10.4} │ {:>10.4} │ {:>10.4} │ {:>10.4} │ {:>10.6} │ {:>8} │ {:>8} │",
                k + 1,
                stats.final_value,
                stats.max_value,
                stats.min_value,
                stats.range,
                stats.avg_variation,
                render_estimate(self.estimated_hurst[k]),
                render_estimate(self.dfa_hurst[k]),
            ));
        }
        lines.push("└────────┴────────────┴────────────┴────────────┴────────────┴────────────┴──────────┴──────────┘".to_string());

        if let Some(prices) = &self.projected_final_prices {
            let rendered: Vec<String> = prices.iter().map(|p| format!("{:.2}", p)).collect();
            lines.push(format!("Projected final prices: {}", rendered.join(", ")));
        }
        lines.join("\n")
    }
}

fn render_estimate(estimate: Option<f64>) -> String {
    estimate.map_or_else(|| "n/a".to_string(), |h| format!("{:.3}", h))
}

fn projected_final_prices(result: &GenerationResult, initial_price: f64) -> Result<Vec<f64>> {
    let projection = PriceProjection::new(initial_price);
    (0..PATH_COUNT)
        .map(|k| -> Result<f64> {
            let prices = projection.project(&result.series().path(k))?;
            Ok(prices.last().copied().unwrap_or(initial_price))
        })
        .collect()
}

/// Run the generate command
pub async fn run(
    config: SimulatorConfig,
    format: OutputFormat,
    initial_price: Option<f64>,
) -> Result<()> {
    let (_scheduler, committed) = super::generate_once(&config).await?;
    let report = GenerateReport::new(&committed, initial_price)?;

    match format {
        OutputFormat::Table => println!("{}", report.to_table()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    info!(request_id = committed.request.id, "Generation complete");
    Ok(())
}
