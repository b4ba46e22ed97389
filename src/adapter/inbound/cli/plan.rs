//! Handler for the `plan` command.

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::PlanArgs;
use crate::adapter::inbound::cli::{config, output};
use crate::domain::{AllocationStep, StepSource};
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::port::{PlanPreview, RebalanceRequest, RebalanceUseCase};

#[derive(Tabled)]
struct StepRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Currency")]
    currency: String,
    #[tabled(rename = "Yield")]
    effective_yield: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Source")]
    source: String,
}

impl StepRow {
    fn new(rank: usize, step: &AllocationStep) -> Self {
        Self {
            rank,
            product: step.product.id.to_string(),
            kind: step.product.kind.to_string(),
            currency: step.currency().to_string(),
            effective_yield: output::percent(step.effective_yield),
            amount: step
                .required_amount
                .map_or_else(|| "unbounded".to_string(), |amount| amount.to_string()),
            source: match &step.source {
                StepSource::Base => "base".to_string(),
                StepSource::Tier { key } => key.clone(),
            },
        }
    }
}

/// Execute the plan command.
pub async fn execute(args: &PlanArgs) -> Result<()> {
    let config = config::load(&args.config)?;
    let rebalancer = bootstrap::build_rebalancer(&config)?;

    let preview = rebalancer
        .preview(RebalanceRequest {
            include_locked: args.include_locked(),
        })
        .await?;

    print_preview(&preview)
}

/// Print the ranked steps.
pub fn print_preview(preview: &PlanPreview) -> Result<()> {
    if output::is_json() {
        let mut value = serde_json::to_value(preview)?;
        value["success"] = json!(true);
        output::json_output(&value);
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Ranked steps");
    if preview.steps.is_empty() {
        output::note("(no products available)");
        return Ok(());
    }

    let rows: Vec<StepRow> = preview
        .steps
        .iter()
        .enumerate()
        .map(|(index, step)| StepRow::new(index + 1, step))
        .collect();
    output::lines(&Table::new(rows).to_string());
    Ok(())
}
