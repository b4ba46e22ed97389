//! Handler for the `run` command.

use crate::adapter::inbound::cli::command::PlanArgs;
use crate::adapter::inbound::cli::{config, output};
use crate::domain::{Action, PlanTermination, Side};
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::port::{RebalanceRequest, RebalanceUseCase, RunReport};

/// Execute the run command.
pub async fn execute(args: &PlanArgs) -> Result<()> {
    let config = config::load(&args.config)?;
    let rebalancer = bootstrap::build_rebalancer(&config)?;

    output::header(env!("CARGO_PKG_VERSION"));

    let report = rebalancer
        .rebalance(RebalanceRequest {
            include_locked: args.include_locked(),
        })
        .await?;

    print_report(&report)
}

/// Print a completed run.
pub fn print_report(report: &RunReport) -> Result<()> {
    if output::is_json() {
        output::json_output(&serde_json::to_value(report)?);
        return Ok(());
    }

    output::section("Actions");
    if report.actions.is_empty() {
        output::note("(none)");
    }
    for action in &report.actions {
        output::success(&describe(action));
    }

    output::section("Plan");
    output::field("Steps", report.steps.len());
    output::field("Outcome", termination(&report.termination));

    output::section("Sweep");
    if report.swept.is_empty() {
        output::note("(nothing left to sweep)");
    }
    for action in &report.swept {
        output::success(&describe(action));
    }

    Ok(())
}

fn termination(termination: &PlanTermination) -> String {
    match termination {
        PlanTermination::Exhausted => "all steps funded".to_string(),
        PlanTermination::Halted { step, reason } => {
            format!("halted at step {} ({reason})", step + 1)
        }
    }
}

/// One-line description of an executed action.
#[must_use]
pub fn describe(action: &Action) -> String {
    match action {
        Action::Redeemed {
            product_id,
            currency,
            amount,
        } => format!(
            "Redeemed {} {} from {}",
            output::highlight(amount),
            currency,
            output::muted(product_id)
        ),
        Action::Transferred { currency, amount } => format!(
            "Moved {} {} from funding to spot",
            output::highlight(amount),
            currency
        ),
        Action::Converted {
            currency,
            side,
            quantity,
            quote_amount,
        } => {
            let verb = match side {
                Side::Buy => "Bought",
                Side::Sell => "Sold",
            };
            format!(
                "{verb} {} {} for {}",
                output::highlight(quantity),
                currency,
                output::muted(quote_amount)
            )
        }
        Action::Subscribed {
            product_id,
            currency,
            amount,
        } => format!(
            "Subscribed {} {} to {}",
            output::highlight(amount),
            currency,
            output::muted(product_id)
        ),
    }
}
