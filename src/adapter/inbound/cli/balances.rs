//! Handler for the `balances` command.

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::ConfigPathArg;
use crate::adapter::inbound::cli::{config, output};
use crate::domain::BalanceSnapshot;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::port::RebalanceUseCase;

#[derive(Tabled)]
struct BalanceRow {
    #[tabled(rename = "Currency")]
    currency: String,
    #[tabled(rename = "Funding")]
    funding: String,
    #[tabled(rename = "Spot")]
    spot: String,
    #[tabled(rename = "Earn")]
    earn: String,
    #[tabled(rename = "Total")]
    total: String,
}

/// Execute the balances command.
pub async fn execute(args: &ConfigPathArg) -> Result<()> {
    let config = config::load(&args.config)?;
    let rebalancer = bootstrap::build_rebalancer(&config)?;
    let balances = rebalancer.balances().await?;
    print_balances(&balances)
}

/// Print a balance snapshot.
pub fn print_balances(balances: &BalanceSnapshot) -> Result<()> {
    if output::is_json() {
        output::json_output(&json!({
            "success": true,
            "balances": balances,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Balances");

    let rows: Vec<BalanceRow> = balances
        .iter()
        .map(|(currency, balance)| BalanceRow {
            currency: currency.to_string(),
            funding: balance.funding.to_string(),
            spot: balance.spot.to_string(),
            earn: balance.earn.to_string(),
            total: balance.total().to_string(),
        })
        .collect();
    output::lines(&Table::new(rows).to_string());
    output::field("Pool", balances.available_pool().total());
    Ok(())
}
