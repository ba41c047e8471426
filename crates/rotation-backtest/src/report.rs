//! Replay report generation.

use rotation_core::types::Instrument;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ReplayConfig, ReplayStats};

/// Complete replay report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayReport {
    /// Configuration used
    pub config: ReplayConfig,
    /// Statistics
    pub stats: ReplayStats,
    /// Cash left in the paper account
    pub final_cash: Decimal,
    /// Positions held after the last session
    pub final_positions: Vec<(Instrument, Decimal)>,
}

impl ReplayReport {
    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                      REPLAY REPORT                         \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str("PERFORMANCE\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!(
            "  Initial Cash:        ${:.2}\n",
            self.stats.initial_cash
        ));
        s.push_str(&format!(
            "  Final Equity:        ${:.2}\n",
            self.stats.final_equity
        ));
        s.push_str(&format!(
            "  Total Return:        {:.2}%\n",
            self.stats.total_return_pct
        ));
        s.push_str(&format!(
            "  Max Drawdown:        {:.2}%\n",
            self.stats.max_drawdown_pct
        ));
        s.push_str(&format!(
            "  Sharpe Ratio:        {:.2}\n",
            self.stats.sharpe_ratio
        ));
        s.push('\n');

        s.push_str("SCHEDULE\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Cycles Run:          {}\n", self.stats.cycles));
        s.push_str(&format!("  Rebalances:          {}\n", self.stats.rebalances));
        s.push_str(&format!("  Suppressed:          {}\n", self.stats.suppressed));
        s.push_str(&format!("  Idle:                {}\n", self.stats.idle));
        s.push_str(&format!("  Orders:              {}\n", self.stats.orders));
        s.push('\n');

        s.push_str("FINAL HOLDINGS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Cash:                ${:.2}\n", self.final_cash));
        for (instrument, quantity) in &self.final_positions {
            s.push_str(&format!("  {:<20} {:.4}\n", instrument.as_str(), quantity));
        }
        s.push('\n');

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV (equity curve only).
    pub fn equity_to_csv(&self) -> String {
        let mut csv = String::from("date,equity\n");
        for (date, equity) in &self.stats.equity_curve {
            csv.push_str(&format!("{},{}\n", date, equity));
        }
        csv
    }
}
