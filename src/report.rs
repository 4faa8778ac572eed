//! Read-side views over a transaction record: the list-row summary and the
//! plain-text detail sections.

use crate::core::round6;
use crate::models::TransactionRecord;

/// The four list-row figures: lots, committed funding, entry price and
/// floating profit, attributed per the record's profit mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSummary {
    pub lots: f64,
    pub funding: f64,
    pub entry_price: f64,
    pub profit: f64,
}

impl PositionSummary {
    pub fn from_record(record: &TransactionRecord) -> Self {
        let entry = &record.entry;
        match entry.profit_attribution.rung() {
            // Single-rung attribution: that rung's size and price. Floating
            // profit is not attributable to one rung and reports 0.
            Some(slot) => {
                let rung = entry.rung(slot);
                PositionSummary {
                    lots: rung.derived.position_size,
                    funding: round6(rung.derived.position_size * rung.derived.entry_price),
                    entry_price: rung.derived.entry_price,
                    profit: 0.0,
                }
            }
            // Sum mode: totals across the ladder; profit comes from the
            // floating-profit stage and price from the exit order.
            None => {
                let lots: f64 = entry.rungs().map(|(_, r)| r.derived.position_size).sum();
                let funding: f64 = entry
                    .rungs()
                    .map(|(_, r)| r.derived.position_size * r.derived.entry_price)
                    .sum();
                PositionSummary {
                    lots,
                    funding: round6(funding),
                    entry_price: record.profit.exit_lot_price,
                    profit: record.profit.derived.unrealized_profit,
                }
            }
        }
    }
}

/// Undefined ratios (zero denominators) display as 0 by convention.
fn display_ratio(ratio: Option<f64>) -> f64 {
    ratio.unwrap_or(0.0)
}

pub fn render_basis(record: &TransactionRecord) -> String {
    let basis = &record.basis;
    let meta = &record.meta;
    let mut out = String::new();
    out.push_str("Basis\n");
    out.push_str(&format!("  instrument:         {}\n", meta.name));
    out.push_str(&format!("  tick value:         {}\n", meta.tick_value));
    out.push_str(&format!("  total capital:      {}\n", basis.total_capital));
    out.push_str(&format!("  capital ratio:      {}%\n", basis.capital_ratio));
    out.push_str(&format!("  margin per lot:     {}\n", basis.margin));
    out.push_str(&format!(
        "  capital in use:     {}\n",
        basis.derived.capital_in_use
    ));
    out.push_str(&format!(
        "  max tradable lots:  {}\n",
        basis.derived.max_tradable_lots
    ));
    out.push_str(&format!(
        "  margin in use:      {}\n",
        basis.derived.margin_in_use
    ));
    out.push_str(&format!(
        "  risk ratio:         {}\n",
        display_ratio(basis.derived.risk_ratio)
    ));
    out.push_str(&format!(
        "  actual tick value:  {}\n",
        basis.derived.actual_tick_value
    ));
    out
}

pub fn render_entry(record: &TransactionRecord) -> String {
    let entry = &record.entry;
    let mut out = String::new();
    out.push_str("Entry ladder\n");
    out.push_str(&format!("  direction:          {}\n", entry.direction));
    out.push_str(&format!("  base entry price:   {}\n", entry.base_entry_price));
    out.push_str(&format!(
        "  profit attribution: {}\n",
        entry.profit_attribution
    ));
    for (slot, rung) in entry.rungs() {
        out.push_str(&format!(
            "  {:<4} entry {} size {} stop {} breakeven {}\n",
            slot,
            rung.derived.entry_price,
            rung.derived.position_size,
            rung.derived.stop_loss_price,
            rung.derived.breakeven_price,
        ));
    }
    out
}

pub fn render_profit(record: &TransactionRecord) -> String {
    let profit = &record.profit;
    let mut out = String::new();
    out.push_str("Floating profit\n");
    out.push_str(&format!("  average price:      {}\n", profit.avg_price));
    out.push_str(&format!("  market price:       {}\n", profit.market_price));
    out.push_str(&format!("  commission:         {}\n", record.meta.commission));
    out.push_str(&format!(
        "  profit per tick:    {}\n",
        profit.derived.profit_per_tick
    ));
    out.push_str(&format!(
        "  unrealized profit:  {}\n",
        profit.derived.unrealized_profit
    ));
    out.push_str(&format!(
        "  profit ratio:       {}\n",
        display_ratio(profit.derived.unrealized_profit_ratio)
    ));
    out.push_str(&format!(
        "  exit lots:          {}\n",
        profit.derived.exit_lot_size
    ));
    out.push_str(&format!(
        "  breakeven price:    {}\n",
        profit.derived.breakeven_price
    ));
    out.push_str(&format!(
        "  breakeven vs ema:   {}\n",
        profit.derived.breakeven_ema_delta
    ));
    out
}

pub fn render_record(record: &TransactionRecord) -> String {
    let mut out = String::new();
    out.push_str(&render_basis(record));
    out.push('\n');
    out.push_str(&render_entry(record));
    out.push('\n');
    out.push_str(&render_profit(record));
    out
}
