//! Plain-text and JSON renderings of a [`VisitBill`].
//!
//! Amounts are printed with two decimals and no currency symbol;
//! locale-aware formatting belongs to the console UI.

use std::io::Write;

use serde_json::json;

use xspace_core::billing::{bill_visit, VisitBill};
use xspace_core::rates::RateConfig;
use xspace_core::types::{Amount, Timestamp};
use xspace_core::visit::Visit;

use crate::config::OutputFormat;

/// Bill `visit` at `now` and write one rendered line to `out`.
pub fn write_quote<W: Write>(
    out: &mut W,
    format: OutputFormat,
    visit: &Visit,
    rates: &RateConfig,
    now: Timestamp,
) -> anyhow::Result<VisitBill> {
    let bill = bill_visit(visit, now, rates);
    writeln!(out, "{}", render(format, visit, &bill, now)?)?;
    out.flush()?;
    Ok(bill)
}

/// Render `bill` for `visit` as computed at `now`.
pub fn render(
    format: OutputFormat,
    visit: &Visit,
    bill: &VisitBill,
    now: Timestamp,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(visit, bill)),
        OutputFormat::Json => render_json(visit, bill, now),
    }
}

pub fn render_text(visit: &Visit, bill: &VisitBill) -> String {
    format!(
        "visit {id} [{status}] {tier}, {people} {people_word}: \
         {minutes} min net, {hours} h billed, time {time}, products {products}, total {total}",
        id = visit.id,
        status = bill.status.label(),
        tier = bill.room_tier.label(),
        people = bill.number_of_people,
        people_word = if bill.number_of_people == 1 { "person" } else { "people" },
        minutes = bill.net_minutes,
        hours = bill.billable_hours,
        time = format_amount(bill.time_cost),
        products = format_amount(bill.products_total),
        total = format_amount(bill.total),
    )
}

/// One JSON object per line: the bill plus the visit id and clock used.
pub fn render_json(visit: &Visit, bill: &VisitBill, now: Timestamp) -> anyhow::Result<String> {
    let value = json!({
        "visitId": visit.id,
        "computedAt": now,
        "bill": bill,
    });
    Ok(serde_json::to_string(&value)?)
}

pub fn format_amount(amount: Amount) -> String {
    format!("{amount:.2}")
}
