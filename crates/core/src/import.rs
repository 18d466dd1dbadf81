use std::str::FromStr;
use tracing::debug;

use crate::models::asset::Asset;
use crate::models::transaction::{parse_tx_date, CreateTransactionInput, TransactionType};

/// Parse a transactions CSV into create inputs.
///
/// Header-driven: columns are matched by substring, case-insensitively —
/// `date`, `asset`, `type`, and `quantity` by name, with the amount column
/// accepted as anything containing `total`, `ils`, or `amount`. Asset and
/// type values are case-insensitive, and the `"0"` sentinel date is
/// accepted.
///
/// Rows missing a required field, or carrying an unparsable value, are
/// filtered out silently — input validation here is a prior, separate
/// concern and never becomes a valuation error.
pub fn parse_transactions_csv(csv: &str) -> Vec<CreateTransactionInput> {
    let mut lines = csv.trim().lines();
    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = header_line
        .split(',')
        .map(|h| h.trim().to_lowercase())
        .collect();

    let mut rows = Vec::new();
    for (line_no, line) in lines.enumerate() {
        let values: Vec<&str> = line.split(',').map(str::trim).collect();

        let mut date = None;
        let mut asset = None;
        let mut tx_type = None;
        let mut quantity = None;
        let mut total_ils = None;

        for (header, value) in headers.iter().zip(&values) {
            if header.contains("date") {
                date = parse_tx_date(value);
            } else if header.contains("asset") {
                asset = Asset::from_str(value).ok();
            } else if header.contains("type") {
                tx_type = TransactionType::from_str(value).ok();
            } else if header.contains("quantity") {
                quantity = parse_positive(value);
            } else if header.contains("total")
                || header.contains("ils")
                || header.contains("amount")
            {
                total_ils = parse_positive(value);
            }
        }

        match (date, asset, tx_type, quantity, total_ils) {
            (Some(date), Some(asset), Some(tx_type), Some(quantity), Some(total_ils)) => {
                rows.push(CreateTransactionInput {
                    date,
                    asset,
                    tx_type,
                    quantity,
                    total_ils,
                });
            }
            _ => {
                debug!(row = line_no + 2, "skipping malformed CSV row");
            }
        }
    }

    rows
}

fn parse_positive(value: &str) -> Option<f64> {
    let n: f64 = value.parse().ok()?;
    (n.is_finite() && n > 0.0).then_some(n)
}
