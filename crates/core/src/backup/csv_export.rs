use csv::{QuoteStyle, WriterBuilder};

use crate::errors::{Error, Result};
use crate::holdings::Holding;

/// One-way CSV export of the holdings table.
///
/// Text fields are always quoted, with embedded quotes doubled per RFC
/// 4180; numeric fields stay bare so spreadsheets parse them as numbers.
pub fn export_holdings_csv(holdings: &[Holding]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::NonNumeric)
        .from_writer(Vec::new());

    writer
        .write_record([
            "Name",
            "Ticker",
            "Type",
            "Platform",
            "Quantity",
            "Invested",
            "CurrentValue",
            "NetPL",
            "Sector",
            "LastUpdated",
        ])
        .map_err(csv_error)?;

    for holding in holdings {
        writer
            .write_record([
                holding.name.as_str(),
                holding.ticker.as_deref().unwrap_or(""),
                holding.holding_type.label(),
                holding.platform.as_deref().unwrap_or(""),
                &holding.quantity.to_string(),
                &holding.invested_amount.to_string(),
                &holding.current_value.to_string(),
                &holding.net_pl().to_string(),
                holding.sector.as_deref().unwrap_or(""),
                holding.last_updated.as_str(),
            ])
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Unexpected(format!("CSV flush failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| Error::Unexpected(format!("CSV was not UTF-8: {}", e)))
}

fn csv_error(err: csv::Error) -> Error {
    Error::Unexpected(format!("CSV write failed: {}", err))
}
