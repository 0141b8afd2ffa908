use std::io::Read;

use serde::{Deserialize, Deserializer};

#[derive(Debug)]
pub(crate) struct SheetRecord {
    pub(crate) kpi_id: String,
    pub(crate) fiscal_year: u16,
    pub(crate) area_name: String,
    pub(crate) target: Option<f64>,
    pub(crate) months: [Option<f64>; 12],
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<SheetRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<SheetRow>() {
        let row = record?;
        records.push(SheetRecord {
            kpi_id: row.kpi_id.trim().to_string(),
            fiscal_year: row.fiscal_year,
            area_name: row.area.trim().to_string(),
            target: row.target,
            months: [
                row.oct, row.nov, row.dec, row.jan, row.feb, row.mar, row.apr, row.may,
                row.jun, row.jul, row.aug, row.sep,
            ],
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct SheetRow {
    #[serde(rename = "KPI ID")]
    kpi_id: String,
    #[serde(rename = "Fiscal Year")]
    fiscal_year: u16,
    #[serde(rename = "Area")]
    area: String,
    #[serde(rename = "Target", default, deserialize_with = "blank_or_number")]
    target: Option<f64>,
    #[serde(rename = "Oct", default, deserialize_with = "blank_or_number")]
    oct: Option<f64>,
    #[serde(rename = "Nov", default, deserialize_with = "blank_or_number")]
    nov: Option<f64>,
    #[serde(rename = "Dec", default, deserialize_with = "blank_or_number")]
    dec: Option<f64>,
    #[serde(rename = "Jan", default, deserialize_with = "blank_or_number")]
    jan: Option<f64>,
    #[serde(rename = "Feb", default, deserialize_with = "blank_or_number")]
    feb: Option<f64>,
    #[serde(rename = "Mar", default, deserialize_with = "blank_or_number")]
    mar: Option<f64>,
    #[serde(rename = "Apr", default, deserialize_with = "blank_or_number")]
    apr: Option<f64>,
    #[serde(rename = "May", default, deserialize_with = "blank_or_number")]
    may: Option<f64>,
    #[serde(rename = "Jun", default, deserialize_with = "blank_or_number")]
    jun: Option<f64>,
    #[serde(rename = "Jul", default, deserialize_with = "blank_or_number")]
    jul: Option<f64>,
    #[serde(rename = "Aug", default, deserialize_with = "blank_or_number")]
    aug: Option<f64>,
    #[serde(rename = "Sep", default, deserialize_with = "blank_or_number")]
    sep: Option<f64>,
}

/// Spreadsheet cells arrive as text: blank means no report yet, and numbers
/// may carry thousands separators.
fn blank_or_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() {
        return Ok(None);
    }

    cleaned
        .parse::<f64>()
        .map(Some)
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
pub(crate) fn parse_cell_for_tests(value: Option<&str>) -> Option<f64> {
    let cleaned = value?.trim().replace(',', "");
    if cleaned.is_empty() {
        None
    } else {
        cleaned.parse().ok()
    }
}
