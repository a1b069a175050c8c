use crate::record::DecodedRecord;
use crate::sink::SkipReason;

/// One row of the relational event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialEvent {
    pub scanner_id: String,
    pub product_id: String,
    pub material_id: String,
    pub event_type: String,
    pub scanned_at: String,
}

/// Map a decoded record onto a [`MaterialEvent`]. Pure; calling it twice on
/// the same record yields identical rows.
pub fn transform(record: &DecodedRecord) -> Result<MaterialEvent, SkipReason> {
    let scanner_id = record
        .text("scanner_id")
        .ok_or(SkipReason::MissingKey("scanner_id"))?;
    let product_id = record
        .text("product_id")
        .ok_or(SkipReason::MissingKey("product_id"))?;
    let material_id = record
        .text("material_id")
        .ok_or(SkipReason::MissingKey("material_id"))?;
    let event_type = record.text("event_type").unwrap_or_else(|| "added".into());
    let scanned_at = match record.text("timestamp") {
        Some(raw) => normalize_timestamp(&raw),
        None => record.received_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    };
    Ok(MaterialEvent {
        scanner_id,
        product_id,
        material_id,
        event_type,
        scanned_at,
    })
}

/// Rewrite an ISO-8601 timestamp into the store's `YYYY-MM-DD hh:mm:ss`
/// form by literal substitution: `T` becomes a space, the `Z` suffix is
/// dropped. This is not a timezone-aware re-parse; inputs with a non-`Z`
/// offset keep their offset text, matching what the store has always been
/// fed.
pub(crate) fn normalize_timestamp(raw: &str) -> String {
    raw.replace('T', " ").replace('Z', "")
}
