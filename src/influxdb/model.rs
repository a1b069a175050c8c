use chrono::DateTime;

use crate::record::DecodedRecord;
use crate::sink::SkipReason;

pub const MEASUREMENT: &str = "machine_metrics";

const UNKNOWN: &str = "unknown";

/// One point of the `machine_metrics` measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPoint {
    pub factory_id: String,
    pub machine_id: String,
    pub metric: String,
    pub value: f64,
    pub timestamp_ns: i64,
}

/// Map a decoded record onto a [`MetricPoint`]. Pure.
///
/// The `value` field must be a JSON number; anything else rejects the record
/// for this sink only. The timestamp comes from the record's `timestamp`
/// when it parses as RFC 3339, otherwise from the receipt time, at
/// nanosecond precision either way.
pub fn transform(record: &DecodedRecord) -> Result<MetricPoint, SkipReason> {
    let value = record.number("value").ok_or(SkipReason::NoNumericValue)?;
    let tag = |key: &str| record.text(key).unwrap_or_else(|| UNKNOWN.into());

    let timestamp_ns = record
        .text("timestamp")
        .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
        .and_then(|dt| dt.timestamp_nanos_opt())
        .unwrap_or_else(|| {
            record
                .received_at
                .timestamp_nanos_opt()
                .unwrap_or_else(|| record.received_at.timestamp_millis() * 1_000_000)
        });

    Ok(MetricPoint {
        factory_id: tag("factory_id"),
        machine_id: tag("machine_id"),
        metric: tag("metric"),
        value,
        timestamp_ns,
    })
}

impl MetricPoint {
    /// Render the point as one InfluxDB v2 line-protocol line.
    pub fn to_line_protocol(&self) -> String {
        format!(
            "{},factory_id={},machine_id={},metric={} value={} {}",
            MEASUREMENT,
            escape_tag(&self.factory_id),
            escape_tag(&self.machine_id),
            escape_tag(&self.metric),
            self.value,
            self.timestamp_ns
        )
    }
}

/// Tag values must escape commas, spaces and equals signs.
fn escape_tag(value: &str) -> String {
    value
        .replace(',', "\\,")
        .replace('=', "\\=")
        .replace(' ', "\\ ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::decode;

    fn record(json: &str) -> DecodedRecord {
        decode(
            "factory/data/sensor1",
            json.as_bytes(),
            "2024-01-01T00:00:00Z".parse().unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn transform_keeps_the_exact_float_value() {
        let point = transform(&record(r#"{"value": 23.5}"#)).unwrap();
        assert_eq!(point.value, 23.5);

        // Shortest-roundtrip formatting loses nothing representable in f64.
        let point = transform(&record(r#"{"value": 0.1}"#)).unwrap();
        assert!(point.to_line_protocol().contains("value=0.1 "));
    }

    #[test]
    fn transform_defaults_missing_tags_to_unknown() {
        let point = transform(&record(r#"{"value": 1.0}"#)).unwrap();
        assert_eq!(point.factory_id, "unknown");
        assert_eq!(point.machine_id, "unknown");
        assert_eq!(point.metric, "unknown");
    }

    #[test]
    fn transform_rejects_missing_or_non_numeric_values() {
        assert_eq!(
            transform(&record(r#"{"metric":"temperature"}"#)).unwrap_err(),
            SkipReason::NoNumericValue
        );
        assert_eq!(
            transform(&record(r#"{"value":"23.5"}"#)).unwrap_err(),
            SkipReason::NoNumericValue
        );
    }

    #[test]
    fn record_timestamp_wins_over_receipt_time() {
        let point = transform(&record(
            r#"{"value":1.0,"timestamp":"2024-03-01T06:00:00Z"}"#,
        ))
        .unwrap();
        assert_eq!(point.timestamp_ns, 1_709_272_800_000_000_000);

        // Unparseable timestamps fall back to the receipt time.
        let point = transform(&record(r#"{"value":1.0,"timestamp":"yesterday"}"#)).unwrap();
        assert_eq!(point.timestamp_ns, 1_704_067_200_000_000_000);
    }

    #[test]
    fn transform_is_idempotent() {
        let rec = record(r#"{"value":7.25,"factory_id":"F001","metric":"temperature"}"#);
        assert_eq!(transform(&rec).unwrap(), transform(&rec).unwrap());
    }

    #[test]
    fn line_protocol_escapes_tag_values() {
        let point = MetricPoint {
            factory_id: "berlin plant".into(),
            machine_id: "m=1,2".into(),
            metric: "temperature".into(),
            value: 23.5,
            timestamp_ns: 42,
        };
        assert_eq!(
            point.to_line_protocol(),
            "machine_metrics,factory_id=berlin\\ plant,machine_id=m\\=1\\,2,metric=temperature value=23.5 42"
        );
    }
}
