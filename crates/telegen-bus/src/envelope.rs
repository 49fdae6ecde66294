//! ---
//! tg_section: "02-messaging-ipc-data-model"
//! tg_subsection: "module"
//! tg_type: "source"
//! tg_scope: "code"
//! tg_description: "Message envelopes and publish capabilities."
//! tg_version: "v0.1.0"
//! tg_owner: "tbd"
//! ---
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Schema version broadcast alongside every frame payload.
pub const SCHEMA_VERSION: u16 = 1;

/// One published telemetry frame.
///
/// Built fresh each tick and owned by the publish call; the scheduler does
/// not retain it afterwards. The scalar reading travels inside `payload`
/// under a host-configured field name, so the envelope stays agnostic of any
/// particular device-state schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEnvelope {
    /// Unique identifier for deduplication and tracing.
    pub id: Uuid,
    /// Version of the schema used by the payload.
    pub schema_version: u16,
    /// Wall-clock timestamp when the frame was created.
    pub timestamp: DateTime<Utc>,
    /// Tick ordinal that produced the frame, starting at 1.
    pub tick: u64,
    /// Simulated elapsed time, tick count times the tick interval.
    pub elapsed_s: f64,
    /// Payload object keyed by the host-configured field name.
    pub payload: JsonValue,
}

impl TelemetryEnvelope {
    /// Wrap one scalar reading into a frame.
    pub fn reading(field: &str, value: f64, tick: u64, elapsed_s: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            schema_version: SCHEMA_VERSION,
            timestamp: Utc::now(),
            tick,
            elapsed_s,
            payload: serde_json::json!({ field: value }),
        }
    }

    /// Extract the scalar carried under `field`, if present.
    pub fn value(&self, field: &str) -> Option<f64> {
        self.payload.get(field).and_then(JsonValue::as_f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_lands_under_the_configured_field() {
        let frame = TelemetryEnvelope::reading("batteryTempC", 29.95, 1, 0.05);
        assert_eq!(frame.schema_version, SCHEMA_VERSION);
        assert_eq!(frame.tick, 1);
        assert_eq!(frame.value("batteryTempC"), Some(29.95));
        assert_eq!(frame.value("otherField"), None);
    }

    #[test]
    fn frames_serialize_with_field_name_intact() {
        let frame = TelemetryEnvelope::reading("cpuTempC", 48.5, 3, 0.15);
        let json = serde_json::to_value(&frame).expect("frame serializes");
        assert_eq!(json["payload"]["cpuTempC"], 48.5);
        assert_eq!(json["elapsed_s"], 0.15);
    }
}
