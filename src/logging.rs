//! JSON line logger behind the `log` facade.
//!
//! Every record becomes one object on stderr; stdout is reserved for the
//! rendered table. The record target is the event name and key-value pairs
//! become `metadata`.

use std::time::{SystemTime, UNIX_EPOCH};

use log::kv::{self, Key, Source, VisitSource};
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use serde::Serialize;
use serde_json::{Map, Number, Value};

static LOGGER: JsonLogger = JsonLogger;

#[derive(Serialize)]
struct LogEvent<'a> {
    level: &'a str,
    event: &'a str,
    message: String,
    timestamp_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<Value>,
}

struct JsonLogger;

impl Log for JsonLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level = record.level().as_str().to_ascii_lowercase();
        emit(
            &level,
            record.target(),
            record.args().to_string(),
            collect_metadata(record.key_values()),
        );
    }

    fn flush(&self) {}
}

/// Install the JSON logger; `verbose` lowers the threshold to debug.
pub fn init(verbose: bool) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });
    Ok(())
}

fn emit(level: &str, event: &str, message: String, metadata: Option<Value>) {
    let entry = LogEvent {
        level,
        event,
        message,
        timestamp_ms: current_timestamp_ms(),
        metadata,
    };

    match serde_json::to_string(&entry) {
        Ok(payload) => eprintln!("{payload}"),
        Err(err) => eprintln!(
            "{{\"level\":\"error\",\"event\":\"logging_failure\",\"message\":\"failed to serialise log\",\"error\":\"{err}\"}}"
        ),
    }
}

fn collect_metadata(source: &dyn Source) -> Option<Value> {
    if source.count() == 0 {
        return None;
    }

    let mut visitor = MetadataVisitor(Map::new());
    if source.visit(&mut visitor).is_err() {
        return None;
    }
    Some(Value::Object(visitor.0))
}

struct MetadataVisitor(Map<String, Value>);

impl<'kvs> VisitSource<'kvs> for MetadataVisitor {
    fn visit_pair(&mut self, key: Key<'kvs>, value: kv::Value<'kvs>) -> Result<(), kv::Error> {
        self.0.insert(key.as_str().to_string(), to_json(&value));
        Ok(())
    }
}

fn to_json(value: &kv::Value<'_>) -> Value {
    if let Some(number) = value.to_u64() {
        Value::from(number)
    } else if let Some(number) = value.to_i64() {
        Value::from(number)
    } else if let Some(number) = value.to_f64() {
        Number::from_f64(number).map_or(Value::Null, Value::Number)
    } else if let Some(flag) = value.to_bool() {
        Value::Bool(flag)
    } else {
        Value::String(value.to_string())
    }
}

fn current_timestamp_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_values_become_metadata() {
        let pairs = [
            (Key::from_str("ticker"), kv::Value::from("PKO.WA")),
            (Key::from_str("records"), kv::Value::from(20u64)),
            (Key::from_str("ratio"), kv::Value::from(2.5f64)),
        ];

        let metadata = collect_metadata(&pairs).expect("metadata");
        assert_eq!(metadata["ticker"], "PKO.WA");
        assert_eq!(metadata["records"], 20);
        assert_eq!(metadata["ratio"], 2.5);
    }

    #[test]
    fn empty_source_has_no_metadata() {
        let pairs: [(Key<'_>, kv::Value<'_>); 0] = [];
        assert!(collect_metadata(&pairs).is_none());
    }

    #[test]
    fn event_serialises_without_empty_metadata() {
        let entry = LogEvent {
            level: "info",
            event: "loader.cycle",
            message: "prediction pass finished".into(),
            timestamp_ms: 1,
            metadata: None,
        };
        let payload = serde_json::to_string(&entry).expect("serialise");
        assert!(payload.contains("\"event\":\"loader.cycle\""));
        assert!(!payload.contains("metadata"));
    }
}
