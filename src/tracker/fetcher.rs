//! ISS position fetcher worker.

use crate::core::coordinates::GeoPosition;
use crate::tracker::types::{PositionChannels, PositionCommand, PositionResult, TrackerConfig};
use anyhow::{Context, Result};
use bevy::log::{debug, error};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use std::sync::{
    Arc, Mutex,
    mpsc::{self},
};
use std::thread;

/// `{"latitude": .., "longitude": ..}`; other fields are ignored.
#[derive(Debug, Deserialize)]
struct LatLonFields {
    latitude: Value,
    longitude: Value,
}

/// Either feed shape; nested is tried first.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PositionBody {
    Nested { iss_position: LatLonFields },
    Flat(LatLonFields),
}

pub fn start_position_worker(config: &TrackerConfig) -> PositionChannels {
    let (cmd_tx, cmd_rx) = mpsc::channel::<PositionCommand>();
    let (res_tx, res_rx) = mpsc::channel::<PositionResult>();
    let timeout = config.request_timeout;
    let user_agent = config.user_agent.clone();

    thread::spawn(move || {
        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(err) => {
                error!("[ISS FETCH] failed to start tokio runtime: {}", err);
                return;
            }
        };
        rt.block_on(async move {
            let client = match reqwest::Client::builder()
                .timeout(timeout)
                .user_agent(user_agent)
                .build()
            {
                Ok(client) => client,
                Err(err) => {
                    error!("[ISS FETCH] failed to build HTTP client: {}", err);
                    return;
                }
            };

            // One command at a time: responses come back in request order.
            while let Ok(cmd) = cmd_rx.recv() {
                let result = match cmd {
                    PositionCommand::Fetch { url, altitude_m } => {
                        fetch_position(&client, &url, altitude_m).await
                    }
                };

                let send = |msg| {
                    let _ = res_tx.send(msg);
                };

                match result {
                    Ok(position) => {
                        debug!(
                            "[ISS FETCH] lat={} lon={}",
                            position.latitude_deg, position.longitude_deg
                        );
                        send(PositionResult::Position {
                            position,
                            fetched_at: Utc::now(),
                        })
                    }
                    Err(err) => send(PositionResult::Error {
                        error: format!("{:#}", err),
                    }),
                }
            }
        });
    });

    PositionChannels {
        cmd_tx,
        res_rx: Arc::new(Mutex::new(res_rx)),
    }
}

async fn fetch_position(
    client: &reqwest::Client,
    url: &str,
    altitude_m: f64,
) -> Result<GeoPosition> {
    let body = fetch_body(client, url).await?;
    parse_position(&body, altitude_m)
}

async fn fetch_body(client: &reqwest::Client, url: &str) -> Result<String> {
    let resp = client
        .get(url)
        .header("accept", "application/json")
        .send()
        .await
        .with_context(|| format!("request to {} failed", url))?;
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        anyhow::bail!("HTTP {} for {}", status, url);
    }
    Ok(body)
}

/// Parse a position body in either feed shape. Missing fields and malformed
/// JSON are errors; present but non-numeric values come through as NaN.
pub fn parse_position(body: &str, altitude_m: f64) -> Result<GeoPosition> {
    let fields = match serde_json::from_str::<PositionBody>(body).context(
        "expected {latitude, longitude} or {iss_position: {latitude, longitude}}",
    )? {
        PositionBody::Nested { iss_position } => iss_position,
        PositionBody::Flat(fields) => fields,
    };

    Ok(GeoPosition::new(
        coerce_f64(&fields.latitude),
        coerce_f64(&fields.longitude),
        altitude_m,
    ))
}

fn coerce_f64(value: &Value) -> f64 {
    match value {
        Value::Number(num) => num.as_f64().unwrap_or(f64::NAN),
        Value::String(val) => val.trim().parse::<f64>().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_string_coordinates() {
        let body = r#"{"iss_position":{"latitude":"51.5","longitude":"-0.12"}}"#;
        let pos = parse_position(body, 500_000.0).unwrap();
        assert_eq!(pos.latitude_deg, 51.5);
        assert_eq!(pos.longitude_deg, -0.12);
        assert_eq!(pos.altitude_m, 500_000.0);
    }

    #[test]
    fn test_parse_open_notify_full_body() {
        let body = r#"{"message": "success", "timestamp": 1700000000,
            "iss_position": {"longitude": "112.7031", "latitude": "-43.2156"}}"#;
        let pos = parse_position(body, 1.0).unwrap();
        assert_eq!(pos.latitude_deg, -43.2156);
        assert_eq!(pos.longitude_deg, 112.7031);
    }

    #[test]
    fn test_parse_flat_wheretheiss_body() {
        let body = r#"{"name":"iss","id":25544,"latitude":50.11496269845,
            "longitude":118.07900427317,"altitude":408.05526028199,
            "velocity":27635.971970874,"visibility":"daylight"}"#;
        let pos = parse_position(body, 500_000.0).unwrap();
        assert!((pos.latitude_deg - 50.11496269845).abs() < 1e-9);
        assert!((pos.longitude_deg - 118.07900427317).abs() < 1e-9);
        // Feed altitude is ignored in favor of the configured one
        assert_eq!(pos.altitude_m, 500_000.0);
    }

    #[test]
    fn test_non_numeric_values_become_nan() {
        let body = r#"{"latitude":"north","longitude":null}"#;
        let pos = parse_position(body, 0.0).unwrap();
        assert!(pos.latitude_deg.is_nan());
        assert!(pos.longitude_deg.is_nan());

        let body = r#"{"iss_position":{"latitude":true,"longitude":"12.5"}}"#;
        let pos = parse_position(body, 0.0).unwrap();
        assert!(pos.latitude_deg.is_nan());
        assert_eq!(pos.longitude_deg, 12.5);
    }

    #[test]
    fn test_missing_field_is_error() {
        assert!(parse_position(r#"{"latitude":"1.0"}"#, 0.0).is_err());
        assert!(parse_position(r#"{"iss_position":{"latitude":"1.0"}}"#, 0.0).is_err());
        assert!(parse_position(r#"{"message":"success","timestamp":1}"#, 0.0).is_err());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(parse_position("<html>502</html>", 0.0).is_err());
        assert!(parse_position("", 0.0).is_err());
        assert!(parse_position("[51.5, -0.12]", 0.0).is_err());
    }
}
