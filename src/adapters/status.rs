//! Status endpoint: serves the live state as JSON over HTTP.
//!
//! Any client on the network can `GET /` and receive:
//!
//! ```text
//! {"latest_conductivity":0.0002,"last_watering":"2024-06-01T09:30:00","next_watering":"2024-06-02T09:30:00"}
//! ```
//!
//! The document is rendered from one [`LiveStateReader::read`] snapshot, so
//! its three fields always belong to the same completed tick.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::app::live_state::{LiveState, LiveStateReader};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Serialize)]
struct StatusDocument {
    latest_conductivity: Option<f32>,
    last_watering: String,
    next_watering: String,
}

fn format_timestamp(t: NaiveDateTime) -> String {
    t.format(TIMESTAMP_FORMAT).to_string()
}

/// Render a snapshot as the status JSON body.
///
/// A non-finite conductivity (no usable sample yet, failed probe, or a
/// shorted probe) is reported as `null`.
pub fn status_json(state: &LiveState) -> Result<String, serde_json::Error> {
    let doc = StatusDocument {
        latest_conductivity: state
            .latest_conductivity
            .is_finite()
            .then_some(state.latest_conductivity),
        last_watering: format_timestamp(state.last_watering),
        next_watering: format_timestamp(state.next_watering),
    };
    serde_json::to_string(&doc)
}

/// Take a snapshot from `reader` and render it.
pub fn render(reader: &LiveStateReader) -> Result<String, serde_json::Error> {
    status_json(&reader.read())
}

#[cfg(target_os = "espidf")]
pub use server::start_status_server;

#[cfg(target_os = "espidf")]
mod server {
    use esp_idf_svc::http::Method;
    use esp_idf_svc::http::server::{Configuration, EspHttpServer};
    use esp_idf_svc::io::Write;
    use log::info;

    use super::render;
    use crate::app::live_state::LiveStateReader;

    /// Start the HTTP server with a single `GET /` route.
    ///
    /// The returned server must be kept alive; dropping it stops serving.
    pub fn start_status_server(reader: LiveStateReader) -> anyhow::Result<EspHttpServer<'static>> {
        let cfg = Configuration {
            stack_size: 8 * 1024,
            ..Default::default()
        };
        let mut server = EspHttpServer::new(&cfg)?;

        server.fn_handler("/", Method::Get, move |req| -> anyhow::Result<()> {
            let body = render(&reader)?;
            let headers = [("Content-Type", "application/json")];
            let mut resp = req.into_response(200, Some("OK"), &headers)?;
            resp.write_all(body.as_bytes())?;
            Ok(())
        })?;

        info!("Status: HTTP server listening on port {}", cfg.http_port);
        Ok(server)
    }
}
