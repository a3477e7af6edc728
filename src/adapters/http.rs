//! Minimal blocking HTTP client for telemetry.
//!
//! One request per call, bounded by the configured timeout, no retries and
//! no connection reuse.  Only the status code is returned; response bodies
//! are drained and dropped.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::http::client::EspHttpConnection`.
//! - **all other targets**: an in-memory recorder with a scripted status.

use log::debug;

use crate::error::CommsError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::http::Method;
#[cfg(target_os = "espidf")]
use esp_idf_svc::http::client::{Configuration, EspHttpConnection};

/// One request as seen by the simulated transport.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimRequest {
    pub method: &'static str,
    pub url: std::string::String,
    pub body: std::vec::Vec<u8>,
}

pub struct HttpClient {
    timeout_ms: u32,
    #[cfg(not(target_os = "espidf"))]
    sim_result: Result<u16, CommsError>,
    #[cfg(not(target_os = "espidf"))]
    sim_requests: std::vec::Vec<SimRequest>,
}

impl HttpClient {
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            timeout_ms,
            #[cfg(not(target_os = "espidf"))]
            sim_result: Ok(200),
            #[cfg(not(target_os = "espidf"))]
            sim_requests: std::vec::Vec::new(),
        }
    }

    /// POST a JSON body.  Returns the response status.
    pub fn post_json(&mut self, url: &str, body: &[u8]) -> Result<u16, CommsError> {
        debug!("HTTP POST {} ({} bytes)", url, body.len());
        self.platform_request(true, url, body)
    }

    /// GET with everything in the query string.  Returns the response status.
    pub fn get(&mut self, url: &str) -> Result<u16, CommsError> {
        debug!("HTTP GET {}", url);
        self.platform_request(false, url, &[])
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_request(&mut self, post: bool, url: &str, body: &[u8]) -> Result<u16, CommsError> {
        use core::fmt::Write as _;
        use esp_idf_svc::io::{Read, Write};
        use esp_idf_svc::sys::ESP_ERR_TIMEOUT;

        let classify = |e: esp_idf_svc::sys::EspError| {
            if e.code() == ESP_ERR_TIMEOUT as i32 {
                CommsError::Timeout
            } else {
                CommsError::Transport
            }
        };

        let mut conn = EspHttpConnection::new(&Configuration {
            timeout: Some(core::time::Duration::from_millis(u64::from(self.timeout_ms))),
            ..Default::default()
        })
        .map_err(classify)?;

        let mut content_length = heapless::String::<10>::new();
        write!(content_length, "{}", body.len()).map_err(|_| CommsError::Encode)?;

        if post {
            let headers = [
                ("Content-Type", "application/json"),
                ("Content-Length", content_length.as_str()),
            ];
            conn.initiate_request(Method::Post, url, &headers).map_err(classify)?;
            conn.write_all(body).map_err(|e| classify(e.0))?;
        } else {
            conn.initiate_request(Method::Get, url, &[]).map_err(classify)?;
        }

        conn.initiate_response().map_err(classify)?;
        let status = conn.status();

        let mut scratch = [0_u8; 64];
        while conn.read(&mut scratch).map_err(|e| classify(e.0))? > 0 {}

        Ok(status)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_request(&mut self, post: bool, url: &str, body: &[u8]) -> Result<u16, CommsError> {
        self.sim_requests.push(SimRequest {
            method: if post { "POST" } else { "GET" },
            url: url.into(),
            body: body.to_vec(),
        });
        self.sim_result
    }

    // ── Simulation controls ───────────────────────────────────

    /// Script what every following request returns.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_respond(&mut self, result: Result<u16, CommsError>) {
        self.sim_result = result;
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_requests(&self) -> &[SimRequest] {
        &self.sim_requests
    }
}
