//! HTTP telemetry adapters.
//!
//! [`NetworkUplink`] implements both telemetry ports over the
//! [`HttpClient`]:
//!
//! | Port                 | Request                                        |
//! |----------------------|------------------------------------------------|
//! | `LocalTelemetryPort` | `POST <server>` JSON record                    |
//! | `CloudTelemetryPort` | `GET <cloud>/update?api_key=…&field1..field5`  |
//!
//! Any status other than 200 is reported as `UploadRejected`.

use core::fmt::Write;

use log::{info, warn};

use crate::app::ports::{CloudTelemetryPort, LocalTelemetryPort};
use crate::app::snapshot::{CloudFields, LocalTelemetryRecord};
use crate::error::CommsError;

use super::http::HttpClient;

const HTTP_OK: u16 = 200;

/// Upper bound on the cloud update URL.
const CLOUD_URL_CAPACITY: usize = 256;

pub struct NetworkUplink {
    http: HttpClient,
    server_url: &'static str,
    cloud_base_url: &'static str,
    cloud_api_key: &'static str,
    cloud_channel_id: u32,
}

impl NetworkUplink {
    pub fn new(
        http: HttpClient,
        server_url: &'static str,
        cloud_base_url: &'static str,
        cloud_api_key: &'static str,
        cloud_channel_id: u32,
    ) -> Self {
        Self {
            http,
            server_url,
            cloud_base_url,
            cloud_api_key,
            cloud_channel_id,
        }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn http_mut(&mut self) -> &mut HttpClient {
        &mut self.http
    }

    fn check(status: u16, sink: &str) -> Result<(), CommsError> {
        if status == HTTP_OK {
            Ok(())
        } else {
            warn!("{}: HTTP {}", sink, status);
            Err(CommsError::UploadRejected(status))
        }
    }
}

/// `<base>/update?api_key=<key>&field1=..&field5=..`
pub fn cloud_update_url(
    base: &str,
    api_key: &str,
    fields: &CloudFields,
) -> Result<heapless::String<CLOUD_URL_CAPACITY>, CommsError> {
    let mut url = heapless::String::new();
    write!(url, "{}/update?api_key={}", base.trim_end_matches('/'), api_key)
        .map_err(|_| CommsError::Encode)?;
    for (i, value) in fields.as_array().iter().enumerate() {
        write!(url, "&field{}={}", i + 1, value).map_err(|_| CommsError::Encode)?;
    }
    Ok(url)
}

impl LocalTelemetryPort for NetworkUplink {
    fn push(&mut self, record: &LocalTelemetryRecord) -> Result<(), CommsError> {
        let body = serde_json::to_vec(record).map_err(|_| CommsError::Encode)?;
        let status = self.http.post_json(self.server_url, &body)?;
        Self::check(status, "local")?;
        info!("local: pushed {} bytes", body.len());
        Ok(())
    }
}

impl CloudTelemetryPort for NetworkUplink {
    fn upload_fields(&mut self, fields: &CloudFields) -> Result<(), CommsError> {
        let url = cloud_update_url(self.cloud_base_url, self.cloud_api_key, fields)?;
        let status = self.http.get(&url)?;
        Self::check(status, "cloud")?;
        info!("cloud: channel {} updated", self.cloud_channel_id);
        Ok(())
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;
    use crate::app::ports::LinkStatus;
    use crate::app::snapshot::SystemSnapshot;

    fn uplink() -> NetworkUplink {
        NetworkUplink::new(HttpClient::new(5_000), "http://srv/api/data/receive", "http://cloud/", "KEY", 7)
    }

    #[test]
    fn cloud_url_has_five_fields() {
        let fields = CloudFields {
            front: 42,
            left: 999,
            right: 120,
            ground: 33,
            mode: 2,
        };
        let url = cloud_update_url("http://cloud/", "KEY", &fields).unwrap();
        assert_eq!(
            url.as_str(),
            "http://cloud/update?api_key=KEY&field1=42&field2=999&field3=120&field4=33&field5=2"
        );
    }

    #[test]
    fn local_push_posts_json() {
        let mut u = uplink();
        let rec = LocalTelemetryRecord::new(&SystemSnapshot::default(), LinkStatus::default());
        u.push(&rec).unwrap();

        let req = &u.http().sim_requests()[0];
        assert_eq!(req.method, "POST");
        assert_eq!(req.url, "http://srv/api/data/receive");
        let v: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
        assert_eq!(v["front_distance"], 999);
        assert_eq!(v["power_status"], false);
    }

    #[test]
    fn non_ok_status_is_rejected() {
        let mut u = uplink();
        u.http_mut().sim_respond(Ok(500));
        let fields = CloudFields::new(&SystemSnapshot::default());
        assert_eq!(u.upload_fields(&fields), Err(CommsError::UploadRejected(500)));
    }

    #[test]
    fn transport_errors_pass_through() {
        let mut u = uplink();
        u.http_mut().sim_respond(Err(CommsError::Timeout));
        let rec = LocalTelemetryRecord::new(&SystemSnapshot::default(), LinkStatus::default());
        assert_eq!(u.push(&rec), Err(CommsError::Timeout));
    }
}
