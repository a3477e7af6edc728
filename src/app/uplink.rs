//! Periodic telemetry dispatch.
//!
//! [`UplinkDispatch`] is the scheduler's delegate for the two upload
//! timers.  It turns the tick snapshot into the typed record each sink
//! expects and hands it to the port.  Uploads are fire-and-forget: the
//! outcome is returned for logging and never retried.

use log::debug;

use crate::error::CommsError;

use super::ports::{CloudTelemetryPort, LinkStatus, LocalTelemetryPort, SchedulerDelegate, UplinkTarget};
use super::snapshot::{CloudFields, LocalTelemetryRecord, SystemSnapshot};

pub struct UplinkDispatch<L, C> {
    local: L,
    cloud: C,
}

impl<L: LocalTelemetryPort, C: CloudTelemetryPort> UplinkDispatch<L, C> {
    pub fn new(local: L, cloud: C) -> Self {
        Self { local, cloud }
    }

    pub fn local(&self) -> &L {
        &self.local
    }

    pub fn cloud(&self) -> &C {
        &self.cloud
    }
}

impl<L: LocalTelemetryPort, C: CloudTelemetryPort> SchedulerDelegate for UplinkDispatch<L, C> {
    fn on_upload_due(
        &mut self,
        target: UplinkTarget,
        snapshot: &SystemSnapshot,
        link: LinkStatus,
    ) -> Result<(), CommsError> {
        if !link.connected {
            return Err(CommsError::NetworkUnavailable);
        }
        debug!("uplink: {} upload", target.name());
        match target {
            UplinkTarget::Local => self.local.push(&LocalTelemetryRecord::new(snapshot, link)),
            UplinkTarget::Cloud => self.cloud.upload_fields(&CloudFields::new(snapshot)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counting {
        local: u32,
        cloud: u32,
        reject: Option<u16>,
    }

    impl LocalTelemetryPort for Counting {
        fn push(&mut self, _record: &LocalTelemetryRecord) -> Result<(), CommsError> {
            self.local += 1;
            self.reject.map_or(Ok(()), |s| Err(CommsError::UploadRejected(s)))
        }
    }

    impl CloudTelemetryPort for Counting {
        fn upload_fields(&mut self, _fields: &CloudFields) -> Result<(), CommsError> {
            self.cloud += 1;
            Ok(())
        }
    }

    const UP: LinkStatus = LinkStatus {
        connected: true,
        rssi: Some(-50),
    };

    #[test]
    fn skips_while_disconnected() {
        let mut d = UplinkDispatch::new(Counting::default(), Counting::default());
        let snap = SystemSnapshot::default();
        assert_eq!(
            d.on_upload_due(UplinkTarget::Local, &snap, LinkStatus::default()),
            Err(CommsError::NetworkUnavailable)
        );
        assert_eq!(d.local().local, 0);
    }

    #[test]
    fn routes_to_the_right_sink() {
        let mut d = UplinkDispatch::new(Counting::default(), Counting::default());
        let snap = SystemSnapshot::default();
        d.on_upload_due(UplinkTarget::Cloud, &snap, UP).unwrap();
        assert_eq!(d.cloud().cloud, 1);
        assert_eq!(d.local().local, 0);
    }

    #[test]
    fn rejection_is_reported() {
        let local = Counting {
            reject: Some(500),
            ..Counting::default()
        };
        let mut d = UplinkDispatch::new(local, Counting::default());
        let snap = SystemSnapshot::default();
        assert_eq!(
            d.on_upload_due(UplinkTarget::Local, &snap, UP),
            Err(CommsError::UploadRejected(500))
        );
    }
}
