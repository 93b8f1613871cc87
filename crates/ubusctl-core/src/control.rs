// ── Control operations ──
//
// Mutating calls against the router. The `try_*` variants report why an
// operation failed; the plain variants log the cause and collapse it to a
// boolean. Both follow up with a refresh request instead of waiting for one.

use tracing::{error, info, warn};

use crate::config::WirelessBackend;
use crate::coordinator::Coordinator;
use crate::error::CoreError;
use crate::model::ServiceAction;

impl Coordinator {
    /// Disconnect a wireless station and ban it for the configured duration.
    ///
    /// Without `interface`, a kick is sent on every interface of the last
    /// snapshot's wireless info. Returns `false` on any failure.
    pub async fn kick_device(&self, mac: &str, interface: Option<&str>) -> bool {
        match self.try_kick_device(mac, interface).await {
            Ok(_) => true,
            Err(e) => {
                error!(mac, error = %e, "kick failed");
                false
            }
        }
    }

    /// Like [`kick_device`](Self::kick_device), returning the number of
    /// interfaces a kick was sent on.
    pub async fn try_kick_device(
        &self,
        mac: &str,
        interface: Option<&str>,
    ) -> Result<usize, CoreError> {
        if self.config().wireless_backend != WirelessBackend::Hostapd {
            return Err(CoreError::UnsupportedBackend {
                required: WirelessBackend::Hostapd.to_string(),
            });
        }

        let interfaces: Vec<String> = match interface {
            Some(iface) => vec![iface.to_owned()],
            None => self
                .snapshot()
                .map(|s| s.wireless_interfaces().map(str::to_owned).collect())
                .unwrap_or_default(),
        };

        let ban = self.config().kick_ban;
        for iface in &interfaces {
            self.client().hostapd_del_client(iface, mac, ban).await?;
        }

        self.record_kick(mac);
        info!(
            mac,
            interfaces = interfaces.len(),
            ban_secs = ban.as_secs(),
            "device kicked"
        );
        self.request_refresh();
        Ok(interfaces.len())
    }

    /// Start, stop or restart a managed service.
    ///
    /// `action` must be `start`, `stop` or `restart`. Unmanaged services and
    /// unknown actions fail without contacting the router. A refresh is
    /// requested after the settle delay. Returns `false` on any failure.
    pub async fn control_service(&self, name: &str, action: &str) -> bool {
        match self.try_control_service(name, action).await {
            Ok(()) => true,
            Err(e) => {
                warn!(service = name, action, error = %e, "service control failed");
                false
            }
        }
    }

    pub async fn try_control_service(&self, name: &str, action: &str) -> Result<(), CoreError> {
        if !self.config().is_managed(name) {
            return Err(CoreError::UnmanagedService {
                name: name.to_owned(),
            });
        }
        let action: ServiceAction = action.parse().map_err(|_| CoreError::UnsupportedAction {
            action: action.to_owned(),
        })?;

        let client = self.client();
        match action {
            ServiceAction::Start => client.service_start(name).await?,
            ServiceAction::Stop => client.service_stop(name).await?,
            ServiceAction::Restart => client.service_restart(name).await?,
        }

        info!(service = name, %action, "service command sent");
        self.schedule_refresh(self.config().settle_delay);
        Ok(())
    }
}
