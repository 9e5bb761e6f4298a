// Connectivity-Adapter über den embassy-net Stack
//
// Assoziation und Reconnect übernimmt `connection_task`. Der Regelkreis
// sieht nur: Link + IP vorhanden oder nicht.

use embassy_net::Stack;
use embassy_time::{Duration, with_timeout};
use fidget_core::{Connectivity, ConnectivityError};

use crate::config::WIFI_CONNECT_WAIT_MS;

pub struct StackConnectivity {
    stack: Stack<'static>,
}

impl StackConnectivity {
    pub fn new(stack: Stack<'static>) -> Self {
        Self { stack }
    }
}

impl Connectivity for StackConnectivity {
    fn is_connected(&self) -> bool {
        self.stack.is_link_up() && self.stack.config_v4().is_some()
    }

    /// Wartet kurz auf Link und DHCP, Zugangsdaten hält `connection_task`
    async fn connect(&mut self, _ssid: &str, _passkey: &str) -> Result<(), ConnectivityError> {
        if self.is_connected() {
            return Ok(());
        }

        with_timeout(
            Duration::from_millis(WIFI_CONNECT_WAIT_MS),
            self.stack.wait_config_up(),
        )
        .await
        .map_err(|_| ConnectivityError::NotConnected)?;

        if self.is_connected() {
            Ok(())
        } else {
            Err(ConnectivityError::NotConnected)
        }
    }

    /// Zertifikate werden nicht geprüft, die Uhrzeit spielt für TLS keine Rolle
    fn time_synced(&self) -> bool {
        true
    }
}
