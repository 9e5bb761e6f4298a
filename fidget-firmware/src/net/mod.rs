// Netzwerk-Adapter: WLAN-Status, HTTPS-Client, TLS-Zufallsquelle
//
// Implementiert die Netzwerk-Traits aus fidget-core auf embassy-net.

pub mod https;
pub mod rng;
pub mod wifi;

pub use https::{HttpsFetcher, HttpsResponse};
pub use rng::TlsRng;
pub use wifi::StackConnectivity;
