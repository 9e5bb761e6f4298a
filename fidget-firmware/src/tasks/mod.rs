// Task-Modul: Enthält alle Embassy Tasks
//
// WiFi-, Netzwerk- und DHCP-Tasks halten den Stack am Leben,
// der Fidget-Task fährt den Regelkreis.

pub mod fidget;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use fidget::{fidget_logic, fidget_task};
pub use wifi::{connection_task, dhcp_task, net_task};
