// Library-Root: Hardware-Adapter und Tasks des Preis-Fidgets
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod net;
pub mod tasks;
