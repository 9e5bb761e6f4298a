// Zufallsquelle für den TLS-Handshake
//
// embedded-tls erwartet rand_core 0.6 Traits, esp-hal liefert die Werte
// aus dem Hardware-TRNG.

use esp_hal::rng::Rng;
use rand_core::{CryptoRng, RngCore};

/// Hardware-RNG als `RngCore + CryptoRng`
#[derive(Clone, Copy)]
pub struct TlsRng(Rng);

impl TlsRng {
    pub fn new() -> Self {
        Self(Rng::new())
    }
}

impl Default for TlsRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RngCore for TlsRng {
    fn next_u32(&mut self) -> u32 {
        self.0.random()
    }

    fn next_u64(&mut self) -> u64 {
        (u64::from(self.next_u32()) << 32) | u64::from(self.next_u32())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for TlsRng {}
