//! Abfrage-Pipeline: Request → Status → Header → Body → Descriptor
//!
//! Jeder Fehler unterwegs wird als [`FetchError`] zurückgegeben; die
//! Verbindung ist danach in jedem Fall geschlossen.

use core::fmt::Write;

use crate::config::ApiEndpoint;
use crate::error::{FetchError, ParseError, ProtocolError};
use crate::extract::scan_descriptor;
use crate::reader::{ReadLimits, ReadOutcome, read_bounded};
use crate::traits::{ByteStream, Clock, Delay, HttpFetcher, HttpRequest, HttpResponse};
use crate::types::Descriptor;

/// Maximale Länge des Request-Pfads
pub const PATH_CAPACITY: usize = 128;

/// Maximale Länge des Authorization-Headers
pub const AUTH_CAPACITY: usize = 160;

/// Erwarteter Status-Code
pub const HTTP_OK: u16 = 200;

/// Erfolgreich gelesener Descriptor samt Lese-Statistik
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub descriptor: Descriptor,
    pub read: ReadOutcome,
}

/// `/v1/sites/{site_id}/prices/current`
pub fn price_path(site_id: &str) -> Result<heapless::String<PATH_CAPACITY>, ProtocolError> {
    let mut path = heapless::String::new();
    write!(path, "/v1/sites/{}/prices/current", site_id)
        .map_err(|_| ProtocolError::RequestTooLarge)?;
    Ok(path)
}

/// `Bearer {api_key}`
pub fn bearer_token(api_key: &str) -> Result<heapless::String<AUTH_CAPACITY>, ProtocolError> {
    let mut token = heapless::String::new();
    write!(token, "Bearer {}", api_key).map_err(|_| ProtocolError::RequestTooLarge)?;
    Ok(token)
}

/// Führt einen kompletten Abfrage-Zyklus aus
///
/// Der Body landet in `buf` (siehe [`read_bounded`]), der Descriptor wird
/// vor der Rückgabe aus dem Buffer kopiert.
pub async fn fetch_descriptor<H, C, D>(
    http: &mut H,
    clock: &C,
    delay: &mut D,
    api: &ApiEndpoint,
    buf: &mut [u8],
    limits: ReadLimits,
) -> Result<Fetched, FetchError>
where
    H: HttpFetcher,
    C: Clock,
    D: Delay,
{
    let path = price_path(api.site_id)?;
    let auth = bearer_token(api.api_key)?;
    let headers = [
        ("Authorization", auth.as_str()),
        ("User-Agent", api.user_agent),
    ];
    let request = HttpRequest {
        host: api.host,
        port: api.port,
        path: path.as_str(),
        headers: &headers,
    };

    let mut response = http.request(&request).await?;

    let status = response.status_code();
    if status != HTTP_OK {
        response.close().await;
        return Err(ProtocolError::Status(status).into());
    }

    if let Err(e) = response.skip_response_headers().await {
        response.close().await;
        return Err(e);
    }

    let read = read_bounded(&mut response, clock, delay, buf, limits).await;

    let descriptor = scan_descriptor(&buf[..read.len])?;
    let descriptor =
        Descriptor::try_from(descriptor).map_err(|_| ParseError::DescriptorTooLong)?;

    Ok(Fetched { descriptor, read })
}
