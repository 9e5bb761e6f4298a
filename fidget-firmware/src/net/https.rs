// HTTP(S)-Client für die Preis-API
//
// Ein Request pro Verbindung: DNS → TCP → TLS 1.3 → GET (HTTP/1.0) → Status-Zeile.
// Header und Body liest der Regelkreis danach über `HttpsResponse`.
// Mit Feature `debug-server` entfällt TLS (Plain-HTTP an den Test-Server).

use defmt::{Debug2Format, info, warn};
use embassy_net::dns::DnsQueryType;
use embassy_net::tcp::TcpSocket;
use embassy_net::{IpAddress, Ipv4Address, Stack};
use embassy_time::{Duration, with_timeout};
#[cfg(not(feature = "debug-server"))]
use embedded_tls::{Aes128GcmSha256, TlsConfig, TlsConnection, TlsContext, UnsecureProvider};
use fidget_core::http::{HeaderEnd, STATUS_LINE_CAPACITY, parse_status_line, write_request};
use fidget_core::reader::READ_INACTIVITY_TIMEOUT_MS;
use fidget_core::{
    ByteStream, FetchError, HttpFetcher, HttpRequest, HttpResponse, ProtocolError, TransportError,
};
use static_cell::ConstStaticCell;

use crate::config::{
    DNS_TIMEOUT_SECS, REQUEST_BUFFER_SIZE, TCP_CONNECT_TIMEOUT_SECS, TCP_RX_BUFFER_SIZE,
    TCP_TX_BUFFER_SIZE, TLS_READ_BUFFER_SIZE, TLS_WRITE_BUFFER_SIZE,
};
#[cfg(not(feature = "debug-server"))]
use crate::net::rng::TlsRng;

/// Alle Puffer einer Verbindung, einmalig statisch angelegt
pub struct FetchBuffers {
    tcp_rx: [u8; TCP_RX_BUFFER_SIZE],
    tcp_tx: [u8; TCP_TX_BUFFER_SIZE],
    tls_read: [u8; TLS_READ_BUFFER_SIZE],
    tls_write: [u8; TLS_WRITE_BUFFER_SIZE],
}

impl FetchBuffers {
    const fn new() -> Self {
        Self {
            tcp_rx: [0; TCP_RX_BUFFER_SIZE],
            tcp_tx: [0; TCP_TX_BUFFER_SIZE],
            tls_read: [0; TLS_READ_BUFFER_SIZE],
            tls_write: [0; TLS_WRITE_BUFFER_SIZE],
        }
    }
}

// ConstStaticCell: ~29 KB dürfen nie über den Stack laufen
static BUFFERS: ConstStaticCell<FetchBuffers> = ConstStaticCell::new(FetchBuffers::new());

/// Offene Verbindung, je nach Build mit oder ohne TLS
enum Link<'s> {
    #[cfg(not(feature = "debug-server"))]
    Tls(TlsConnection<'s, TcpSocket<'s>, Aes128GcmSha256>),
    #[cfg(feature = "debug-server")]
    Plain(TcpSocket<'s>),
}

impl Link<'_> {
    async fn write_all(&mut self, mut bytes: &[u8]) -> Result<(), TransportError> {
        while !bytes.is_empty() {
            let written = match self {
                #[cfg(not(feature = "debug-server"))]
                Link::Tls(tls) => tls.write(bytes).await.map_err(|e| {
                    warn!("HTTP: TLS write failed: {}", Debug2Format(&e));
                    TransportError::WriteFailed
                })?,
                #[cfg(feature = "debug-server")]
                Link::Plain(socket) => socket
                    .write(bytes)
                    .await
                    .map_err(|_| TransportError::WriteFailed)?,
            };
            if written == 0 {
                return Err(TransportError::WriteFailed);
            }
            bytes = &bytes[written..];
        }

        match self {
            #[cfg(not(feature = "debug-server"))]
            Link::Tls(tls) => tls.flush().await.map_err(|_| TransportError::WriteFailed),
            #[cfg(feature = "debug-server")]
            Link::Plain(socket) => socket.flush().await.map_err(|_| TransportError::WriteFailed),
        }
    }

    /// `Ok(0)` = Gegenstelle hat geschlossen
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        match self {
            #[cfg(not(feature = "debug-server"))]
            Link::Tls(tls) => tls.read(buf).await.map_err(|e| {
                warn!("HTTP: TLS read failed: {}", Debug2Format(&e));
                TransportError::ReadFailed
            }),
            #[cfg(feature = "debug-server")]
            Link::Plain(socket) => socket.read(buf).await.map_err(|_| TransportError::ReadFailed),
        }
    }

    async fn close(self) {
        let mut socket = match self {
            #[cfg(not(feature = "debug-server"))]
            Link::Tls(tls) => match tls.close().await {
                Ok(socket) | Err((socket, _)) => socket,
            },
            #[cfg(feature = "debug-server")]
            Link::Plain(socket) => socket,
        };
        socket.close();
        // FIN noch rausschicken, aber nicht ewig warten
        let _ = with_timeout(Duration::from_secs(1), socket.flush()).await;
    }
}

#[cfg(not(feature = "debug-server"))]
async fn open_link<'s>(
    socket: TcpSocket<'s>,
    host: &str,
    read_buf: &'s mut [u8],
    write_buf: &'s mut [u8],
) -> Result<Link<'s>, TransportError> {
    // Keine Zertifikatsprüfung (UnsecureProvider), daher auch keine Uhrzeit nötig
    let config = TlsConfig::new().with_server_name(host);
    let mut tls = TlsConnection::new(socket, read_buf, write_buf);

    let opened = tls
        .open(TlsContext::new(
            &config,
            UnsecureProvider::new::<Aes128GcmSha256>(TlsRng::new()),
        ))
        .await;

    match opened {
        Ok(()) => Ok(Link::Tls(tls)),
        Err(e) => {
            warn!("HTTP: TLS handshake failed: {}", Debug2Format(&e));
            Link::Tls(tls).close().await;
            Err(TransportError::HandshakeFailed)
        }
    }
}

#[cfg(feature = "debug-server")]
async fn open_link<'s>(
    socket: TcpSocket<'s>,
    _host: &str,
    _read_buf: &'s mut [u8],
    _write_buf: &'s mut [u8],
) -> Result<Link<'s>, TransportError> {
    Ok(Link::Plain(socket))
}

/// Löst Hostname zu IPv4-Adresse auf
///
/// Nutzt embassy-net DNS-Stack mit konfigurierbarem Timeout.
/// IP-Literale (z.B. DEBUG_HOST) kommen direkt zurück.
async fn resolve_hostname(stack: Stack<'_>, hostname: &str) -> Result<Ipv4Address, TransportError> {
    let result = with_timeout(
        Duration::from_secs(DNS_TIMEOUT_SECS),
        stack.dns_query(hostname, DnsQueryType::A),
    )
    .await;

    match result {
        Ok(Ok(addrs)) => addrs
            .iter()
            .find_map(|addr| match addr {
                IpAddress::Ipv4(ipv4) => Some(*ipv4),
                #[allow(unreachable_patterns)]
                _ => None,
            })
            .ok_or(TransportError::DnsFailed),
        Ok(Err(e)) => {
            warn!("HTTP: DNS query failed: {}", Debug2Format(&e));
            Err(TransportError::DnsFailed)
        }
        Err(_) => Err(TransportError::TimedOut),
    }
}

/// Liest die Status-Zeile Byte für Byte (TLS puffert den Record intern)
async fn read_status_line(link: &mut Link<'_>) -> Result<u16, FetchError> {
    let mut line: heapless::Vec<u8, STATUS_LINE_CAPACITY> = heapless::Vec::new();
    let mut byte = [0u8; 1];

    loop {
        if link.read(&mut byte).await? == 0 {
            return Err(ProtocolError::MalformedStatusLine.into());
        }
        line.push(byte[0])
            .map_err(|_| ProtocolError::MalformedStatusLine)?;
        if byte[0] == b'\n' {
            break;
        }
    }

    Ok(parse_status_line(&line)?)
}

/// HTTP-Client auf dem embassy-net Stack
pub struct HttpsFetcher {
    stack: Stack<'static>,
    buffers: &'static mut FetchBuffers,
}

impl HttpsFetcher {
    /// Übernimmt die statischen Puffer, `None` wenn schon vergeben
    pub fn new(stack: Stack<'static>) -> Option<Self> {
        BUFFERS.try_take().map(|buffers| Self { stack, buffers })
    }
}

impl HttpFetcher for HttpsFetcher {
    type Response<'s>
        = HttpsResponse<'s>
    where
        Self: 's;

    async fn request<'s>(
        &'s mut self,
        request: &HttpRequest<'_>,
    ) -> Result<HttpsResponse<'s>, FetchError> {
        let head = write_request::<REQUEST_BUFFER_SIZE>(request)?;

        let stack = self.stack;
        let address = resolve_hostname(stack, request.host).await?;
        info!(
            "HTTP: GET {}{} ({}:{})",
            request.host,
            request.path,
            Debug2Format(&address),
            request.port
        );

        let FetchBuffers {
            tcp_rx,
            tcp_tx,
            tls_read,
            tls_write,
        } = &mut *self.buffers;

        let mut socket = TcpSocket::new(stack, tcp_rx, tcp_tx);
        // Hängender Server: Socket bricht nach dem Inaktivitäts-Timeout ab
        socket.set_timeout(Some(Duration::from_millis(READ_INACTIVITY_TIMEOUT_MS)));

        match with_timeout(
            Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
            socket.connect((address, request.port)),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!("HTTP: TCP connect failed: {}", Debug2Format(&e));
                return Err(TransportError::ConnectionFailed.into());
            }
            Err(_) => return Err(TransportError::TimedOut.into()),
        }

        let mut link = open_link(socket, request.host, tls_read, tls_write).await?;

        if let Err(e) = link.write_all(head.as_bytes()).await {
            link.close().await;
            return Err(e.into());
        }

        let status = match read_status_line(&mut link).await {
            Ok(status) => status,
            Err(e) => {
                link.close().await;
                return Err(e);
            }
        };

        Ok(HttpsResponse {
            link: Some(link),
            status,
        })
    }
}

/// Antwort nach gelesener Status-Zeile
pub struct HttpsResponse<'s> {
    link: Option<Link<'s>>,
    status: u16,
}

impl ByteStream for HttpsResponse<'_> {
    /// Liest blockierend, der Socket-Timeout begrenzt die Wartezeit
    async fn try_read(&mut self, buf: &mut [u8]) -> usize {
        let Some(link) = self.link.as_mut() else {
            return 0;
        };

        match link.read(buf).await {
            Ok(0) => {
                self.close().await;
                0
            }
            Ok(n) => n,
            Err(e) => {
                warn!("HTTP: Body read aborted: {}", e);
                self.close().await;
                0
            }
        }
    }

    fn is_open(&self) -> bool {
        self.link.is_some()
    }

    async fn close(&mut self) {
        if let Some(link) = self.link.take() {
            link.close().await;
        }
    }
}

impl HttpResponse for HttpsResponse<'_> {
    fn status_code(&self) -> u16 {
        self.status
    }

    async fn skip_response_headers(&mut self) -> Result<(), FetchError> {
        let Some(link) = self.link.as_mut() else {
            return Err(ProtocolError::HeaderSkipFailed.into());
        };

        let mut end = HeaderEnd::new();
        let mut byte = [0u8; 1];
        loop {
            match link.read(&mut byte).await {
                Ok(1) => {
                    if end.feed(byte[0])? {
                        return Ok(());
                    }
                }
                _ => return Err(ProtocolError::HeaderSkipFailed.into()),
            }
        }
    }
}
