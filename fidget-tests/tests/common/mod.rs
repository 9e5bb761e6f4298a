//! Gemeinsame Mocks für die Integration Tests
//!
//! Alle Mocks laufen auf simulierter Zeit: `SimDelay` schiebt die
//! `SimClock` weiter statt wirklich zu schlafen.

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use fidget_core::{
    ByteStream, Clock, Connectivity, ConnectivityError, Delay, FetchError, FidgetConfig,
    FidgetIo, HttpFetcher, HttpRequest, HttpResponse, LedError, PriceFidget, ProtocolError,
    ServoError, ServoWriter, SmartLedWriter,
};
use rgb::RGB8;

// ============================================================================
// Zeit
// ============================================================================

/// Manuell gesteuerte Uhr, Klone teilen sich dieselbe Zeit
#[derive(Clone, Default)]
pub struct SimClock(Rc<Cell<u64>>);

impl SimClock {
    pub fn new(start_ms: u64) -> Self {
        Self(Rc::new(Cell::new(start_ms)))
    }

    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.0.set(ms);
    }
}

impl Clock for SimClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

/// Delay, das die Uhr weiterdreht und jede Wartezeit protokolliert
pub struct SimDelay {
    clock: SimClock,
    pub sleeps: Vec<u64>,
}

impl SimDelay {
    pub fn new(clock: &SimClock) -> Self {
        Self {
            clock: clock.clone(),
            sleeps: Vec::new(),
        }
    }
}

impl Delay for SimDelay {
    async fn sleep_ms(&mut self, ms: u64) {
        self.sleeps.push(ms);
        self.clock.advance(ms);
    }
}

// ============================================================================
// Byte-Stream
// ============================================================================

/// Skriptbarer Stream: liefert `data` in Stücken, optional mit Pausen
#[derive(Default)]
pub struct ScriptedStream {
    data: Vec<u8>,
    pos: usize,
    /// Maximale Bytes pro `try_read`
    pub chunk: usize,
    /// Nach jedem Stück einmal `0` liefern
    pub gap_between_chunks: bool,
    /// Ab dieser Position kommt nichts mehr, die Verbindung bleibt aber offen
    pub stall_at: Option<usize>,
    gap_pending: bool,
    pub close_calls: usize,
    /// Größte Slice-Länge, die `try_read` je angeboten bekam
    pub largest_read: usize,
}

impl ScriptedStream {
    pub fn new(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
            chunk: usize::MAX,
            ..Default::default()
        }
    }

    pub fn chunked(mut self, chunk: usize) -> Self {
        self.chunk = chunk;
        self
    }

    pub fn with_gaps(mut self) -> Self {
        self.gap_between_chunks = true;
        self
    }

    pub fn stalling_at(mut self, pos: usize) -> Self {
        self.stall_at = Some(pos);
        self
    }

    /// Ein Stream, der offen bleibt und nie ein Byte liefert
    pub fn silent() -> Self {
        Self::new(&[]).stalling_at(0)
    }

    pub fn delivered(&self) -> usize {
        self.pos
    }

    fn end(&self) -> usize {
        self.stall_at.unwrap_or(self.data.len()).min(self.data.len())
    }
}

impl ByteStream for ScriptedStream {
    async fn try_read(&mut self, buf: &mut [u8]) -> usize {
        self.largest_read = self.largest_read.max(buf.len());

        if self.gap_pending {
            self.gap_pending = false;
            return 0;
        }

        let n = buf.len().min(self.chunk).min(self.end() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        if n > 0 && self.gap_between_chunks {
            self.gap_pending = true;
        }
        n
    }

    fn is_open(&self) -> bool {
        self.close_calls == 0 && (self.stall_at.is_some() || self.pos < self.data.len())
    }

    async fn close(&mut self) {
        self.close_calls += 1;
    }
}

// ============================================================================
// HTTP
// ============================================================================

/// Aufgezeichneter Request
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub host: String,
    pub port: u16,
    pub path: String,
    pub headers: Vec<(String, String)>,
}

/// Eine vorbereitete Antwort
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
    pub chunk: usize,
    pub stall_at: Option<usize>,
    pub header_failure: bool,
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.as_bytes().to_vec(),
            chunk: 64,
            stall_at: None,
            header_failure: false,
        }
    }

    /// Server sendet nur die ersten `len` Bytes und hängt dann
    pub fn truncated(body: &str, len: usize) -> Self {
        Self {
            stall_at: Some(len),
            ..Self::ok(body)
        }
    }

    pub fn broken_headers() -> Self {
        Self {
            header_failure: true,
            ..Self::ok("")
        }
    }
}

/// HTTP-Client mit einer Warteschlange vorbereiteter Antworten
///
/// Ist die Warteschlange leer, schlägt der Verbindungsaufbau fehl.
#[derive(Default)]
pub struct MockHttp {
    pub replies: VecDeque<Result<Reply, FetchError>>,
    pub requests: Vec<RecordedRequest>,
    pub closed: usize,
}

impl MockHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&mut self, reply: Reply) {
        self.replies.push_back(Ok(reply));
    }

    pub fn fail(&mut self, error: FetchError) {
        self.replies.push_back(Err(error));
    }
}

pub struct MockResponse<'s> {
    http: &'s mut MockHttp,
    status: u16,
    header_failure: bool,
    stream: ScriptedStream,
}

impl ByteStream for MockResponse<'_> {
    async fn try_read(&mut self, buf: &mut [u8]) -> usize {
        self.stream.try_read(buf).await
    }

    fn is_open(&self) -> bool {
        self.stream.is_open()
    }

    async fn close(&mut self) {
        self.stream.close().await;
        self.http.closed += 1;
    }
}

impl HttpResponse for MockResponse<'_> {
    fn status_code(&self) -> u16 {
        self.status
    }

    async fn skip_response_headers(&mut self) -> Result<(), FetchError> {
        if self.header_failure {
            return Err(ProtocolError::HeaderSkipFailed.into());
        }
        Ok(())
    }
}

impl HttpFetcher for MockHttp {
    type Response<'s>
        = MockResponse<'s>
    where
        Self: 's;

    async fn request<'s>(
        &'s mut self,
        request: &HttpRequest<'_>,
    ) -> Result<MockResponse<'s>, FetchError> {
        self.requests.push(RecordedRequest {
            host: request.host.to_string(),
            port: request.port,
            path: request.path.to_string(),
            headers: request
                .headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });

        let reply = self
            .replies
            .pop_front()
            .unwrap_or(Err(fidget_core::TransportError::ConnectionFailed.into()))?;

        let mut stream = ScriptedStream::new(&reply.body).chunked(reply.chunk);
        stream.stall_at = reply.stall_at;

        Ok(MockResponse {
            http: self,
            status: reply.status,
            header_failure: reply.header_failure,
            stream,
        })
    }
}

// ============================================================================
// WLAN
// ============================================================================

/// WLAN-Mock; ohne vorbereitetes Ergebnis schlägt `connect` fehl
pub struct MockWifi {
    pub connected: bool,
    pub synced: bool,
    pub connect_results: VecDeque<Result<(), ConnectivityError>>,
    pub connect_calls: Vec<(String, String)>,
}

impl MockWifi {
    /// Verbunden und Uhrzeit synchronisiert
    pub fn online() -> Self {
        Self {
            connected: true,
            synced: true,
            connect_results: VecDeque::new(),
            connect_calls: Vec::new(),
        }
    }

    pub fn offline() -> Self {
        Self {
            connected: false,
            ..Self::online()
        }
    }
}

impl Connectivity for MockWifi {
    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn connect(&mut self, ssid: &str, passkey: &str) -> Result<(), ConnectivityError> {
        self.connect_calls
            .push((ssid.to_string(), passkey.to_string()));
        let result = self
            .connect_results
            .pop_front()
            .unwrap_or(Err(ConnectivityError::NotConnected));
        if result.is_ok() {
            self.connected = true;
        }
        result
    }

    fn time_synced(&self) -> bool {
        self.synced
    }
}

// ============================================================================
// Servo & LED
// ============================================================================

#[derive(Default)]
pub struct RecordingServo {
    pub positions: Vec<f32>,
    pub fail: bool,
}

impl ServoWriter for RecordingServo {
    fn set_position(&mut self, angle: f32) -> Result<(), ServoError> {
        if self.fail {
            return Err(ServoError::WriteFailed);
        }
        self.positions.push(angle);
        Ok(())
    }
}

#[derive(Default)]
pub struct MockLedWriter {
    pub last_color: Option<RGB8>,
    pub write_count: usize,
    pub fail_next_write: bool,
}

impl MockLedWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SmartLedWriter for MockLedWriter {
    fn write(&mut self, color: RGB8) -> Result<(), LedError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(LedError::WriteFailed);
        }

        self.last_color = Some(color);
        self.write_count += 1;
        Ok(())
    }
}

// ============================================================================
// Aufbau
// ============================================================================

pub type TestFidget<const B: usize> =
    PriceFidget<MockWifi, MockHttp, SimClock, SimDelay, RecordingServo, MockLedWriter, B>;

pub fn test_config() -> FidgetConfig {
    let mut config = FidgetConfig {
        wifi_ssid: "fidget-net",
        wifi_passkey: "hunter22",
        ..Default::default()
    };
    config.api.site_id = "01FAKESITE";
    config.api.api_key = "psk_test";
    config
}

pub fn test_io(
    clock: &SimClock,
    wifi: MockWifi,
    http: MockHttp,
) -> FidgetIo<MockWifi, MockHttp, SimClock, SimDelay, RecordingServo, MockLedWriter> {
    FidgetIo {
        wifi,
        http,
        clock: clock.clone(),
        delay: SimDelay::new(clock),
        servo: RecordingServo::default(),
        led: MockLedWriter::new(),
    }
}

/// Amber-Antwort mit einem General- und einem Feed-In-Kanal
pub fn amber_body(descriptor: &str) -> String {
    format!(
        r#"[{{"type":"CurrentInterval","duration":30,"spotPerKwh":6.12,"perKwh":24.33,"date":"2026-10-18","nemTime":"2026-10-18T10:30:00+10:00","startTime":"2026-10-18T00:00:01Z","endTime":"2026-10-18T00:30:00Z","renewables":45.2,"channelType":"general","spikeStatus":"none","tariffInformation":{{"period":"offPeak","season":"summer"}},"descriptor":"{descriptor}","estimate":true}},{{"type":"CurrentInterval","duration":30,"perKwh":-5.1,"channelType":"feedIn","descriptor":"spike","estimate":false}}]"#
    )
}
