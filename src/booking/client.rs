//! HTTP access to the shop's booking API.

use super::error::TransportError;
use super::model::{BookingRecord, BookingRequest, BookingResponse, RecordStatus, StatusUpdate};
use crate::config::Config;
use crate::version;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

pub const BOOK_PATH: &str = "/book";
pub const CLIENTS_PATH: &str = "/api/clients";

/// Anything that accepts a booking request and answers with the API reply.
#[async_trait]
pub trait BookingEndpoint: Send + Sync {
    async fn book(&self, request: &BookingRequest) -> Result<BookingResponse, TransportError>;
}

/// `reqwest` client bound to one shop base URL
#[derive(Debug, Clone)]
pub struct HttpBookingClient {
    client: Client,
    base_url: String,
}

impl HttpBookingClient {
    /// Build a client. With `timeout` unset the transport defaults apply.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder().user_agent(version::user_agent());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.base_url.clone(), config.request_timeout())
            .with_context(|| format!("Failed to create HTTP client for {}", config.base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// List every stored booking, newest first
    pub async fn list_bookings(&self) -> Result<Vec<BookingRecord>, TransportError> {
        let url = self.endpoint(CLIENTS_PATH);
        debug!(%url, "listing bookings");

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn update_status(
        &self,
        id: i64,
        status: RecordStatus,
    ) -> Result<BookingResponse, TransportError> {
        let url = self.endpoint(&format!("{}/{}/status", CLIENTS_PATH, id));
        debug!(%url, %status, "updating booking status");

        let response = self
            .client
            .put(&url)
            .json(&StatusUpdate { status })
            .send()
            .await?;
        let code = response.status();
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            warn!(%code, "status update answered with a non-JSON body");
            TransportError::Decode(e)
        })
    }
}

#[async_trait]
impl BookingEndpoint for HttpBookingClient {
    async fn book(&self, request: &BookingRequest) -> Result<BookingResponse, TransportError> {
        let url = self.endpoint(BOOK_PATH);
        debug!(%url, master_id = %request.master_id, service = %request.service, "posting booking");

        let response = self.client.post(&url).json(request).send().await?;

        // The API reports rejections in the body, whatever the status code.
        let code = response.status();
        let body = response.bytes().await?;
        let reply: BookingResponse = serde_json::from_slice(&body).map_err(|e| {
            warn!(%code, "booking endpoint answered with a non-JSON body");
            TransportError::Decode(e)
        })?;

        debug!(%code, status = %reply.status, booking_id = ?reply.booking_id, "booking endpoint replied");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8(buf).unwrap()
    }

    /// Answer exactly one request with a canned response and hand back the
    /// raw request text.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });

        (format!("http://{}", addr), handle)
    }

    /// Client that ignores proxy settings of the test environment
    fn local_client(base_url: &str) -> HttpBookingClient {
        HttpBookingClient {
            client: Client::builder().no_proxy().build().unwrap(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request() -> BookingRequest {
        BookingRequest {
            name: "Max Müller".to_string(),
            phone: "+49 30 12345678".to_string(),
            master_id: "3".to_string(),
            service: "haircut".to_string(),
            date: "2024-05-01".to_string(),
            time: "14:00".to_string(),
            comment: String::new(),
        }
    }

    #[test]
    fn test_base_url_trailing_slash_is_dropped() {
        let client = HttpBookingClient::new("http://shop.example:5000/", Some(Duration::from_secs(5))).unwrap();
        assert_eq!(client.base_url(), "http://shop.example:5000");
        assert_eq!(client.endpoint(BOOK_PATH), "http://shop.example:5000/book");
    }

    #[tokio::test]
    async fn test_book_posts_json() {
        let (base_url, server) =
            serve_once("200 OK", r#"{"status":"success","message":"Booked!","booking_id":12}"#).await;
        let client = local_client(&format!("{}/", base_url));

        let reply = client.book(&request()).await.unwrap();
        assert!(reply.is_success());
        assert_eq!(reply.message.as_deref(), Some("Booked!"));
        assert_eq!(reply.booking_id, Some(12));

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /book HTTP/1.1"));
        assert!(raw.to_lowercase().contains("content-type: application/json"));

        let body = raw.split("\r\n\r\n").nth(1).unwrap();
        let sent: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(sent, serde_json::to_value(request()).unwrap());
    }

    #[tokio::test]
    async fn test_error_status_still_yields_reply() {
        let (base_url, server) = serve_once(
            "500 Internal Server Error",
            r#"{"status":"error","message":"Slot taken"}"#,
        )
        .await;
        let client = local_client(&base_url);

        let reply = client.book(&request()).await.unwrap();
        assert!(!reply.is_success());
        assert_eq!(reply.message.as_deref(), Some("Slot taken"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_non_json_body_is_transport_error() {
        let (base_url, server) = serve_once("502 Bad Gateway", "<html>bad gateway</html>").await;
        let client = local_client(&base_url);

        let err = client.book(&request()).await.unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = local_client(&format!("http://{}", addr));
        let err = client.book(&request()).await.unwrap_err();
        assert!(matches!(err, TransportError::Request(_)));
    }

    #[tokio::test]
    async fn test_update_status_puts_to_client_path() {
        let (base_url, server) = serve_once("200 OK", r#"{"status":"success"}"#).await;
        let client = local_client(&base_url);

        let reply = client.update_status(7, RecordStatus::Confirmed).await.unwrap();
        assert!(reply.is_success());

        let raw = server.await.unwrap();
        assert!(raw.starts_with("PUT /api/clients/7/status HTTP/1.1"));
        assert!(raw.ends_with(r#"{"status":"confirmed"}"#));
    }

    #[tokio::test]
    async fn test_list_bookings() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"[{"id":1,"name":"Max","phone":"+49 30 12345678","master_id":3,"service":"haircut","date":"2024-05-01","time":"14:00","comment":"","created_at":"2024-04-20T09:15:42","status":"pending"}]"#,
        )
        .await;
        let client = local_client(&base_url);

        let records = client.list_bookings().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].master_id, 3);
        assert_eq!(records[0].status, RecordStatus::Pending);

        let raw = server.await.unwrap();
        assert!(raw.starts_with("GET /api/clients HTTP/1.1"));
    }
}
