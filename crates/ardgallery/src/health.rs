//! Static `GET /health` endpoint served by `tiny_http` from its own thread.
//!
//! The endpoint shares no state with the gallery: every response is built
//! from the clock alone.

use std::net::SocketAddr;
use std::thread;

use anyhow::{anyhow, Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tiny_http::{Header, Method, Request, Response, Server};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: String,
}

impl HealthStatus {
    pub fn now() -> Self {
        Self {
            status: "ok",
            message: "ARD gallery is running",
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

pub fn health_body() -> Result<String> {
    serde_json::to_string(&HealthStatus::now()).context("failed to encode health response")
}

/// Handle to a running health server.
#[derive(Debug, Clone, Copy)]
pub struct HealthServer {
    addr: SocketAddr,
}

impl HealthServer {
    /// Binds `addr` and serves requests on a background thread for the rest
    /// of the process.
    pub fn spawn(addr: SocketAddr) -> Result<Self> {
        let server = Server::http(addr)
            .map_err(|err| anyhow!("failed to bind health endpoint on {addr}: {err}"))?;
        let addr = server
            .server_addr()
            .to_ip()
            .context("health endpoint is not listening on an IP address")?;
        thread::Builder::new()
            .name("ardgallery-health".into())
            .spawn(move || serve(server))
            .context("failed to spawn health endpoint thread")?;
        tracing::info!(%addr, "health endpoint listening");
        Ok(Self { addr })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

fn serve(server: Server) {
    for request in server.incoming_requests() {
        if let Err(err) = handle(request) {
            tracing::debug!(error = %err, "health request failed");
        }
    }
    tracing::warn!("health endpoint stopped accepting requests");
}

fn handle(request: Request) -> std::io::Result<()> {
    let (status, body) = route(request.method(), request.url());
    tracing::trace!(method = %request.method(), url = request.url(), status, "health request");
    let mut response = Response::from_string(body).with_status_code(status);
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        response = response.with_header(header);
    }
    request.respond(response)
}

/// Status and JSON body for a request line.
fn route(method: &Method, url: &str) -> (u16, String) {
    let path = url.split('?').next().unwrap_or_default();
    match (method, path) {
        (Method::Get, "/health") => match health_body() {
            Ok(body) => (200, body),
            Err(err) => {
                tracing::error!(error = %err, "failed to build health response");
                (500, r#"{"status":"error"}"#.to_string())
            }
        },
        (_, "/health") => (405, r#"{"error":"method not allowed"}"#.to_string()),
        _ => (404, r#"{"error":"not found"}"#.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_server() -> HealthServer {
        HealthServer::spawn("127.0.0.1:0".parse().unwrap()).expect("spawn health server")
    }

    #[test]
    fn body_has_status_message_and_timestamp() {
        let body: serde_json::Value = serde_json::from_str(&health_body().unwrap()).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["message"], "ARD gallery is running");
        let timestamp = body["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok(), "{timestamp}");
    }

    #[test]
    fn health_path_answers_ok() {
        let server = local_server();
        let response = reqwest::blocking::get(format!("http://{}/health", server.addr())).unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: serde_json::Value = response.json().unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[test]
    fn other_paths_are_not_found() {
        let server = local_server();
        for path in ["/", "/healthz", "/health/extra"] {
            let response =
                reqwest::blocking::get(format!("http://{}{path}", server.addr())).unwrap();
            assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND, "{path}");
        }
    }

    #[test]
    fn query_strings_do_not_change_the_route() {
        let server = local_server();
        let response =
            reqwest::blocking::get(format!("http://{}/health?verbose=1", server.addr())).unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
    }

    #[test]
    fn only_get_is_allowed_on_health() {
        assert_eq!(route(&Method::Get, "/health").0, 200);
        assert_eq!(route(&Method::Post, "/health").0, 405);
        assert_eq!(route(&Method::Get, "/").0, 404);

        let server = local_server();
        let response = reqwest::blocking::Client::new()
            .post(format!("http://{}/health", server.addr()))
            .send()
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn responses_are_json() {
        let server = local_server();
        let response = reqwest::blocking::get(format!("http://{}/health", server.addr())).unwrap();
        let content_type = response.headers()[reqwest::header::CONTENT_TYPE].to_str().unwrap();
        assert_eq!(content_type, "application/json");
    }
}
