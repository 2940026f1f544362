//! Newline-delimited JSON transport.
//!
//! One request object per line in, one response object per line out, plus a
//! bare `health` probe. Framing is deliberately thin: every contract check
//! lives in the prediction pipeline, and cancellation/timeouts are left to
//! whatever edge fronts the service.

use crate::application::service::PredictionService;
use crate::domain::errors::PredictionError;
use crate::domain::rows::RawRow;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, warn};

/// The wire request: a list of untyped observation rows.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub rows: Vec<RawRow>,
}

/// The wire error shape: stable kind, human-readable detail, status class.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub detail: String,
    pub status: u16,
}

impl ErrorBody {
    /// Client errors keep their actionable detail; internal faults stay
    /// opaque (diagnostics are already in the server log).
    pub fn from_error(error: &PredictionError) -> Self {
        let detail = if error.is_client_error() {
            error.to_string()
        } else {
            "internal error while scoring the request".to_string()
        };
        Self {
            error: error.kind(),
            detail,
            status: error.status_code(),
        }
    }
}

pub struct LineServer {
    service: Arc<PredictionService>,
}

impl LineServer {
    pub fn new(service: Arc<PredictionService>) -> Self {
        Self { service }
    }

    /// Accepts connections forever; each connection gets its own task.
    pub async fn serve(&self, listener: TcpListener) -> anyhow::Result<()> {
        loop {
            let (stream, peer) = listener.accept().await?;
            debug!("Accepted connection from {}", peer);
            let service = self.service.clone();
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, service).await {
                    warn!("Connection closed with error: {}", e);
                }
            });
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    service: Arc<PredictionService>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let reply = respond(line, &service);
        writer.write_all(reply.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }
    Ok(())
}

/// Builds the JSON reply for one request line.
pub fn respond(line: &str, service: &PredictionService) -> String {
    if line == "health" {
        return r#"{"status":"ok"}"#.to_string();
    }

    let request: PredictRequest = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            return encode(&ErrorBody {
                error: "bad_request",
                detail: format!("malformed request: {}", e),
                status: 400,
            });
        }
    };

    match service.predict(&request.rows) {
        Ok(response) => encode(&response),
        Err(error) => encode(&ErrorBody::from_error(&error)),
    }
}

fn encode<T: Serialize>(body: &T) -> String {
    serde_json::to_string(body).unwrap_or_else(|_| {
        r#"{"error":"internal","detail":"response serialization failure","status":500}"#.to_string()
    })
}
