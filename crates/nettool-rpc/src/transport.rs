//! RPC transports
//!
//! Line-delimited JSON over stdio. Requests are handled concurrently, so
//! responses may come back out of order; clients match them by `id`.

use crate::{RpcError, RpcServer, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

/// STDIO transport for the RPC server
///
/// Reads one JSON-RPC request per line from stdin and writes one response
/// per line to stdout.
pub struct StdioTransport {
    server: Arc<RpcServer>,
}

impl StdioTransport {
    /// Create new STDIO transport
    pub fn new(server: Arc<RpcServer>) -> Self {
        Self { server }
    }

    /// Serve stdin/stdout until stdin closes
    pub async fn run(&self) -> Result<()> {
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve requests from any line reader, writing responses to `writer`
    ///
    /// Returns after the reader hits EOF and every in-flight request has
    /// been answered.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let mut lines = reader.lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let request = match line.map_err(|e| RpcError::InternalError(e.to_string()))? {
                        Some(request) => request,
                        None => break,
                    };

                    // Skip empty lines
                    if request.trim().is_empty() {
                        continue;
                    }

                    let server = self.server.clone();
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        match server.handle_request(&request).await {
                            Ok(response) => {
                                // Receiver only closes once serving is over.
                                let _ = tx.send(response);
                            }
                            Err(e) => tracing::error!(error = %e, "failed to encode response"),
                        }
                    });
                }
                Some(response) = rx.recv() => {
                    write_line(&mut writer, &response).await?;
                }
            }
        }

        // Drain responses of requests still in flight at EOF.
        drop(tx);
        while let Some(response) = rx.recv().await {
            write_line(&mut writer, &response).await?;
        }

        Ok(())
    }
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> Result<()> {
    writer
        .write_all(line.as_bytes())
        .await
        .map_err(|e| RpcError::InternalError(e.to_string()))?;
    writer
        .write_all(b"\n")
        .await
        .map_err(|e| RpcError::InternalError(e.to_string()))?;
    writer
        .flush()
        .await
        .map_err(|e| RpcError::InternalError(e.to_string()))
}
