// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Socket server and connection handling.

use tokio::net::UnixStream;
use tracing::{debug, error};
use vigil_engine::PostRequest;

use crate::lifecycle::DaemonState;
use crate::protocol::{self, Request, Response, DEFAULT_TIMEOUT, PROTOCOL_VERSION};

/// Handle a single client connection
pub async fn handle_connection(
    daemon: &mut DaemonState,
    stream: UnixStream,
) -> Result<(), ServerError> {
    let (mut reader, mut writer) = stream.into_split();

    let request = match protocol::read_request(&mut reader, DEFAULT_TIMEOUT).await {
        Ok(req) => req,
        Err(protocol::ProtocolError::Timeout) => {
            error!("Request read timeout");
            return Err(ServerError::Timeout);
        }
        Err(protocol::ProtocolError::ConnectionClosed) => {
            debug!("Client disconnected before sending request");
            return Ok(());
        }
        Err(e) => {
            error!("Failed to read request: {}", e);
            return Err(ServerError::Protocol(e));
        }
    };

    debug!("Received request: {:?}", request);

    let response = handle_request(daemon, request);

    debug!("Sending response: {:?}", response);

    protocol::write_response(&mut writer, &response, DEFAULT_TIMEOUT)
        .await
        .map_err(ServerError::Protocol)?;

    Ok(())
}

/// Handle a single request and return a response
pub fn handle_request(daemon: &mut DaemonState, request: Request) -> Response {
    let subsystem = &daemon.subsystem;
    match request {
        Request::Ping => Response::Pong,

        Request::Hello { version: _ } => Response::Hello {
            version: PROTOCOL_VERSION.to_string(),
        },

        Request::Status => Response::Status {
            uptime_secs: daemon.start_time.elapsed().as_secs(),
            definitions: subsystem.registry().len(),
            queued: subsystem.queue().len(),
            processed: subsystem.processed(),
        },

        Request::PostEvent {
            code,
            source,
            dci,
            tag,
            parameters,
        } => {
            let mut post = PostRequest::new(code, source)
                .with_dci(dci)
                .with_pairs(parameters);
            post.user_tag = tag;
            match subsystem.poster().post_request(&post) {
                Some(event_id) => Response::Posted { event_id },
                None => Response::Error {
                    message: format!("Unknown event code: {}", code),
                },
            }
        }

        Request::Upsert { definition } => match subsystem.registry().upsert(&definition) {
            Ok(change) => Response::Changed {
                code: change.code,
                old: change.old,
                new: change.new,
            },
            Err(e) => Response::Error {
                message: e.to_string(),
            },
        },

        Request::Delete { code } => match subsystem.registry().delete(code) {
            Ok(change) => Response::Changed {
                code: change.code,
                old: change.old,
                new: change.new,
            },
            Err(e) => Response::Error {
                message: e.to_string(),
            },
        },

        Request::Reload => match subsystem.registry().reload() {
            Ok(definitions) => Response::Reloaded { definitions },
            Err(e) => Response::Error {
                message: e.to_string(),
            },
        },

        Request::ListDefinitions => Response::Definitions {
            definitions: subsystem
                .registry()
                .definitions()
                .iter()
                .map(|object| object.as_ref().clone())
                .collect(),
        },

        Request::RecentEvents { source } => Response::Events {
            events: subsystem.recent().for_source(source),
        },

        Request::Shutdown => {
            daemon.shutdown_requested = true;
            Response::ShuttingDown
        }
    }
}

/// Server errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),

    #[error("Request timeout")]
    Timeout,
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
