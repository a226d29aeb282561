//! Wraps backend completions into `exec` response envelopes.

use super::messages::{ExecPayload, OutboundEvent};
use super::session::ConnectionHandle;
use crate::domain::{BackendError, BackendResult, CommandRequest};

/// Emits exactly one `exec` envelope per completed request.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseCorrelator;

impl ResponseCorrelator {
    /// Builds the envelope for `request` and queues it on `connection`.
    ///
    /// The request's method and id are echoed unchanged. A raw string
    /// response is decoded before it is placed in `params`. If the
    /// connection has gone away the envelope is dropped.
    pub fn emit(
        connection: &ConnectionHandle,
        request: CommandRequest,
        error: Option<BackendError>,
        response: BackendResult,
    ) -> bool {
        connection.emit(Self::envelope(request, error, response))
    }

    /// Builds the `exec` event without sending it.
    #[must_use]
    pub fn envelope(
        request: CommandRequest,
        error: Option<BackendError>,
        response: BackendResult,
    ) -> OutboundEvent {
        OutboundEvent::Exec {
            error,
            payload: ExecPayload {
                method: request.method,
                params: response.into_params(),
                id: request.id,
            },
        }
    }
}
