//! Per-connection channel dispatch.
//!
//! A [`ChannelRouter`] is bound once per connection with the connection's
//! handle and the API version. Every inbound command is handled on its own
//! task: the backend call, the optional int64 normalization and the single
//! `exec` emit run in sequence for that command, while other commands on
//! any channel proceed independently and may complete in any order.

use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinHandle;

use super::correlator::ResponseCorrelator;
use super::messages::EventFrame;
use super::session::ConnectionHandle;
use crate::backend::BackendApi;
use crate::domain::{BackendError, BackendResult, Channel, CommandRequest, normalize_int64_fields};

/// Channel bindings for one connection.
#[derive(Debug, Clone)]
pub struct ChannelRouter {
    connection: ConnectionHandle,
    version: Arc<str>,
    backend: Arc<dyn BackendApi>,
}

impl ChannelRouter {
    /// Binds all channels of `connection` to `backend` under `version`.
    #[must_use]
    pub fn bind(
        connection: ConnectionHandle,
        version: Arc<str>,
        backend: Arc<dyn BackendApi>,
    ) -> Self {
        Self {
            connection,
            version,
            backend,
        }
    }

    /// Connection these bindings emit on.
    #[must_use]
    pub const fn connection(&self) -> &ConnectionHandle {
        &self.connection
    }

    /// Routes a decoded frame to its channel.
    ///
    /// Frames for unknown events and channel frames without a valid
    /// command are dropped; `None` is returned for both.
    pub fn route_frame(&self, frame: &EventFrame) -> Option<JoinHandle<()>> {
        let Ok(channel) = frame.event.parse::<Channel>() else {
            tracing::debug!(event = %frame.event, "ignoring unbound event");
            return None;
        };
        let Some(request) = frame.command() else {
            tracing::warn!(%channel, "dropping malformed command");
            return None;
        };
        Some(self.dispatch(channel, request))
    }

    /// Handles `request` on its own task.
    pub fn dispatch(&self, channel: Channel, request: CommandRequest) -> JoinHandle<()> {
        let router = self.clone();
        tokio::spawn(async move { router.handle(channel, request).await })
    }

    /// Runs one command to completion and emits its envelope.
    ///
    /// The backend call runs on a nested task so a panicking backend still
    /// yields an error envelope.
    pub async fn handle(&self, channel: Channel, request: CommandRequest) {
        let backend = Arc::clone(&self.backend);
        let context = channel.context(&self.version).to_string();
        let method = request.method.clone();
        let params = request.params.clone();

        let call = tokio::spawn(async move {
            backend.invoke(channel, &context, &method, params).await
        });
        let outcome = call.await.unwrap_or_else(|e| {
            Err(BackendError::message(format!("backend call aborted: {e}")))
        });

        let (error, mut response) = match outcome {
            Ok(response) => (None, response),
            Err(error) => {
                tracing::warn!(%channel, method = %request.method, %error, "backend call failed");
                (Some(error), BackendResult::Scalar(Value::Null))
            }
        };
        if channel.normalizes_int64() {
            response = response.decoded();
            normalize_int64_fields(&mut response);
        }

        ResponseCorrelator::emit(&self.connection, request, error, response);
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use serde_json::json;
    use tokio::sync::mpsc;

    use super::*;
    use crate::backend::mock::MockBackend;
    use crate::ws::messages::{ExecPayload, OutboundEvent};

    type Outbound = mpsc::UnboundedReceiver<OutboundEvent>;

    fn setup() -> (Arc<MockBackend>, ChannelRouter, Outbound) {
        let backend = Arc::new(MockBackend::default());
        let (conn, rx) = ConnectionHandle::new();
        let api: Arc<dyn BackendApi> = Arc::clone(&backend) as Arc<dyn BackendApi>;
        let router = ChannelRouter::bind(conn, Arc::from("v2"), api);
        (backend, router, rx)
    }

    fn request(method: &str, id: i64) -> CommandRequest {
        CommandRequest {
            method: method.to_string(),
            params: json!([id]),
            id: json!(id),
        }
    }

    async fn next_exec(rx: &mut Outbound) -> (Option<BackendError>, ExecPayload) {
        match rx.recv().await {
            Some(OutboundEvent::Exec { error, payload }) => (error, payload),
            other => panic!("expected exec, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn forwards_version_and_params() {
        let (backend, router, mut rx) = setup();
        router.handle(Channel::Metadata, request("getApps", 1)).await;

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        let Some(call) = calls.first() else {
            panic!("no call recorded");
        };
        assert_eq!(call.channel, Channel::Metadata);
        assert_eq!(call.context, "v2");
        assert_eq!(call.method, "getApps");
        assert_eq!(call.params, json!([1]));

        let (error, payload) = next_exec(&mut rx).await;
        assert!(error.is_none());
        assert_eq!(payload.method, "getApps");
        assert_eq!(payload.id, json!(1));
    }

    #[tokio::test]
    async fn gateway_uses_api_key_context() {
        let (backend, router, _rx) = setup();
        router.handle(Channel::Gateway, request("inject", 2)).await;
        let contexts: Vec<_> = backend.calls().into_iter().map(|c| c.context).collect();
        assert_eq!(contexts, vec!["apikey".to_string()]);
    }

    #[tokio::test]
    async fn manager_results_are_normalized() {
        let (backend, router, mut rx) = setup();
        backend.respond(
            "getHistory",
            Ok(BackendResult::Raw(
                r#"[{"startTime":"10","endTime":"20","runId":"7"}]"#.to_string(),
            )),
        );
        router.handle(Channel::Manager, request("getHistory", 3)).await;
        let (_, payload) = next_exec(&mut rx).await;
        assert_eq!(
            payload.params,
            json!([{"startTime": 10, "endTime": 20, "runId": "7"}])
        );
    }

    #[tokio::test]
    async fn manager_http_responses_are_normalized() {
        let (url, upstream) = crate::backend::http::tests::one_shot_server(
            "HTTP/1.1 200 OK",
            r#"[{"runId":"r1","startTime":"1372788347000","endTime":"42"}]"#,
        )
        .await;
        let backend: Arc<dyn BackendApi> =
            Arc::new(crate::backend::http::HttpBackend::new(reqwest::Client::new(), url));
        let (conn, mut rx) = ConnectionHandle::new();
        let router = ChannelRouter::bind(conn, Arc::from("v2"), backend);

        router.handle(Channel::Manager, request("getHistory", 8)).await;
        let (error, payload) = next_exec(&mut rx).await;
        assert!(error.is_none());
        assert_eq!(
            payload.params,
            json!([{"runId": "r1", "startTime": 1_372_788_347_000_i64, "endTime": 42}])
        );
        let Ok(_) = upstream.await else {
            panic!("upstream task failed");
        };
    }

    #[tokio::test]
    async fn manager_mixed_sequences_are_normalized() {
        let (backend, router, mut rx) = setup();
        backend.respond(
            "getHistory",
            Ok(BackendResult::Raw(r#"[{"startTime":"5"},2]"#.to_string())),
        );
        router.handle(Channel::Manager, request("getHistory", 9)).await;
        let (_, payload) = next_exec(&mut rx).await;
        assert_eq!(payload.params, json!([{"startTime": 5}, 2]));
    }

    #[tokio::test]
    async fn other_channels_are_not_normalized() {
        let (backend, router, mut rx) = setup();
        backend.respond(
            "getHistory",
            Ok(BackendResult::from_value(json!([{"startTime": "10"}]))),
        );
        router.handle(Channel::Monitor, request("getHistory", 4)).await;
        let (_, payload) = next_exec(&mut rx).await;
        assert_eq!(payload.params, json!([{"startTime": "10"}]));
    }

    #[tokio::test]
    async fn backend_error_is_surfaced_once() {
        let (backend, router, mut rx) = setup();
        backend.respond("start", Err(BackendError::message("already running")));
        router.handle(Channel::Manager, request("start", 5)).await;

        let (error, payload) = next_exec(&mut rx).await;
        assert_eq!(error, Some(BackendError::message("already running")));
        assert_eq!(payload.id, json!(5));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn unknown_events_are_ignored() {
        let (backend, router, _rx) = setup();
        let frame = EventFrame {
            event: "upload".to_string(),
            args: vec![json!({"method": "x", "id": 1})],
        };
        assert!(router.route_frame(&frame).is_none());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn slow_request_does_not_block_others() {
        let (backend, router, mut rx) = setup();
        let release =
            backend.respond_when_released("slow", Ok(BackendResult::Scalar(json!("late"))));

        let slow = router.dispatch(Channel::Far, request("slow", 10));
        let fast = router.dispatch(Channel::Far, request("fast", 11));
        let Ok(()) = fast.await else {
            panic!("fast task failed");
        };

        let (_, first) = next_exec(&mut rx).await;
        assert_eq!(first.id, json!(11));

        let _ = release.send(());
        let Ok(()) = slow.await else {
            panic!("slow task failed");
        };
        let (_, second) = next_exec(&mut rx).await;
        assert_eq!(second.id, json!(10));
        assert_eq!(second.params, json!("late"));
    }
}
