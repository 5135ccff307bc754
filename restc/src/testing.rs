//! Scripted transport for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use futures::future::BoxFuture;
use http::{HeaderMap, Method, StatusCode};
use http_body_util::{BodyExt, Full};

use crate::ClientError;
use crate::transport::{ResponseBody, Transport, TransportBody};

enum Step {
    Fail,
    Respond(StatusCode, &'static str),
}

/// A request as the transport saw it.
#[derive(Debug)]
pub(crate) struct SentRequest {
    pub(crate) method: Method,
    pub(crate) uri: String,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
}

#[derive(Default)]
struct State {
    script: VecDeque<Step>,
    calls: u32,
    requests: Vec<SentRequest>,
}

/// Answers each call with the next scripted step. An exhausted script fails
/// like a refused connection.
#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    state: Arc<Mutex<State>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail(self) -> Self {
        self.state.lock().unwrap().script.push_back(Step::Fail);
        self
    }

    pub(crate) fn respond(self, status: StatusCode, body: &'static str) -> Self {
        self.state
            .lock()
            .unwrap()
            .script
            .push_back(Step::Respond(status, body));
        self
    }

    pub(crate) fn calls(&self) -> u32 {
        self.state.lock().unwrap().calls
    }

    /// Remove and return the most recent request.
    pub(crate) fn take_last_request(&self) -> Option<SentRequest> {
        self.state.lock().unwrap().requests.pop()
    }
}

impl Transport for MockTransport {
    fn send(
        &self,
        request: http::Request<TransportBody>,
    ) -> BoxFuture<'_, Result<http::Response<ResponseBody>, ClientError>> {
        Box::pin(async move {
            let (parts, body) = request.into_parts();
            let body = body.collect().await?.to_bytes();

            let mut state = self.state.lock().unwrap();
            state.calls += 1;
            let attempt = state.calls;
            state.requests.push(SentRequest {
                method: parts.method,
                uri: parts.uri.to_string(),
                headers: parts.headers,
                body,
            });

            match state.script.pop_front() {
                Some(Step::Respond(status, text)) => {
                    let body = Full::new(Bytes::from_static(text.as_bytes()))
                        .map_err(|never| match never {})
                        .boxed_unsync();
                    let mut response = http::Response::new(body);
                    *response.status_mut() = status;
                    Ok(response)
                }
                Some(Step::Fail) | None => Err(ClientError::Transport(format!(
                    "attempt {} refused",
                    attempt
                ))),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RequestBody;

    #[tokio::test]
    async fn test_take_last_request_drains_newest_first() {
        let mock = MockTransport::new()
            .respond(StatusCode::OK, "{}")
            .respond(StatusCode::OK, "{}");
        for uri in ["http://upstream.test/a", "http://upstream.test/b"] {
            let request = http::Request::builder()
                .uri(uri)
                .body(RequestBody::from("x").take_attempt())
                .unwrap();
            mock.send(request).await.unwrap();
        }

        assert_eq!(mock.take_last_request().unwrap().uri, "http://upstream.test/b");
        assert_eq!(mock.take_last_request().unwrap().uri, "http://upstream.test/a");
        assert!(mock.take_last_request().is_none());
        assert_eq!(mock.calls(), 2);
    }
}
