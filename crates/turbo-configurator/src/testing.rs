//! Test doubles shared by the module tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use turbo_data::{FetchClient, FetchError, HttpTransport, RequestBuilder, Response};

/// Replies with queued responses in order and records every request.
pub(crate) struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<Response, FetchError>>>,
    seen: Mutex<Vec<RequestBuilder>>,
}

impl ScriptedTransport {
    pub(crate) fn new(replies: Vec<Result<Response, FetchError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn json(replies: Vec<(u16, serde_json::Value)>) -> Arc<Self> {
        Self::new(
            replies
                .into_iter()
                .map(|(status, body)| Ok(Response::from_json(status, &body)))
                .collect(),
        )
    }

    pub(crate) fn requests(&self) -> Vec<RequestBuilder> {
        self.seen.lock().unwrap().clone()
    }

    pub(crate) fn client(self: &Arc<Self>) -> FetchClient {
        FetchClient::with_transport(self.clone()).with_base_url("https://shop.test/api")
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        self.seen.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::RequestError("no scripted reply".into())))
    }
}
