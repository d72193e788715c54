//! Scripted transport for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::error::ShopifyResult;
use super::session::ShopSession;
use super::transport::GraphQlTransport;
use super::types::GraphQlRequest;

type Responder = dyn Fn(&GraphQlRequest) -> ShopifyResult<serde_json::Value> + Send + Sync;

/// Transport answering every request with a closure and recording it.
pub struct ScriptedTransport {
    responder: Box<Responder>,
    requests: Mutex<Vec<GraphQlRequest>>,
}

impl ScriptedTransport {
    pub fn new(
        responder: impl Fn(&GraphQlRequest) -> ShopifyResult<serde_json::Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests seen so far.
    pub fn requests(&self) -> Vec<GraphQlRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GraphQlTransport for ScriptedTransport {
    async fn execute(
        &self,
        _session: &ShopSession,
        request: &GraphQlRequest,
    ) -> ShopifyResult<serde_json::Value> {
        self.requests.lock().unwrap().push(request.clone());
        (self.responder)(request)
    }
}
