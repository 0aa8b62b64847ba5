//! Request Query Handler

use std::sync::Arc;

use crate::application::orchestrator::{RequestInfo, RequestRegistry};
use crate::application::queries::ListRequests;

/// ListRequests Handler
pub struct ListRequestsHandler {
    registry: Arc<RequestRegistry>,
}

impl ListRequestsHandler {
    pub fn new(registry: Arc<RequestRegistry>) -> Self {
        Self { registry }
    }

    pub fn handle(&self, _query: ListRequests) -> Vec<RequestInfo> {
        self.registry.list()
    }
}
