//! In-process service bus
//!
//! Routes `domain.service` calls to registered async handlers. Embedders use
//! it to receive CronoStar's actuation calls without going through the Home
//! Assistant REST API.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use ulid::Ulid;

/// Result type for service calls
pub type ServiceResult = Result<(), ServiceError>;

/// Future type for async service handlers
pub type ServiceFuture = Pin<Box<dyn Future<Output = ServiceResult> + Send>>;

/// Service handler function type
pub type ServiceHandler = Arc<dyn Fn(ServiceCall) -> ServiceFuture + Send + Sync>;

/// Errors that can occur when calling services
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("service not found: {domain}.{service}")]
    NotFound { domain: String, service: String },

    #[error("service call failed: {0}")]
    CallFailed(String),
}

/// A call delivered to a handler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCall {
    pub domain: String,
    pub service: String,
    pub service_data: serde_json::Value,
    /// ULID identifying this call in logs
    pub context_id: String,
}

impl ServiceCall {
    pub fn new(
        domain: impl Into<String>,
        service: impl Into<String>,
        service_data: serde_json::Value,
    ) -> Self {
        Self {
            domain: domain.into(),
            service: service.into(),
            service_data,
            context_id: Ulid::new().to_string(),
        }
    }

    /// `domain.service`
    pub fn service_id(&self) -> String {
        format!("{}.{}", self.domain, self.service)
    }

    /// The `entity_id` in the service data, if it is a single string
    pub fn entity_id(&self) -> Option<&str> {
        self.service_data.get("entity_id").and_then(|v| v.as_str())
    }
}

/// Registry of service handlers keyed by `domain.service`
pub struct ServiceBus {
    handlers: DashMap<String, ServiceHandler>,
}

impl ServiceBus {
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }

    /// Register a handler, replacing any previous one for the same service
    pub fn register<F, Fut>(&self, domain: &str, service: &str, handler: F)
    where
        F: Fn(ServiceCall) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ServiceResult> + Send + 'static,
    {
        let key = format!("{}.{}", domain, service);
        debug!(service = %key, "Registering service");

        let handler: ServiceHandler =
            Arc::new(move |call| Box::pin(handler(call)) as ServiceFuture);
        self.handlers.insert(key, handler);
    }

    /// Call a service
    #[instrument(skip(self, service_data))]
    pub async fn call(
        &self,
        domain: &str,
        service: &str,
        service_data: serde_json::Value,
    ) -> ServiceResult {
        let key = format!("{}.{}", domain, service);

        // Clone out of the map so no shard lock is held across the await
        let handler = self
            .handlers
            .get(&key)
            .map(|h| h.value().clone())
            .ok_or_else(|| {
                warn!(service = %key, "Service not found");
                ServiceError::NotFound {
                    domain: domain.to_string(),
                    service: service.to_string(),
                }
            })?;

        let call = ServiceCall::new(domain, service, service_data);
        debug!(service = %key, context_id = %call.context_id, "Calling service");
        handler(call).await
    }

    pub fn has_service(&self, domain: &str, service: &str) -> bool {
        self.handlers.contains_key(&format!("{}.{}", domain, service))
    }

    pub fn unregister(&self, domain: &str, service: &str) -> bool {
        self.handlers
            .remove(&format!("{}.{}", domain, service))
            .is_some()
    }

    pub fn service_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for ServiceBus {
    fn default() -> Self {
        Self::new()
    }
}
