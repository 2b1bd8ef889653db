use async_trait::async_trait;
use parking_lot::Mutex;
use rackstock_gateway::{GatewayError, GenerateRequest, GenerativeBackend};
use std::sync::Arc;

/// Backend that always answers with the same text.
#[derive(Debug, Clone)]
pub struct FixedBackend {
    response: String,
}

impl FixedBackend {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl GenerativeBackend for FixedBackend {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn generate(&self, _request: GenerateRequest) -> Result<String, GatewayError> {
        Ok(self.response.clone())
    }
}

/// Backend that always fails with a non-success status.
#[derive(Debug, Clone)]
pub struct FailingBackend {
    status: u16,
    message: String,
}

impl FailingBackend {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: 503,
            message: message.into(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }
}

#[async_trait]
impl GenerativeBackend for FailingBackend {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(&self, _request: GenerateRequest) -> Result<String, GatewayError> {
        Err(GatewayError::Status {
            status: self.status,
            body: self.message.clone(),
        })
    }
}

/// Backend that records every request it receives.
#[derive(Debug, Clone)]
pub struct RecordingBackend {
    response: String,
    seen: Arc<Mutex<Vec<GenerateRequest>>>,
}

impl RecordingBackend {
    pub fn new(response: impl Into<String>) -> (Self, Arc<Mutex<Vec<GenerateRequest>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                response: response.into(),
                seen: seen.clone(),
            },
            seen,
        )
    }
}

#[async_trait]
impl GenerativeBackend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    async fn generate(&self, request: GenerateRequest) -> Result<String, GatewayError> {
        self.seen.lock().push(request);
        Ok(self.response.clone())
    }
}
