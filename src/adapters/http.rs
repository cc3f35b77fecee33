use crate::config::toml_config::DispatchConfig;
use crate::domain::model::DispatchOutcome;
use crate::domain::ports::AlertDispatcher;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct CallContext<'a> {
    message: &'a str,
}

#[derive(Debug, Serialize)]
struct DispatchRequest<'a> {
    agent_id: u64,
    to_number: &'a str,
    call_context: CallContext<'a>,
}

/// Places calls through the OmniDimension call-dispatch endpoint.
pub struct OmniDispatcher {
    config: DispatchConfig,
    client: Client,
}

impl OmniDispatcher {
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl AlertDispatcher for OmniDispatcher {
    async fn dispatch(&self, message: &str, to_number: &str) -> DispatchOutcome {
        if message.trim().is_empty() {
            return DispatchOutcome::Failed {
                status: None,
                detail: "refusing to dispatch an empty message".to_string(),
            };
        }

        let payload = DispatchRequest {
            agent_id: self.config.agent_id,
            to_number,
            call_context: CallContext { message },
        };

        tracing::debug!("Dispatching call request to: {}", self.config.endpoint);
        let response = match self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("❌ Voice service request failed: {}", e);
                return DispatchOutcome::Failed {
                    status: None,
                    detail: e.to_string(),
                };
            }
        };

        let status = response.status();
        tracing::debug!("Voice service response status: {}", status);
        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<unreadable response body: {}>", e));

        if status == StatusCode::OK {
            DispatchOutcome::Delivered {
                status: status.as_u16(),
                body,
            }
        } else {
            DispatchOutcome::Failed {
                status: Some(status.as_u16()),
                detail: body,
            }
        }
    }
}
