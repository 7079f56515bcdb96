use nextline_core::config::AppConfig;
use nextline_core::form::ReplyRequest;
use nextline_engine::engine::ReplyEngine;
use nextline_engine::traits::ReplyBackend;
use nextline_providers::runtime::{HttpClientOptions, open_stream};
use nextline_providers::sse::FragmentStream;
use nextline_providers::vision::{VisionEndpointConfig, build_vision_request};
use std::sync::Arc;
use std::time::Duration;

/// Sends replies to the vision endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct HttpReplyBackend {
    endpoint: VisionEndpointConfig,
    opts: HttpClientOptions,
}

impl HttpReplyBackend {
    pub fn new(endpoint: VisionEndpointConfig, opts: HttpClientOptions) -> Self {
        Self { endpoint, opts }
    }

    pub fn from_config(cfg: &AppConfig) -> Self {
        Self::new(
            VisionEndpointConfig {
                api_hostname: cfg.api_hostname.clone(),
            },
            HttpClientOptions {
                connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            },
        )
    }

    pub fn endpoint_url(&self) -> String {
        self.endpoint.url()
    }
}

#[async_trait::async_trait]
impl ReplyBackend for HttpReplyBackend {
    async fn open_reply(&self, req: &ReplyRequest) -> anyhow::Result<FragmentStream> {
        let http = build_vision_request(&self.endpoint, req);
        let resp = open_stream(&http, &self.opts).await?;
        log::debug!("reply stream opened: status={}", resp.status);
        Ok(resp.fragments)
    }
}

pub fn build_engine_from_config(cfg: &AppConfig) -> ReplyEngine {
    ReplyEngine::new(Arc::new(HttpReplyBackend::from_config(cfg)))
}
