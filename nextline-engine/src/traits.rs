use async_trait::async_trait;
use nextline_core::form::ReplyRequest;
use nextline_providers::sse::FragmentStream;

/// Where replies come from.
///
/// Implementations send one request per call and return the reply as it streams.
#[async_trait]
pub trait ReplyBackend: Send + Sync {
    async fn open_reply(&self, req: &ReplyRequest) -> anyhow::Result<FragmentStream>;
}
