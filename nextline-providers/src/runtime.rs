use crate::request::{Body, HttpRequest};
use crate::sse::{FragmentStream, content_fragments};
use anyhow::{Context, anyhow};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

// Error bodies are only logged; cap what we keep.
const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientOptions {
    pub connect_timeout: Duration,
}

impl Default for HttpClientOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
        }
    }
}

pub struct StreamingResponse {
    pub status: u16,
    pub fragments: FragmentStream,
}

impl std::fmt::Debug for StreamingResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Sends the request and returns the body as a stream of reply fragments.
///
/// Only a connect timeout is applied: replies stream for as long as the
/// server keeps the body open.
pub async fn open_stream(
    req: &HttpRequest,
    opts: &HttpClientOptions,
) -> anyhow::Result<StreamingResponse> {
    let client = reqwest::Client::builder()
        .connect_timeout(opts.connect_timeout)
        .build()
        .context("build http client")?;

    let mut headers = HeaderMap::new();
    for (k, v) in &req.headers {
        let name = HeaderName::from_bytes(k.as_bytes())
            .with_context(|| format!("invalid header name: {k}"))?;
        let value =
            HeaderValue::from_str(v).with_context(|| format!("invalid header value for {k}"))?;
        headers.insert(name, value);
    }

    let builder = match req.method.as_str() {
        "GET" => client.get(&req.url),
        "POST" => client.post(&req.url),
        other => return Err(anyhow!("unsupported method: {other}")),
    }
    .headers(headers);

    let builder = match &req.body {
        Body::Empty => builder,
        Body::MultipartFormData { bytes, .. } => builder.body(bytes.clone()),
    };

    log::debug!("sending {req:?}");
    let resp = builder.send().await.context("http request failed")?;
    let status = resp.status().as_u16();

    // Error statuses fail the submission instead of yielding an empty reply.
    if !resp.status().is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(anyhow!(
            "reply request failed: status={} body={}",
            status,
            truncate_chars(&body, MAX_ERROR_BODY_CHARS)
        ));
    }

    Ok(StreamingResponse {
        status,
        fragments: content_fragments(resp.bytes_stream()),
    })
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::{VisionEndpointConfig, build_vision_request};
    use futures_util::StreamExt;
    use nextline_core::form::ReplyRequest;
    use nextline_core::mood::Mood;
    use nextline_core::screenshot::Screenshot;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn vision_request(host: &str) -> HttpRequest {
        let cfg = VisionEndpointConfig {
            api_hostname: host.to_string(),
        };
        build_vision_request(
            &cfg,
            &ReplyRequest {
                screenshot: Screenshot::new("chat.png", "image/png", vec![7; 32]).unwrap(),
                mood: Mood::Random,
                notes: "keep it short".into(),
            },
        )
    }

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_chars("h\u{e9}llo", 2), "h\u{e9}");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }

    #[tokio::test]
    async fn streams_fragments_from_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/vision"))
            .and(header("accept", "text/event-stream"))
            .and(body_string_contains("name=\"mood\"\r\n\r\nrandom"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "data: {\"content\":\"One\"}\n\ndata: {\"content\":\" two\"}\n\n",
                "text/event-stream",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let resp = open_stream(&vision_request(&server.uri()), &HttpClientOptions::default())
            .await
            .unwrap();
        assert_eq!(resp.status, 200);

        let parts: Vec<String> = resp
            .fragments
            .map(|r| r.unwrap())
            .collect::<Vec<_>>()
            .await;
        assert_eq!(parts.concat(), "One two");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/vision"))
            .respond_with(ResponseTemplate::new(502).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let err = open_stream(&vision_request(&server.uri()), &HttpClientOptions::default())
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("status=502"));
        assert!(msg.contains("upstream down"));
    }

    #[tokio::test]
    async fn unsupported_method_is_rejected_before_sending() {
        let mut req = vision_request("http://127.0.0.1:9");
        req.method = "PATCH".into();
        let err = open_stream(&req, &HttpClientOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unsupported method"));
    }
}
