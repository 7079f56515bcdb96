use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

impl std::fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("body", &self.body.summary())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Body {
    Empty,
    MultipartFormData { boundary: String, bytes: Vec<u8> },
}

impl Body {
    // Payloads carry image bytes; never print them.
    pub fn summary(&self) -> String {
        match self {
            Body::Empty => "Empty".to_string(),
            Body::MultipartFormData { boundary, bytes } => {
                format!("MultipartFormData(boundary={}, bytes_len={})", boundary, bytes.len())
            }
        }
    }
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req = HttpRequest {
            method: "GET".into(),
            url: "https://example.com".into(),
            headers: vec![("Accept".into(), "text/event-stream".into())],
            body: Body::Empty,
        };
        assert_eq!(req.header("accept"), Some("text/event-stream"));
        assert_eq!(req.header("content-type"), None);
    }

    #[test]
    fn debug_summarizes_body() {
        let req = HttpRequest {
            method: "POST".into(),
            url: "https://example.com/api/vision".into(),
            headers: vec![("Accept".into(), "text/event-stream".into())],
            body: Body::MultipartFormData {
                boundary: "b".into(),
                bytes: b"secret-image-bytes".to_vec(),
            },
        };

        let s = format!("{req:?}");
        assert!(!s.contains("secret-image-bytes"));
        assert!(s.contains("bytes_len=18"));
        assert!(s.contains("text/event-stream"));
    }

    #[test]
    fn join_url_handles_trailing_slash() {
        assert_eq!(
            join_url("https://api.example.com/", "/api/vision"),
            "https://api.example.com/api/vision"
        );
        assert_eq!(
            join_url("https://api.example.com", "api/vision"),
            "https://api.example.com/api/vision"
        );
    }
}
