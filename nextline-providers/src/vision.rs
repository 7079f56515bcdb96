use crate::request::{Body, HttpRequest, join_url};
use nextline_core::form::ReplyRequest;

pub const VISION_PATH: &str = "/api/vision";

pub const FIELD_SCREENSHOT: &str = "screenshot";
pub const FIELD_MOOD: &str = "mood";
pub const FIELD_NOTES: &str = "notes";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisionEndpointConfig {
    pub api_hostname: String,
}

impl VisionEndpointConfig {
    pub fn url(&self) -> String {
        join_url(&self.api_hostname, VISION_PATH)
    }
}

pub fn build_vision_request(cfg: &VisionEndpointConfig, req: &ReplyRequest) -> HttpRequest {
    let boundary = format!("Boundary-{}", uuid::Uuid::new_v4());

    let mut body: Vec<u8> = Vec::new();

    append_file(
        &mut body,
        &boundary,
        FIELD_SCREENSHOT,
        &req.screenshot.filename,
        &req.screenshot.mime_type,
        &req.screenshot.bytes,
    );
    append_field(&mut body, &boundary, FIELD_MOOD, req.mood.as_str());
    append_field(&mut body, &boundary, FIELD_NOTES, &req.notes);

    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    HttpRequest {
        method: "POST".into(),
        url: cfg.url(),
        headers: vec![
            (
                "Content-Type".into(),
                format!("multipart/form-data; boundary={}", boundary),
            ),
            ("Accept".into(), "text/event-stream".into()),
        ],
        body: Body::MultipartFormData {
            boundary,
            bytes: body,
        },
    }
}

fn append_field(body: &mut Vec<u8>, boundary: &str, name: &str, value: &str) {
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
    );
    body.extend_from_slice(value.as_bytes());
    body.extend_from_slice(b"\r\n");
}

fn append_file(
    body: &mut Vec<u8>,
    boundary: &str,
    name: &str,
    filename: &str,
    mime_type: &str,
    bytes: &[u8],
) {
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            name,
            quote_filename(filename)
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", mime_type).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n");
}

// Filenames come from the user's disk; keep them from breaking the part header.
fn quote_filename(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .map(|c| if c == '"' { '\'' } else { c })
        .collect()
}
