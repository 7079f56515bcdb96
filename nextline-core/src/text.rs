// User-facing strings shown by the reply form.

pub const HEADING: &str = "Know what to say next";
pub const UPLOAD_PROMPT: &str = "Upload screenshot";
pub const NOTES_LABEL: &str = "Additional notes";
pub const NOTES_PLACEHOLDER: &str = "Anything we should know?";
pub const MOOD_LABEL: &str = "Mood";

pub const SUBMIT_LABEL: &str = "Ask";
pub const SUBMIT_LABEL_BUSY: &str = "Processing...";

pub const MISSING_SCREENSHOT_ALERT: &str = "Please upload a screenshot";
pub const GENERATING_PLACEHOLDER: &str = "Generating response...";

/// Replaces the whole response when the request or its stream fails.
pub const FALLBACK_RESPONSE: &str = "An error occurred while processing your request.";

/// Upper-cases the first character, leaving the rest untouched.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
