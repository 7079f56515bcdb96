use crate::mood::Mood;
use crate::screenshot::{Preview, Screenshot};
use crate::text::{
    FALLBACK_RESPONSE, GENERATING_PLACEHOLDER, MISSING_SCREENSHOT_ALERT, SUBMIT_LABEL,
    SUBMIT_LABEL_BUSY,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{}", MISSING_SCREENSHOT_ALERT)]
    MissingScreenshot,
    #[error("a request is already in progress")]
    AlreadySubmitting,
    #[error("unsupported file type: {0} (expected image/*)")]
    UnsupportedFileType(String),
    #[error("unknown mood: {0:?} (expected casual, friendly, flirty or random)")]
    UnknownMood(String),
}

/// Everything that goes into one outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRequest {
    pub screenshot: Screenshot,
    pub mood: Mood,
    pub notes: String,
}

/// What the response panel should show for the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseView {
    Hidden,
    // Loading with nothing received yet.
    Pending { placeholder: &'static str },
    Text(String),
}

/// State of the reply form for a single session.
#[derive(Debug, Clone, Default)]
pub struct ReplyForm {
    screenshot: Option<Screenshot>,
    preview: Option<Preview>,
    mood: Mood,
    notes: String,
    is_loading: bool,
    response: String,
}

impl ReplyForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mood(mut self, mood: Mood) -> Self {
        self.mood = mood;
        self
    }

    pub fn screenshot(&self) -> Option<&Screenshot> {
        self.screenshot.as_ref()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    /// Replaces the selected file and its preview.
    ///
    /// Returns the previous preview so the caller can release it.
    pub fn select_file(&mut self, shot: Screenshot) -> Option<Preview> {
        let preview = Preview::for_screenshot(&shot);
        self.screenshot = Some(shot);
        self.preview.replace(preview)
    }

    pub fn set_mood(&mut self, mood: Mood) {
        self.mood = mood;
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Validates the form and flips it into the loading state.
    ///
    /// On success the response is cleared and the request snapshot is returned.
    pub fn begin_submit(&mut self) -> Result<ReplyRequest, FormError> {
        if self.is_loading {
            return Err(FormError::AlreadySubmitting);
        }
        let screenshot = self
            .screenshot
            .clone()
            .ok_or(FormError::MissingScreenshot)?;

        self.is_loading = true;
        self.response.clear();

        Ok(ReplyRequest {
            screenshot,
            mood: self.mood,
            notes: self.notes.clone(),
        })
    }

    pub fn append_fragment(&mut self, fragment: &str) {
        self.response.push_str(fragment);
    }

    pub fn finish(&mut self) {
        self.is_loading = false;
    }

    /// Any failure discards partial output.
    pub fn fail(&mut self) {
        self.response = FALLBACK_RESPONSE.to_string();
        self.is_loading = false;
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_loading {
            SUBMIT_LABEL_BUSY
        } else {
            SUBMIT_LABEL
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.is_loading
    }

    pub fn response_view(&self) -> ResponseView {
        if !self.response.is_empty() {
            ResponseView::Text(self.response.clone())
        } else if self.is_loading {
            ResponseView::Pending {
                placeholder: GENERATING_PLACEHOLDER,
            }
        } else {
            ResponseView::Hidden
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str) -> Screenshot {
        Screenshot::new(name, "image/png", vec![0x89, b'P', b'N', b'G']).unwrap()
    }

    #[test]
    fn submit_without_file_is_rejected_and_state_untouched() {
        let mut form = ReplyForm::new();
        let err = form.begin_submit().unwrap_err();
        assert_eq!(err, FormError::MissingScreenshot);
        assert_eq!(err.to_string(), "Please upload a screenshot");
        assert!(!form.is_loading());
        assert_eq!(form.response_view(), ResponseView::Hidden);
    }

    #[test]
    fn selecting_a_new_file_replaces_the_preview() {
        let mut form = ReplyForm::new();
        assert!(form.select_file(png("a.png")).is_none());
        let first = form.preview().cloned().unwrap();

        let revoked = form.select_file(png("b.png")).unwrap();
        assert_eq!(revoked, first);

        let current = form.preview().unwrap();
        assert_ne!(current.id, first.id);
        assert_eq!(current.filename, "b.png");
        assert_eq!(form.screenshot().unwrap().filename, "b.png");
    }

    #[test]
    fn begin_submit_snapshots_fields_and_clears_response() {
        let mut form = ReplyForm::new().with_mood(Mood::Flirty);
        form.select_file(png("chat.png"));
        form.set_notes("she likes hiking");
        form.append_fragment("stale");

        let req = form.begin_submit().unwrap();
        assert_eq!(req.mood, Mood::Flirty);
        assert_eq!(req.notes, "she likes hiking");
        assert_eq!(req.screenshot.filename, "chat.png");
        assert!(form.is_loading());
        assert_eq!(form.response(), "");
        assert_eq!(form.submit_label(), "Processing...");
        assert_eq!(
            form.response_view(),
            ResponseView::Pending {
                placeholder: "Generating response..."
            }
        );
    }

    #[test]
    fn second_submit_while_loading_is_refused() {
        let mut form = ReplyForm::new();
        form.select_file(png("chat.png"));
        form.begin_submit().unwrap();
        assert!(!form.can_submit());
        assert_eq!(form.begin_submit().unwrap_err(), FormError::AlreadySubmitting);
    }

    #[test]
    fn fragments_accumulate_then_finish_clears_loading() {
        let mut form = ReplyForm::new();
        form.select_file(png("chat.png"));
        form.begin_submit().unwrap();
        form.append_fragment("Hey, ");
        form.append_fragment("how was the hike?");
        assert_eq!(
            form.response_view(),
            ResponseView::Text("Hey, how was the hike?".into())
        );
        form.finish();
        assert!(!form.is_loading());
        assert_eq!(form.submit_label(), "Ask");
        assert_eq!(form.response(), "Hey, how was the hike?");
    }

    #[test]
    fn fail_replaces_partial_output() {
        let mut form = ReplyForm::new();
        form.select_file(png("chat.png"));
        form.begin_submit().unwrap();
        form.append_fragment("partial");
        form.fail();
        assert!(!form.is_loading());
        assert_eq!(form.response(), FALLBACK_RESPONSE);
    }
}
