use crate::session::{SubmitOutcome, SubmitTimings, ms};
use crate::traits::ReplyBackend;
use futures_util::StreamExt;
use nextline_core::form::{FormError, ReplyForm, ReplyRequest};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Form(#[from] FormError),
}

/// Progress emitted while a submission runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyEvent<'a> {
    Started,
    Fragment(&'a str),
    Completed,
    /// Carries the text now on display.
    Failed(&'a str),
}

pub struct ReplyEngine {
    backend: Arc<dyn ReplyBackend>,
}

impl ReplyEngine {
    pub fn new(backend: Arc<dyn ReplyBackend>) -> Self {
        Self { backend }
    }

    /// Submits the form and streams the reply into it.
    pub async fn submit(&self, form: &mut ReplyForm) -> Result<SubmitOutcome, EngineError> {
        self.submit_with_hook(form, |_event| {}).await
    }

    /// Same as `submit`, but reports progress as fragments arrive.
    ///
    /// Validation failures return `Err` before any request is made. Once the
    /// request is under way every failure ends in an `Ok` outcome with stage
    /// `Failed` and the fallback text on the form.
    ///
    /// The hook runs inline with stream reads and must be fast.
    pub async fn submit_with_hook<F>(
        &self,
        form: &mut ReplyForm,
        mut on_event: F,
    ) -> Result<SubmitOutcome, EngineError>
    where
        F: FnMut(ReplyEvent<'_>),
    {
        let req = match form.begin_submit() {
            Ok(req) => req,
            Err(e) => {
                log::warn!("submit rejected: {e}");
                return Err(e.into());
            }
        };

        log::info!(
            "submitting screenshot={} bytes={} mood={} notes_len={}",
            req.screenshot.filename,
            req.screenshot.len(),
            req.mood,
            req.notes.chars().count()
        );
        on_event(ReplyEvent::Started);

        let t0 = Instant::now();
        let mut timings = SubmitTimings::default();
        let mut fragments = 0usize;

        let res = self
            .stream_into(form, &req, &mut fragments, &mut timings, t0, &mut on_event)
            .await;
        timings.total_ms = Some(ms(t0.elapsed()));

        match res {
            Ok(()) => {
                form.finish();
                log::info!(
                    "reply complete: fragments={} chars={} total_ms={:?}",
                    fragments,
                    form.response().chars().count(),
                    timings.total_ms
                );
                on_event(ReplyEvent::Completed);
                Ok(SubmitOutcome::done(
                    form.response().to_string(),
                    fragments,
                    timings,
                ))
            }
            Err(e) => {
                log::error!("reply failed after {fragments} fragments: {e:#}");
                form.fail();
                on_event(ReplyEvent::Failed(form.response()));
                Ok(SubmitOutcome::failed(
                    form.response().to_string(),
                    fragments,
                    timings,
                    format!("{e:#}"),
                ))
            }
        }
    }

    async fn stream_into<F>(
        &self,
        form: &mut ReplyForm,
        req: &ReplyRequest,
        fragments: &mut usize,
        timings: &mut SubmitTimings,
        t0: Instant,
        on_event: &mut F,
    ) -> anyhow::Result<()>
    where
        F: FnMut(ReplyEvent<'_>),
    {
        let mut stream = self.backend.open_reply(req).await?;

        while let Some(fragment) = stream.next().await {
            let fragment = fragment?;
            if timings.first_fragment_ms.is_none() {
                timings.first_fragment_ms = Some(ms(t0.elapsed()));
            }
            form.append_fragment(&fragment);
            *fragments += 1;
            on_event(ReplyEvent::Fragment(&fragment));
        }

        Ok(())
    }
}
