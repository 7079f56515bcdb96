//! Decoder for the reply stream.
//!
//! The server sends blocks separated by a blank line. Each `data: ` line in a
//! block carries a JSON object whose `content` string is the next piece of the
//! reply. Blocks may straddle network chunks, so bytes are buffered until a
//! full block is available.

use std::collections::VecDeque;
use std::pin::Pin;

use anyhow::Context;
use bytes::Bytes;
use futures_util::stream::{self, Stream, StreamExt};

pub const DATA_PREFIX: &str = "data: ";
pub const DONE_SENTINEL: &str = "[DONE]";

pub type FragmentStream = Pin<Box<dyn Stream<Item = anyhow::Result<String>> + Send>>;

/// Largest block accepted before a blank line must appear.
pub const MAX_BLOCK_BYTES: usize = 1024 * 1024;

/// Accumulates raw chunks and hands out complete blocks.
#[derive(Debug, Default)]
pub struct ChunkBuffer {
    pending: Vec<u8>,
    // Bytes of `pending` already searched for a blank line.
    scanned: usize,
}

impl ChunkBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk, dropping carriage returns so CRLF framing looks like LF.
    pub fn push_chunk(&mut self, chunk: &[u8]) {
        self.pending
            .extend(chunk.iter().copied().filter(|b| *b != b'\r'));
    }

    /// Next complete, non-blank block, if one is buffered.
    pub fn next_block(&mut self) -> Option<String> {
        loop {
            // Back up one byte so a "\n\n" split across chunks is still found.
            let from = self.scanned.saturating_sub(1);
            let Some(rel) = find_blank_line(&self.pending[from..]) else {
                self.scanned = self.pending.len();
                return None;
            };
            let pos = from + rel;
            let raw: Vec<u8> = self.pending.drain(..pos + 2).collect();
            self.scanned = 0;
            let block = String::from_utf8_lossy(&raw[..pos]).into_owned();
            if !block.trim().is_empty() {
                return Some(block);
            }
        }
    }

    /// Bytes still waiting for a block boundary.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Drains whatever is left once the stream has ended.
    pub fn take_remaining(&mut self) -> Option<String> {
        let raw = std::mem::take(&mut self.pending);
        self.scanned = 0;
        let rest = String::from_utf8_lossy(&raw).into_owned();
        (!rest.trim().is_empty()).then_some(rest)
    }
}

fn find_blank_line(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\n\n")
}

/// Extracts content fragments from one block, in line order.
///
/// Fails if a `data: ` payload is not valid JSON.
pub fn parse_block(block: &str) -> anyhow::Result<Vec<String>> {
    let mut out = Vec::new();
    for line in block.lines() {
        let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
            continue;
        };
        let payload = payload.trim();
        if payload == DONE_SENTINEL {
            continue;
        }

        let value: serde_json::Value =
            serde_json::from_str(payload).context("decode stream fragment JSON")?;
        if let Some(content) = value.get("content").and_then(|c| c.as_str()) {
            if !content.is_empty() {
                out.push(content.to_string());
            }
        }
    }
    Ok(out)
}

struct DecoderState<S> {
    chunks: Pin<Box<S>>,
    buffer: ChunkBuffer,
    ready: VecDeque<String>,
    error: Option<anyhow::Error>,
    finished: bool,
}

impl<S> DecoderState<S> {
    fn drain_blocks(&mut self) {
        while let Some(block) = self.buffer.next_block() {
            if !self.ingest(&block) {
                return;
            }
        }
    }

    fn ingest(&mut self, block: &str) -> bool {
        match parse_block(block) {
            Ok(fragments) => {
                self.ready.extend(fragments);
                true
            }
            Err(e) => {
                self.error = Some(e);
                self.finished = true;
                false
            }
        }
    }
}

/// Turns a body byte stream into a stream of content fragments.
///
/// Fragments decoded before a failure are yielded first; the stream then
/// yields the error and ends.
pub fn content_fragments<S, E>(chunks: S) -> FragmentStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let state = DecoderState {
        chunks: Box::pin(chunks),
        buffer: ChunkBuffer::new(),
        ready: VecDeque::new(),
        error: None,
        finished: false,
    };

    let stream = stream::unfold(state, |mut st| async move {
        loop {
            if let Some(fragment) = st.ready.pop_front() {
                return Some((Ok(fragment), st));
            }
            if let Some(e) = st.error.take() {
                return Some((Err(e), st));
            }
            if st.finished {
                return None;
            }

            match st.chunks.next().await {
                Some(Ok(chunk)) => {
                    st.buffer.push_chunk(&chunk);
                    st.drain_blocks();
                    if st.error.is_none() && st.buffer.pending_len() > MAX_BLOCK_BYTES {
                        st.finished = true;
                        st.error = Some(anyhow::anyhow!(
                            "stream block exceeds {MAX_BLOCK_BYTES} bytes without a blank line"
                        ));
                    }
                }
                Some(Err(e)) => {
                    st.finished = true;
                    st.error = Some(anyhow::Error::new(e).context("read response stream"));
                }
                None => {
                    st.finished = true;
                    if let Some(rest) = st.buffer.take_remaining() {
                        st.ingest(&rest);
                    }
                }
            }
        }
    });

    Box::pin(stream)
}
