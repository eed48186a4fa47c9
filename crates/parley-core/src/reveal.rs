//! Simulated streaming reveal of a complete response.
//!
//! The engine returns the full assistant text in one shot; the SSE variant
//! of the send endpoint replays it chunk-by-chunk so the client sees
//! something resembling token-by-token generation. This is purely cosmetic:
//! the messages are already persisted before the reveal starts, and
//! cancelling the reveal cancels nothing upstream.
//!
//! Planning is a pure function over the text; the async stream layers
//! sleeps and cancellation on top. Cancellation is an explicit
//! [`CancellationToken`] checked before every step -- there is no shared
//! mutable flag.

use std::time::Duration;

use futures_util::Stream;
use tokio_util::sync::CancellationToken;

/// Pacing knobs for the reveal.
#[derive(Debug, Clone)]
pub struct RevealOptions {
    /// Pause after an ordinary character.
    pub base_delay: Duration,
    /// Pause after sentence-ending punctuation (`.` `!` `?`).
    pub sentence_delay: Duration,
    /// Pause after whitespace.
    pub whitespace_delay: Duration,
    /// Pause while inside an unterminated fenced code block.
    pub code_delay: Duration,
    /// Chunk size while little text remains.
    pub min_chunk: usize,
    /// Chunk size while a long tail remains.
    pub max_chunk: usize,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(24),
            sentence_delay: Duration::from_millis(180),
            whitespace_delay: Duration::from_millis(8),
            code_delay: Duration::from_millis(1),
            min_chunk: 2,
            max_chunk: 8,
        }
    }
}

/// One planned reveal step: a chunk and the pause that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealStep {
    pub text: String,
    pub delay: Duration,
}

/// Plan the full reveal for `text`.
///
/// Chunks always end on character boundaries and concatenate back to the
/// input exactly. Chunk size grows with the remaining length so long tails
/// reveal faster; the delay after each chunk depends on its last character
/// and on whether the chunk ends inside a fenced code block (odd number of
/// ``` fences seen so far).
pub fn plan_reveal(text: &str, options: &RevealOptions) -> Vec<RevealStep> {
    let chars: Vec<char> = text.chars().collect();
    let mut steps = Vec::new();
    let mut pos = 0;
    let mut backtick_run = 0usize;
    let mut in_fence = false;

    while pos < chars.len() {
        let remaining = chars.len() - pos;
        let size = chunk_size(remaining, options).min(remaining);
        let chunk: String = chars[pos..pos + size].iter().collect();

        for &c in &chars[pos..pos + size] {
            if c == '`' {
                backtick_run += 1;
                if backtick_run == 3 {
                    in_fence = !in_fence;
                    backtick_run = 0;
                }
            } else {
                backtick_run = 0;
            }
        }

        let last = chars[pos + size - 1];
        let delay = if in_fence {
            options.code_delay
        } else if matches!(last, '.' | '!' | '?') {
            options.sentence_delay
        } else if last.is_whitespace() {
            options.whitespace_delay
        } else {
            options.base_delay
        };

        steps.push(RevealStep { text: chunk, delay });
        pos += size;
    }

    steps
}

fn chunk_size(remaining: usize, options: &RevealOptions) -> usize {
    if remaining > 600 {
        options.max_chunk
    } else if remaining > 200 {
        options.max_chunk.div_ceil(2).max(options.min_chunk)
    } else {
        options.min_chunk
    }
}

/// Stream the planned chunks with their delays.
///
/// The token is checked before every step and raced against every sleep, so
/// cancellation (client disconnect, service shutdown) stops the reveal
/// mid-text without yielding further chunks.
pub fn reveal_stream(
    text: String,
    options: RevealOptions,
    cancel: CancellationToken,
) -> impl Stream<Item = String> {
    let steps = plan_reveal(&text, &options);
    async_stream::stream! {
        for step in steps {
            if cancel.is_cancelled() {
                break;
            }
            yield step.text;
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(step.delay) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[test]
    fn test_chunks_concatenate_to_input() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(20);
        let steps = plan_reveal(&text, &RevealOptions::default());
        let rebuilt: String = steps.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_sentence_pause_longest() {
        let options = RevealOptions::default();
        assert!(options.sentence_delay > options.base_delay);
        assert!(options.base_delay > options.whitespace_delay);
        assert!(options.whitespace_delay > options.code_delay);
    }

    #[test]
    fn test_sentence_end_gets_sentence_delay() {
        let options = RevealOptions {
            min_chunk: 1,
            max_chunk: 1,
            ..RevealOptions::default()
        };
        let steps = plan_reveal("Hi. Go", &options);
        assert_eq!(steps[2].text, ".");
        assert_eq!(steps[2].delay, options.sentence_delay);
        assert_eq!(steps[3].delay, options.whitespace_delay);
    }

    #[test]
    fn test_code_fence_near_zero_delay() {
        let options = RevealOptions {
            min_chunk: 1,
            max_chunk: 1,
            ..RevealOptions::default()
        };
        let steps = plan_reveal("a\n```\nlet x = 1;\n```\nb", &options);
        // Steps inside the fence run at code_delay.
        let inside = steps
            .iter()
            .skip_while(|s| s.text != "`")
            .skip(3)
            .take_while(|s| s.text != "`")
            .collect::<Vec<_>>();
        assert!(!inside.is_empty());
        assert!(inside.iter().all(|s| s.delay == options.code_delay));
        // The final step, past the closing fence, is back to normal pacing.
        assert_eq!(steps.last().unwrap().delay, options.base_delay);
    }

    #[test]
    fn test_chunk_size_scales_with_remaining() {
        let options = RevealOptions::default();
        let long = "x".repeat(1000);
        let steps = plan_reveal(&long, &options);
        assert_eq!(steps.first().unwrap().text.chars().count(), options.max_chunk);
        assert_eq!(steps.last().unwrap().text.chars().count(), options.min_chunk);
    }

    #[test]
    fn test_multibyte_chunks_stay_on_boundaries() {
        let text = "héllo wörld. ∂éjà vu — ça va? 日本語もある。".repeat(8);
        let steps = plan_reveal(&text, &RevealOptions::default());
        let rebuilt: String = steps.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(rebuilt, text);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_yields_all_chunks() {
        let text = "Hello there, general response.".to_string();
        let cancel = CancellationToken::new();
        let chunks: Vec<String> =
            reveal_stream(text.clone(), RevealOptions::default(), cancel)
                .collect()
                .await;
        assert_eq!(chunks.concat(), text);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_token_yields_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let chunks: Vec<String> = reveal_stream(
            "never shown".to_string(),
            RevealOptions::default(),
            cancel,
        )
        .collect()
        .await;
        assert!(chunks.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_mid_stream_stops_early() {
        let text = "x".repeat(400);
        let cancel = CancellationToken::new();
        let mut stream = std::pin::pin!(reveal_stream(
            text,
            RevealOptions::default(),
            cancel.clone()
        ));
        let first = stream.next().await;
        assert!(first.is_some());
        cancel.cancel();
        let mut rest = 0;
        while stream.next().await.is_some() {
            rest += 1;
        }
        // At most the chunk already in flight arrives after cancellation.
        assert!(rest <= 1);
    }
}
