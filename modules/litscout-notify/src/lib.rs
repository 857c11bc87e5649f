// Notification fan-out.
//
// Each channel declares its own payload limit; the dispatcher splits the
// digest into chunks at line boundaries, sends them sequentially with
// bounded linear-backoff retries, and isolates failures: a dead channel or
// chunk never stops the remaining chunks or channels.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, warn};

use litscout_common::NotifyConfig;

pub mod slack;
pub mod telegram;

pub use slack::SlackChannel;
pub use telegram::TelegramChannel;

#[async_trait]
pub trait Channel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Maximum payload size per send, in bytes.
    fn max_bytes(&self) -> usize;

    async fn send(&self, chunk: &str) -> Result<()>;
}

/// Split `text` into chunks of at most `max_bytes`, preferring line
/// boundaries. A single line longer than `max_bytes` is hard-cut at char
/// boundaries; a chunk can only exceed the limit if the limit is smaller
/// than one UTF-8 character.
pub fn split_chunks(text: &str, max_bytes: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    if text.len() <= max_bytes {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.split('\n') {
        if line.len() > max_bytes {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            chunks.extend(hard_cut(line, max_bytes));
            continue;
        }

        let needed = if current.is_empty() {
            line.len()
        } else {
            current.len() + 1 + line.len()
        };
        if needed > max_bytes {
            chunks.push(std::mem::take(&mut current));
            current.push_str(line);
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn hard_cut(line: &str, max_bytes: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut start = 0;
    while start < line.len() {
        let mut end = (start + max_bytes).min(line.len());
        while end > start && !line.is_char_boundary(end) {
            end -= 1;
        }
        if end == start {
            // max_bytes is smaller than this character; take it whole.
            end = (start + 1..=line.len())
                .find(|&i| line.is_char_boundary(i))
                .unwrap_or(line.len());
        }
        pieces.push(line[start..end].to_string());
        start = end;
    }
    pieces
}

#[derive(Debug, Default)]
pub struct DispatchStats {
    pub channels_attempted: u32,
    pub channels_failed: u32,
    pub chunks_sent: u32,
    pub chunks_failed: u32,
}

pub struct Dispatcher {
    max_retries: u32,
    backoff: Duration,
}

impl Dispatcher {
    pub fn new(config: NotifyConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff: Duration::from_secs(config.backoff_secs),
        }
    }

    /// Send `digest` to every channel, chunked per channel limit.
    pub async fn dispatch(&self, channels: &[Box<dyn Channel>], digest: &str) -> DispatchStats {
        let mut stats = DispatchStats::default();

        for channel in channels {
            stats.channels_attempted += 1;
            let chunks = split_chunks(digest, channel.max_bytes());
            let mut failed = false;

            for (i, chunk) in chunks.iter().enumerate() {
                match self.send_with_retry(channel.as_ref(), chunk).await {
                    Ok(()) => stats.chunks_sent += 1,
                    Err(e) => {
                        warn!(
                            channel = channel.name(),
                            chunk = i,
                            error = %e,
                            "Chunk delivery failed, continuing"
                        );
                        stats.chunks_failed += 1;
                        failed = true;
                    }
                }
            }

            if failed {
                stats.channels_failed += 1;
            } else {
                info!(
                    channel = channel.name(),
                    chunks = chunks.len(),
                    "Digest delivered"
                );
            }
        }

        stats
    }

    async fn send_with_retry(&self, channel: &dyn Channel, chunk: &str) -> Result<()> {
        let mut attempt: u32 = 0;
        loop {
            match channel.send(chunk).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.backoff * attempt;
                    warn!(
                        channel = channel.name(),
                        attempt,
                        delay_secs = delay.as_secs(),
                        error = %e,
                        "Send failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(split_chunks("hello", 100), vec!["hello"]);
    }

    #[test]
    fn empty_text_is_no_chunks() {
        assert!(split_chunks("", 100).is_empty());
    }

    #[test]
    fn splits_at_line_boundaries() {
        let text = "aaaa\nbbbb\ncccc";
        let chunks = split_chunks(text, 9);
        assert_eq!(chunks, vec!["aaaa\nbbbb", "cccc"]);
        assert!(chunks.iter().all(|c| c.len() <= 9));
    }

    #[test]
    fn uniform_input_yields_ceil_div_chunks() {
        // 100 bytes in a single line, max 30: ceil(100/30) = 4 chunks.
        let text = "x".repeat(100);
        let chunks = split_chunks(&text, 30);
        assert_eq!(chunks.len(), 4);
        assert!(chunks.iter().all(|c| c.len() <= 30));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn oversized_line_is_cut_at_char_boundaries() {
        // 4-byte scorpions; a 10-byte limit must cut at 8, not 10.
        let text = "\u{1F982}".repeat(5);
        let chunks = split_chunks(&text, 10);
        assert!(chunks.iter().all(|c| c.len() <= 10));
        assert_eq!(chunks.concat(), text);
    }

    struct FlakyChannel {
        fail_first: u32,
        attempts: AtomicU32,
    }

    #[async_trait]
    impl Channel for FlakyChannel {
        fn name(&self) -> &'static str {
            "flaky"
        }

        fn max_bytes(&self) -> usize {
            1024
        }

        async fn send(&self, _chunk: &str) -> Result<()> {
            let n = self.attempts.fetch_add(1, Ordering::SeqCst);
            if n < self.fail_first {
                anyhow::bail!("transient failure {n}")
            }
            Ok(())
        }
    }

    struct DeadChannel;

    #[async_trait]
    impl Channel for DeadChannel {
        fn name(&self) -> &'static str {
            "dead"
        }

        fn max_bytes(&self) -> usize {
            1024
        }

        async fn send(&self, _chunk: &str) -> Result<()> {
            anyhow::bail!("channel is down")
        }
    }

    fn fast_dispatcher() -> Dispatcher {
        Dispatcher::new(NotifyConfig {
            max_retries: 2,
            backoff_secs: 0,
        })
    }

    #[tokio::test]
    async fn retries_recover_transient_failures() {
        let channel = FlakyChannel {
            fail_first: 2,
            attempts: AtomicU32::new(0),
        };
        let channels: Vec<Box<dyn Channel>> = vec![Box::new(channel)];
        let stats = fast_dispatcher().dispatch(&channels, "digest body").await;
        assert_eq!(stats.chunks_sent, 1);
        assert_eq!(stats.chunks_failed, 0);
        assert_eq!(stats.channels_failed, 0);
    }

    #[tokio::test]
    async fn dead_channel_does_not_block_others() {
        let channels: Vec<Box<dyn Channel>> = vec![
            Box::new(DeadChannel),
            Box::new(FlakyChannel {
                fail_first: 0,
                attempts: AtomicU32::new(0),
            }),
        ];
        let stats = fast_dispatcher().dispatch(&channels, "digest body").await;
        assert_eq!(stats.channels_attempted, 2);
        assert_eq!(stats.channels_failed, 1);
        assert_eq!(stats.chunks_sent, 1);
        assert_eq!(stats.chunks_failed, 1);
    }
}
