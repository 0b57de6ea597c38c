//! Fan-out of lifecycle events to every registered secondary channel.
//!
//! Every broadcast starts the call on all channels before awaiting any of
//! them. All calls run to completion; if one or more fail, the broadcast
//! fails with the first failure in registration order after logging each
//! one. Channels are never cancelled because a sibling failed.

use anyhow::Result;
use futures_util::future::join_all;
use std::sync::Arc;

use super::ChannelEvents;
use crate::models::Tags;

/// Ordered set of secondary channels receiving push lifecycle events.
#[derive(Default)]
pub struct ChannelSynchronizer {
    channels: Vec<Arc<dyn ChannelEvents>>,
}

impl ChannelSynchronizer {
    /// Create a synchronizer with no channels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a channel. Channels are notified in registration order.
    pub fn register_channel(&mut self, channel: Arc<dyn ChannelEvents>) {
        log::debug!("Registered secondary channel '{}'", channel.name());
        self.channels.push(channel);
    }

    /// Number of registered channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Forward a session start to every channel.
    pub async fn on_session(&self) -> Result<()> {
        let results = join_all(self.channels.iter().map(|c| c.on_session())).await;
        self.settle("on_session", results)
    }

    /// Forward a focus duration to every channel.
    pub async fn on_focus(&self, duration_secs: u64) -> Result<()> {
        let results = join_all(self.channels.iter().map(|c| c.on_focus(duration_secs))).await;
        self.settle("on_focus", results)
    }

    /// Forward a tag update to every channel.
    pub async fn set_tags(&self, tags: &Tags) -> Result<()> {
        let results = join_all(self.channels.iter().map(|c| c.set_tags(tags))).await;
        self.settle("set_tags", results)
    }

    /// Forward an external user id to every channel.
    pub async fn set_external_user_id(&self, id: &str, auth_hash: Option<&str>) -> Result<()> {
        let results = join_all(
            self.channels
                .iter()
                .map(|c| c.set_external_user_id(id, auth_hash)),
        )
        .await;
        self.settle("set_external_user_id", results)
    }

    fn settle(&self, event: &str, results: Vec<Result<()>>) -> Result<()> {
        let mut first_error = None;
        for (channel, result) in self.channels.iter().zip(results) {
            if let Err(e) = result {
                log::warn!("[{}] {} failed: {:#}", channel.name(), event, e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl std::fmt::Debug for ChannelSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelSynchronizer")
            .field(
                "channels",
                &self.channels.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Barrier;

    /// Channel that records calls and optionally waits on a shared barrier.
    struct RecordingChannel {
        name: String,
        calls: Mutex<Vec<String>>,
        barrier: Option<Arc<Barrier>>,
        started: Arc<AtomicUsize>,
        fail: bool,
    }

    impl RecordingChannel {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                calls: Mutex::new(Vec::new()),
                barrier: None,
                started: Arc::new(AtomicUsize::new(0)),
                fail: false,
            }
        }

        async fn record(&self, call: String) -> Result<()> {
            self.started.fetch_add(1, Ordering::SeqCst);
            if let Some(barrier) = &self.barrier {
                barrier.wait().await;
            }
            self.calls.lock().unwrap().push(call);
            if self.fail {
                anyhow::bail!("{} exploded", self.name);
            }
            Ok(())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChannelEvents for RecordingChannel {
        fn name(&self) -> &str {
            &self.name
        }

        async fn on_session(&self) -> Result<()> {
            self.record("session".to_string()).await
        }

        async fn on_focus(&self, duration_secs: u64) -> Result<()> {
            self.record(format!("focus:{duration_secs}")).await
        }

        async fn set_tags(&self, tags: &Tags) -> Result<()> {
            self.record(format!("tags:{}", tags.len())).await
        }

        async fn set_external_user_id(&self, id: &str, auth_hash: Option<&str>) -> Result<()> {
            self.record(format!("external:{id}:{}", auth_hash.unwrap_or("-")))
                .await
        }
    }

    #[tokio::test]
    async fn test_on_session_reaches_every_channel_once() {
        let channels: Vec<_> = (0..3)
            .map(|i| Arc::new(RecordingChannel::new(&format!("ch{i}"))))
            .collect();
        let mut sync = ChannelSynchronizer::new();
        for ch in &channels {
            sync.register_channel(Arc::clone(ch) as Arc<dyn ChannelEvents>);
        }

        sync.on_session().await.unwrap();

        for ch in &channels {
            assert_eq!(ch.calls(), vec!["session".to_string()]);
        }
    }

    #[tokio::test]
    async fn test_channels_start_before_any_finishes() {
        // Each channel blocks on a barrier sized to the channel count, so the
        // broadcast only completes if every call is in flight at once.
        let barrier = Arc::new(Barrier::new(3));
        let started = Arc::new(AtomicUsize::new(0));
        let mut sync = ChannelSynchronizer::new();
        for i in 0..3 {
            let mut ch = RecordingChannel::new(&format!("ch{i}"));
            ch.barrier = Some(Arc::clone(&barrier));
            ch.started = Arc::clone(&started);
            sync.register_channel(Arc::new(ch));
        }

        tokio::time::timeout(Duration::from_secs(2), sync.on_focus(30))
            .await
            .expect("broadcast ran sequentially")
            .unwrap();
        assert_eq!(started.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_siblings() {
        let mut failing = RecordingChannel::new("bad");
        failing.fail = true;
        let failing = Arc::new(failing);
        let healthy = Arc::new(RecordingChannel::new("good"));

        let mut sync = ChannelSynchronizer::new();
        sync.register_channel(Arc::clone(&failing) as Arc<dyn ChannelEvents>);
        sync.register_channel(Arc::clone(&healthy) as Arc<dyn ChannelEvents>);

        let mut tags = Tags::new();
        tags.insert("plan".to_string(), "pro".to_string());
        let err = sync.set_tags(&tags).await.unwrap_err();

        assert!(err.to_string().contains("bad exploded"));
        assert_eq!(healthy.calls(), vec!["tags:1".to_string()]);
        assert_eq!(failing.calls(), vec!["tags:1".to_string()]);
    }

    #[tokio::test]
    async fn test_external_user_id_forwards_auth_hash() {
        let ch = Arc::new(RecordingChannel::new("email"));
        let mut sync = ChannelSynchronizer::new();
        sync.register_channel(Arc::clone(&ch) as Arc<dyn ChannelEvents>);

        sync.set_external_user_id("user-7", Some("hash")).await.unwrap();
        sync.set_external_user_id("user-8", None).await.unwrap();

        assert_eq!(
            ch.calls(),
            vec!["external:user-7:hash".to_string(), "external:user-8:-".to_string()]
        );
    }

    #[tokio::test]
    async fn test_empty_synchronizer_succeeds() {
        let sync = ChannelSynchronizer::new();
        assert_eq!(sync.channel_count(), 0);
        sync.on_session().await.unwrap();
    }
}
