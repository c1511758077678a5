use crate::alerts::ReconnectPolicy;
use async_trait::async_trait;
use std::time::Duration;

/// 固定间隔重连
///
/// 每次断开后等待 `delay`，最多重试 `max_attempts` 次（连接成功后计数清零）。
#[derive(Debug, Clone, Copy)]
pub struct FixedBackoff {
    pub delay: Duration,
    pub max_attempts: u32,
}

impl FixedBackoff {
    pub fn new(delay: Duration, max_attempts: u32) -> Self {
        Self {
            delay,
            max_attempts,
        }
    }
}

#[async_trait(?Send)]
impl ReconnectPolicy for FixedBackoff {
    async fn should_retry(&self, attempt: u32) -> bool {
        if attempt > self.max_attempts {
            tracing::warn!(
                attempt,
                "alert channel giving up after {} retries",
                self.max_attempts
            );
            return false;
        }
        tokio::time::sleep(self.delay).await;
        true
    }
}
