use chrono::{DateTime, Utc};
use search_gateway::retry::RetryPolicy;
use search_gateway::search::Gateway;

/// Shared server state / 服务共享状态
///
/// Immutable after startup; every request works on its own values.
pub struct AppState {
    pub gateway: Gateway,
    /// Retry policy applied around gateway calls / 网关调用的重试策略
    pub retry: RetryPolicy,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(gateway: Gateway, retry: RetryPolicy) -> Self {
        Self {
            gateway,
            retry,
            started_at: Utc::now(),
        }
    }
}
