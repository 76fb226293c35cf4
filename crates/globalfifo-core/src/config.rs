use core::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// 默认容量（字节），即 `0x1000`。
pub const DEFAULT_CAPACITY: usize = 0x1000;

/// 默认取消轮询间隔（毫秒）。
pub const DEFAULT_INTERRUPT_POLL_INTERVAL_MS: u64 = 10;

/// 缓冲配置。
///
/// ### 设计目标（Why）
/// - 容量在实例生命周期内固定，只能在构造时经由配置给定；
/// - 条件变量不感知取消令牌，挂起方需要周期性醒来检查，间隔同样由配置决定。
///
/// ### 契约说明（What）
/// - 两个字段都必须大于 0，[`FifoConfig::validate`] 负责拒绝非法值；
/// - TOML 中缺省的字段取默认值，未知字段视为错误，防止拼写错误被静默忽略。
///
/// ```
/// use globalfifo_core::FifoConfig;
///
/// let config = FifoConfig::from_toml_str("capacity = 64").unwrap();
/// assert_eq!(config.capacity, 64);
/// assert_eq!(config.interrupt_poll_interval_ms, 10);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FifoConfig {
    pub capacity: usize,
    pub interrupt_poll_interval_ms: u64,
}

impl Default for FifoConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            interrupt_poll_interval_ms: DEFAULT_INTERRUPT_POLL_INTERVAL_MS,
        }
    }
}

impl FifoConfig {
    /// 解析并校验 TOML 文本。
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_interrupt_poll_interval(mut self, interval: Duration) -> Self {
        self.interrupt_poll_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.interrupt_poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(())
    }

    pub fn interrupt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.interrupt_poll_interval_ms)
    }
}
