use std::sync::Arc;

use globalfifo_core::{BoundedBuffer, Cancellation, ConfigError, FifoConfig};
use tracing::{debug, info};

use crate::handle::FifoHandle;

/// 持有唯一共享缓冲的设备对象。
///
/// # 教案式注释
///
/// ## 意图 (Why)
/// - 原始设备在模块加载时分配一块全局缓冲；这里把“全局”收敛为一个显式构造的值，
///   由宿主决定其生命周期，测试也可以各自构造互不干扰的实例。
///
/// ## 逻辑 (How)
/// - 构造时校验 [`FifoConfig`]，随后以 `Arc` 持有 [`BoundedBuffer`]；
/// - 设备本身可廉价克隆，所有克隆与所有句柄共享同一缓冲。
///
/// ## 契约 (What)
/// - `new`：配置非法时返回 [`ConfigError`]；
/// - `open`：永不失败，返回绑定到共享缓冲的新句柄；
/// - `buffer`：暴露共享缓冲，供宿主采样统计或直接驱动。
#[derive(Clone, Debug)]
pub struct FifoDevice {
    buffer: Arc<BoundedBuffer>,
}

impl FifoDevice {
    pub fn new(config: FifoConfig) -> Result<Self, ConfigError> {
        let buffer = BoundedBuffer::with_config(&config)?;
        info!(
            capacity = config.capacity,
            poll_interval_ms = config.interrupt_poll_interval_ms,
            "globalfifo device initialised"
        );
        Ok(Self {
            buffer: Arc::new(buffer),
        })
    }

    pub fn buffer(&self) -> &Arc<BoundedBuffer> {
        &self.buffer
    }

    /// 打开设备。
    pub fn open(&self) -> FifoHandle {
        debug!("globalfifo opened");
        FifoHandle::new(Arc::clone(&self.buffer), Cancellation::new())
    }
}

impl Default for FifoDevice {
    fn default() -> Self {
        Self {
            buffer: Arc::new(BoundedBuffer::new(globalfifo_core::DEFAULT_CAPACITY)),
        }
    }
}

#[cfg(all(test, not(any(loom, fifo_loom))))]
mod tests {
    use super::*;
    use globalfifo_core::IoContext;

    #[test]
    fn handles_share_the_device_buffer() {
        let device = FifoDevice::new(FifoConfig::default().with_capacity(8)).unwrap();
        let writer = device.open();
        let reader = device.clone().open();

        assert_eq!(writer.write(b"abc", Default::default()), Ok(3));
        assert_eq!(device.buffer().len(), 3);
        assert_eq!(
            device.buffer().read(3, &IoContext::non_blocking()),
            Ok(b"abc".to_vec())
        );
        assert!(reader.poll().is_writable());
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(matches!(
            FifoDevice::new(FifoConfig::default().with_capacity(0)),
            Err(ConfigError::ZeroCapacity)
        ));
    }

    #[test]
    fn default_device_uses_default_capacity() {
        assert_eq!(
            FifoDevice::default().buffer().capacity(),
            globalfifo_core::DEFAULT_CAPACITY
        );
    }
}
