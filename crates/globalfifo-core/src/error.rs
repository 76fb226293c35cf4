//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 为缓冲的四类失败提供集中定义：调用方需要区分“暂时没有数据/空间”（`WouldBlock`）、
//!   “等待被打断”（`Interrupted`）、“跨边界拷贝失败”（`Fault`）与“参数非法”（`InvalidArgument`）。
//! - 宿主层沿用字符设备的 errno 约定，因此每个变体都能映射为稳定的 errno 与错误码。
//!
//! ## 设计要求（What）
//! - 所有错误均为同步返回，缓冲内部从不重试；
//! - 任何错误路径都不会留下“已持锁”或“长度与内容不一致”的缓冲。

use std::io;

use thiserror::Error;

use crate::transfer::TransferFault;

/// 宿主层使用的 errno 数值（Linux 约定，原驱动返回其相反数）。
pub mod errno {
    pub const EINTR: i32 = 4;
    pub const EAGAIN: i32 = 11;
    pub const EFAULT: i32 = 14;
    pub const EINVAL: i32 = 22;
    /// 内核内部的“可重启系统调用”码；被信号打断的等待以此上报。
    pub const ERESTARTSYS: i32 = 512;
}

/// 稳定错误码，供日志与告警按 `<域>.<语义>` 聚合。
pub mod codes {
    pub const WOULD_BLOCK: &str = "fifo.would_block";
    pub const INTERRUPTED: &str = "fifo.interrupted";
    pub const FAULT: &str = "fifo.fault";
    pub const INVALID_ARGUMENT: &str = "fifo.invalid_argument";
}

/// 缓冲操作的错误域。
///
/// # 教案式说明
/// - **契约 (What)**：
///   - `WouldBlock`：非阻塞调用无法立即完成，缓冲未被修改；
///   - `Interrupted`：阻塞等待被取消令牌打断，缓冲未被修改；
///   - `Fault`：调用方缓冲无法提供/容纳请求的字节数，缓冲长度保持不变；
///   - `InvalidArgument`：游标越界、定位方式或控制码不受支持。
/// - **执行 (How)**：通过 [`FifoError::errno`] 与 [`FifoError::code`] 对齐宿主约定，
///   并实现 `From<FifoError> for io::Error` 以便 `std::io` 适配器直接 `?` 传播。
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FifoError {
    #[error("operation would block")]
    WouldBlock,

    #[error("blocking wait interrupted by cancellation")]
    Interrupted,

    #[error("caller buffer fault: requested {requested} byte(s), {available} available")]
    Fault { requested: usize, available: usize },

    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: &'static str },
}

impl FifoError {
    pub(crate) fn invalid(reason: &'static str) -> Self {
        FifoError::InvalidArgument { reason }
    }

    /// 稳定错误码。
    pub fn code(&self) -> &'static str {
        match self {
            FifoError::WouldBlock => codes::WOULD_BLOCK,
            FifoError::Interrupted => codes::INTERRUPTED,
            FifoError::Fault { .. } => codes::FAULT,
            FifoError::InvalidArgument { .. } => codes::INVALID_ARGUMENT,
        }
    }

    /// 宿主 errno（正值）。
    pub fn errno(&self) -> i32 {
        match self {
            FifoError::WouldBlock => errno::EAGAIN,
            FifoError::Interrupted => errno::ERESTARTSYS,
            FifoError::Fault { .. } => errno::EFAULT,
            FifoError::InvalidArgument { .. } => errno::EINVAL,
        }
    }

    /// 调用方可以原样重发同一请求的错误。
    pub fn is_retryable(&self) -> bool {
        matches!(self, FifoError::WouldBlock | FifoError::Interrupted)
    }
}

impl From<TransferFault> for FifoError {
    fn from(fault: TransferFault) -> Self {
        FifoError::Fault {
            requested: fault.requested,
            available: fault.available,
        }
    }
}

impl From<FifoError> for io::Error {
    fn from(err: FifoError) -> Self {
        let kind = match err {
            FifoError::WouldBlock => io::ErrorKind::WouldBlock,
            FifoError::Interrupted => io::ErrorKind::Interrupted,
            FifoError::InvalidArgument { .. } => io::ErrorKind::InvalidInput,
            FifoError::Fault { .. } => io::ErrorKind::Other,
        };
        io::Error::new(kind, err)
    }
}

/// 配置加载与校验失败。
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("fifo capacity must be greater than zero")]
    ZeroCapacity,

    #[error("interrupt poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("malformed fifo configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
