use globalfifo_core::FifoError;
use thiserror::Error;

/// 清空缓冲的控制命令号。
pub const FIFO_CLEAR: u32 = 0x1;

/// 设备支持的控制命令。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ControlCode {
    /// 清零存储并把长度置 0。
    Clear = FIFO_CLEAR,
}

impl ControlCode {
    pub fn raw(self) -> u32 {
        self as u32
    }
}

/// 未知控制命令。
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("unsupported control code {0:#x}")]
pub struct UnknownControlCode(pub u32);

impl TryFrom<u32> for ControlCode {
    type Error = UnknownControlCode;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        match raw {
            FIFO_CLEAR => Ok(ControlCode::Clear),
            other => Err(UnknownControlCode(other)),
        }
    }
}

impl From<UnknownControlCode> for FifoError {
    fn from(_: UnknownControlCode) -> Self {
        FifoError::InvalidArgument {
            reason: "unsupported control code",
        }
    }
}
