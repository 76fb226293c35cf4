use crate::cancellation::Cancellation;

/// 单次调用的阻塞语义，对应宿主文件描述符上的 `O_NONBLOCK` 标志。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlockingMode {
    /// 条件不满足时挂起，直到被唤醒或被取消。
    #[default]
    Blocking,
    /// 条件不满足时立即返回 [`FifoError::WouldBlock`](crate::FifoError::WouldBlock)。
    NonBlocking,
}

impl BlockingMode {
    /// 由宿主的非阻塞标志位映射阻塞语义。
    pub fn from_nonblock_flag(non_blocking: bool) -> Self {
        if non_blocking {
            Self::NonBlocking
        } else {
            Self::Blocking
        }
    }

    pub fn is_non_blocking(self) -> bool {
        matches!(self, Self::NonBlocking)
    }
}

/// 读写调用的上下文：阻塞语义 + 取消令牌。
///
/// # 教案式说明
/// - **意图 (Why)**：把“是否允许挂起”和“谁能打断挂起”两件事绑定在一次调用上，
///   避免缓冲内部持有任何调用方相关的状态。
/// - **契约 (What)**：`NonBlocking` 模式下取消令牌不会被查询，因为调用从不挂起；
///   `Blocking` 模式下令牌在挂起前后都会被检查。
/// - **执行 (How)**：以 Builder 风格组合，默认值为阻塞 + 新建令牌。
#[derive(Clone, Debug, Default)]
pub struct IoContext {
    mode: BlockingMode,
    cancellation: Cancellation,
}

impl IoContext {
    pub fn new(mode: BlockingMode) -> Self {
        Self {
            mode,
            cancellation: Cancellation::new(),
        }
    }

    /// 阻塞调用上下文。
    pub fn blocking() -> Self {
        Self::new(BlockingMode::Blocking)
    }

    /// 非阻塞调用上下文。
    pub fn non_blocking() -> Self {
        Self::new(BlockingMode::NonBlocking)
    }

    /// 替换取消令牌，通常传入宿主持有的某个令牌的 `child()`。
    pub fn with_cancellation(mut self, cancellation: Cancellation) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn mode(&self) -> BlockingMode {
        self.mode
    }

    pub fn cancellation(&self) -> &Cancellation {
        &self.cancellation
    }
}
