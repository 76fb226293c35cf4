use crate::sync::{AtomicBool, Ordering};
use std::sync::Arc;

/// 投递给挂起调用的“待处理信号”。
///
/// # 设计背景（Why）
/// - 宿主需要把阻塞在“非空”/“非满”条件上的读写从外部拉回来，
///   调用方随后得到 [`FifoError::Interrupted`](crate::FifoError::Interrupted) 并可以重发请求；
/// - 信号与字符设备的语义一致：投递后处于待处理状态，被某一次等待消费后即清除，
///   因此重发的调用会重新正常挂起，而不是反复被同一个信号打断。
///
/// # 逻辑解析（How）
/// - 一个共享的原子位表示“有信号待处理”，所有克隆（含 [`child`](Self::child)）看到同一位；
/// - [`raise`](Self::raise) 置位，[`take`](Self::take) 以 `true -> false` 的 CAS 清位，
///   CAS 保证同一次投递只会让一个等待方返回 `Interrupted`；
/// - 等待方只在“条件不满足、即将或已经挂起”时调用 `take`，能立即完成的调用不会消费信号。
///
/// # 契约说明（What）
/// - `raise`/`cancel` 返回 `true` 表示本次从“无信号”变为“有信号”；信号未被消费前重复投递返回 `false`；
/// - `take` 返回 `true` 表示本次消费了信号；
/// - `is_cancelled` 只观测，不消费。
#[derive(Clone, Debug)]
pub struct Cancellation {
    pending: Arc<AtomicBool>,
}

impl Cancellation {
    pub fn new() -> Self {
        Self {
            pending: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 投递一次信号。
    pub fn raise(&self) -> bool {
        self.pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// [`raise`](Self::raise) 的别名，供习惯“取消”说法的宿主使用。
    pub fn cancel(&self) -> bool {
        self.raise()
    }

    /// 消费待处理信号。
    pub fn take(&self) -> bool {
        self.pending
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// 是否有尚未被消费的信号。
    pub fn is_cancelled(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// 共享同一信号位的句柄，通常交给负责投递信号的线程。
    pub fn child(&self) -> Self {
        self.clone()
    }
}

impl Default for Cancellation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(test, not(any(loom, fifo_loom))))]
mod tests {
    use super::*;

    #[test]
    fn raise_is_visible_through_children_until_taken() {
        let root = Cancellation::new();
        let child = root.child();
        assert!(!child.is_cancelled());
        assert!(child.cancel());
        assert!(root.is_cancelled());
        assert!(!root.raise(), "未消费前重复投递不改变状态");

        assert!(root.take());
        assert!(!child.is_cancelled());
        assert!(!child.take(), "同一次投递只能被消费一次");
        assert!(child.raise(), "消费后可以再次投递");
    }
}
