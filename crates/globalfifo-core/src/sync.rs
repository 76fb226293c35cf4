//! 同步原语垫片。
//!
//! 生产构建使用 `parking_lot` 的 `Mutex`/`Condvar`；当启用 `--cfg loom` 或 `--cfg fifo_loom`
//! 时切换到 Loom 提供的同名类型，使模型检查能够穷举锁与条件变量的所有调度交错。
//! 两套实现的 API 形态不同（`parking_lot` 以 `&mut guard` 等待，Loom 以值传递 guard），
//! 因此统一收敛为按值传递 guard 的自由函数，调用方无需感知差异。

#[cfg(not(any(loom, fifo_loom)))]
mod imp {
    use core::time::Duration;

    pub(crate) use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    pub(crate) use parking_lot::{Condvar, Mutex, MutexGuard};

    pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock()
    }

    pub(crate) fn try_lock_for<T>(mutex: &Mutex<T>, timeout: Duration) -> Option<MutexGuard<'_, T>> {
        mutex.try_lock_for(timeout)
    }

    /// 原子地释放锁并挂起，被唤醒或超时后重新持锁返回。
    ///
    /// 超时与虚假唤醒不做区分：调用方必须在循环中重新检查谓词。
    pub(crate) fn wait_for<'a, T>(
        condvar: &Condvar,
        mut guard: MutexGuard<'a, T>,
        timeout: Duration,
    ) -> MutexGuard<'a, T> {
        let _ = condvar.wait_for(&mut guard, timeout);
        guard
    }
}

#[cfg(any(loom, fifo_loom))]
mod imp {
    use core::time::Duration;
    use std::sync::PoisonError;

    pub(crate) use loom::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    pub(crate) use loom::sync::{Condvar, Mutex, MutexGuard};

    pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn try_lock_for<T>(mutex: &Mutex<T>, _timeout: Duration) -> Option<MutexGuard<'_, T>> {
        match mutex.try_lock() {
            Ok(guard) => Some(guard),
            Err(_) => {
                loom::thread::yield_now();
                None
            }
        }
    }

    // Loom 不建模墙钟超时，退化为无限等待；模型中的唤醒全部来自显式通知。
    pub(crate) fn wait_for<'a, T>(
        condvar: &Condvar,
        guard: MutexGuard<'a, T>,
        _timeout: Duration,
    ) -> MutexGuard<'a, T> {
        condvar.wait(guard).unwrap_or_else(PoisonError::into_inner)
    }
}

pub(crate) use imp::*;
