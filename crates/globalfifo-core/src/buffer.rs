use core::fmt;
use core::time::Duration;
use std::io::SeekFrom;

use tracing::{debug, info, warn};

use crate::cancellation::Cancellation;
use crate::config::FifoConfig;
use crate::context::IoContext;
use crate::error::{ConfigError, FifoError};
use crate::readiness::{PollMask, Readiness};
use crate::stats::{BufferStats, StatsRecorder};
use crate::sync::{self, Condvar, Mutex, MutexGuard};
use crate::transfer::{ByteSink, ByteSource};

/// 占用状态机：`Empty -> Partial/Full` 由写驱动，`Partial/Full -> Empty/Partial` 由读驱动，
/// `clear` 可从任意状态回到 `Empty`。没有终止状态。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Occupancy {
    Empty,
    Partial,
    Full,
}

/// 持锁采样得到的一致视图。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferSnapshot {
    pub capacity: usize,
    pub length: usize,
}

impl BufferSnapshot {
    pub fn occupancy(&self) -> Occupancy {
        if self.length == 0 {
            Occupancy::Empty
        } else if self.length == self.capacity {
            Occupancy::Full
        } else {
            Occupancy::Partial
        }
    }

    pub fn readiness(&self) -> Readiness {
        Readiness::from_occupancy(self.length, self.capacity)
    }
}

/// 互斥锁保护的全部可变状态。`storage.len()` 即容量。
struct BufferState {
    storage: Box<[u8]>,
    length: usize,
}

impl BufferState {
    fn is_empty(&self) -> bool {
        self.length == 0
    }

    fn is_full(&self) -> bool {
        self.length == self.storage.len()
    }

    fn readiness(&self) -> Readiness {
        Readiness::from_occupancy(self.length, self.storage.len())
    }

    /// 出队前 `count` 字节并把剩余数据整体前移到偏移 0。
    fn consume_front(&mut self, count: usize) {
        self.storage.copy_within(count..self.length, 0);
        self.length -= count;
    }
}

/// 等待的目标条件。
#[derive(Clone, Copy, Debug)]
enum Await {
    Data,
    Space,
}

impl Await {
    fn blocked(self, state: &BufferState) -> bool {
        match self {
            Await::Data => state.is_empty(),
            Await::Space => state.is_full(),
        }
    }

    fn op(self) -> &'static str {
        match self {
            Await::Data => "read",
            Await::Space => "write",
        }
    }
}

/// 固定容量的共享字节缓冲。
///
/// # 教案式注释
///
/// ## 意图 (Why)
/// - 在多个读者与写者之间提供一条最小的生产者/消费者通道：数据是无结构的字节区，
///   “满”与“空”只由长度计数相对固定容量来判定；
/// - 整个进程只有一个实例，由宿主层构造后通过句柄注入每个调用方，而不是作为全局可变状态存在。
///
/// ## 逻辑 (How)
/// - 唯一一把互斥锁保护 `storage` 与 `length`，任何读取长度或修改内容的动作都在锁内完成；
/// - 两个条件变量 `not_empty`/`not_full` 分别服务读者与写者；等待通过
///   “原子释放锁并挂起，醒来后重新持锁”的条件变量语义完成，并在循环中重新检查谓词；
/// - 每次读取后把剩余字节前移到偏移 0（前移压缩），因此没有独立的读游标；
/// - 第三个条件变量 `readiness` 在每次提交读写后通知，供 [`wait_readiness`](Self::wait_readiness)
///   这类就绪等待方使用。
///
/// ## 契约 (What)
/// - 任意时刻 `0 <= length <= capacity`；
/// - 写入提交后通知 `not_empty`，读取提交后通知 `not_full`，通知均在释放锁之后发出；
/// - `clear` 不通知任何等待方；
/// - 所有错误路径都已释放锁且不修改长度。
///
/// ## 注意事项 (Trade-offs)
/// - 前移压缩使每次读取的代价与剩余长度成正比；
/// - 同一条件上的多个等待方之间没有公平性保证，允许饥饿；
/// - 取消令牌由挂起方按轮询间隔检查，取消的感知延迟上限即该间隔；
///   一次投递只打断一次等待，被打断的调用重发后会正常挂起。
pub struct BoundedBuffer {
    capacity: usize,
    state: Mutex<BufferState>,
    not_empty: Condvar,
    not_full: Condvar,
    readiness: Condvar,
    poll_interval: Duration,
    stats: StatsRecorder,
}

impl BoundedBuffer {
    /// 以默认轮询间隔构造空缓冲。
    ///
    /// # Panics
    /// `capacity` 为 0 时 panic；需要可恢复的校验请使用 [`with_config`](Self::with_config)。
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "fifo capacity must be greater than zero");
        Self::build(capacity, FifoConfig::default().interrupt_poll_interval())
    }

    pub fn with_config(config: &FifoConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config.capacity, config.interrupt_poll_interval()))
    }

    fn build(capacity: usize, poll_interval: Duration) -> Self {
        Self {
            capacity,
            state: Mutex::new(BufferState {
                storage: vec![0u8; capacity].into_boxed_slice(),
                length: 0,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            readiness: Condvar::new(),
            poll_interval,
            stats: StatsRecorder::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 当前占用长度。返回后即可能过期，仅供观测。
    pub fn len(&self) -> usize {
        sync::lock(&self.state).length
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == self.capacity
    }

    pub fn snapshot(&self) -> BufferSnapshot {
        let state = sync::lock(&self.state);
        BufferSnapshot {
            capacity: self.capacity,
            length: state.length,
        }
    }

    pub fn stats(&self) -> BufferStats {
        self.stats.snapshot()
    }

    /// 把最多 `want_len` 字节写入缓冲尾部，返回实际写入的字节数。
    ///
    /// # 执行步骤（How）
    /// 1. 持锁；缓冲已满时，非阻塞调用立即返回 `WouldBlock`，阻塞调用挂起在 `not_full` 上；
    /// 2. 实际写入量为 `min(want_len, capacity - length)`，数据从 `source` 拷贝到偏移 `length` 处；
    /// 3. 拷贝失败返回 `Fault`，长度不变；
    /// 4. 提交长度、释放锁，再通知 `not_empty`。
    pub fn write_from<S>(
        &self,
        source: &mut S,
        want_len: usize,
        ctx: &IoContext,
    ) -> Result<usize, FifoError>
    where
        S: ByteSource + ?Sized,
    {
        let guard = sync::lock(&self.state);
        let mut guard = self.wait_until_ready(guard, Await::Space, ctx)?;

        let start = guard.length;
        let count = want_len.min(self.capacity - start);
        if let Err(fault) = source.copy_to(&mut guard.storage[start..start + count]) {
            drop(guard);
            self.stats.record_fault();
            warn!(
                requested = fault.requested,
                available = fault.available,
                "write fault while copying from caller"
            );
            return Err(fault.into());
        }
        guard.length += count;
        let length = guard.length;
        drop(guard);

        self.not_empty.notify_all();
        self.readiness.notify_all();
        self.stats.record_write(count);
        debug!(count, len = length, "written {count} byte(s)");
        Ok(count)
    }

    /// 写入整个切片（受剩余空间截断）。
    pub fn write(&self, data: &[u8], ctx: &IoContext) -> Result<usize, FifoError> {
        let mut source = data;
        self.write_from(&mut source, data.len(), ctx)
    }

    /// 从缓冲头部读出最多 `want_len` 字节交给 `sink`，返回实际读出的字节数。
    ///
    /// # 执行步骤（How）
    /// 1. 持锁；缓冲为空时，非阻塞调用立即返回 `WouldBlock`，阻塞调用挂起在 `not_empty` 上；
    /// 2. 实际读取量为 `min(want_len, length)`，先把前 `n` 字节交给 `sink`；
    /// 3. 交付失败返回 `Fault`，缓冲内容与长度均不变；
    /// 4. 剩余字节前移到偏移 0，长度减 `n`，释放锁后通知 `not_full`。
    pub fn read_into<S>(
        &self,
        sink: &mut S,
        want_len: usize,
        ctx: &IoContext,
    ) -> Result<usize, FifoError>
    where
        S: ByteSink + ?Sized,
    {
        let guard = sync::lock(&self.state);
        let mut guard = self.wait_until_ready(guard, Await::Data, ctx)?;

        let count = want_len.min(guard.length);
        if let Err(fault) = sink.copy_from(&guard.storage[..count]) {
            drop(guard);
            self.stats.record_fault();
            warn!(
                requested = fault.requested,
                available = fault.available,
                "read fault while copying to caller"
            );
            return Err(fault.into());
        }
        guard.consume_front(count);
        let length = guard.length;
        drop(guard);

        self.not_full.notify_all();
        self.readiness.notify_all();
        self.stats.record_read(count);
        debug!(count, len = length, "read {count} byte(s)");
        Ok(count)
    }

    /// 读出最多 `want_len` 字节并以新分配的向量返回。
    pub fn read(&self, want_len: usize, ctx: &IoContext) -> Result<Vec<u8>, FifoError> {
        let mut out = Vec::with_capacity(want_len.min(self.capacity));
        self.read_into(&mut out, want_len, ctx)?;
        Ok(out)
    }

    /// 清零存储并把长度置 0。
    ///
    /// 只支持阻塞式取锁；锁空闲时立即成功，锁被占用期间才会被 `cancellation` 打断（并消费该信号）。
    /// 不通知 `not_empty`/`not_full`：已挂起的写者要靠下一次读取或自身的轮询醒来。
    pub fn clear(&self, cancellation: &Cancellation) -> Result<(), FifoError> {
        let mut guard = self.lock_interruptible(cancellation)?;
        guard.storage.fill(0);
        guard.length = 0;
        drop(guard);

        self.stats.record_clear();
        info!(capacity = self.capacity, "fifo is set to zero");
        Ok(())
    }

    /// 在 `[0, capacity]` 内解析调用方游标。
    ///
    /// - `SeekFrom::Start(offset)`：新位置为 `offset`；
    /// - `SeekFrom::Current(delta)`：新位置为 `current + delta`；
    /// - `SeekFrom::End(_)`：不支持，返回 `InvalidArgument`。
    ///
    /// 游标只是建议性的，读写总是作用于占用区的头部；越界时游标保持不变由调用方负责。
    pub fn seek(&self, current: u64, target: SeekFrom) -> Result<u64, FifoError> {
        let next = match target {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::Current(delta) => current.checked_add_signed(delta),
            SeekFrom::End(_) => return Err(FifoError::invalid("unsupported seek origin")),
        };
        match next {
            Some(position) if position <= self.capacity as u64 => Ok(position),
            _ => Err(FifoError::invalid("seek target outside buffer bounds")),
        }
    }

    /// 持锁采样就绪状态；从不等待数据。
    pub fn poll_readiness(&self) -> Readiness {
        sync::lock(&self.state).readiness()
    }

    /// 挂起直到就绪掩码与 `interest` 相交，返回当时的完整掩码。
    ///
    /// - 非阻塞上下文直接返回当前掩码（可能与 `interest` 不相交）；
    /// - 每次读写提交都会唤醒本等待，`clear` 不会；
    /// - `interest` 为空时返回 `InvalidArgument`，否则将永远无法满足。
    pub fn wait_readiness(
        &self,
        interest: PollMask,
        ctx: &IoContext,
    ) -> Result<PollMask, FifoError> {
        if interest.is_empty() {
            return Err(FifoError::invalid("empty poll interest"));
        }
        let mut guard = sync::lock(&self.state);
        loop {
            let mask = guard.readiness().to_mask();
            if mask.intersects(interest) || ctx.mode().is_non_blocking() {
                return Ok(mask);
            }
            if ctx.cancellation().take() {
                drop(guard);
                return Err(self.interrupted("poll"));
            }
            guard = sync::wait_for(&self.readiness, guard, self.poll_interval);
        }
    }

    /// 条件等待循环：谓词不满足时挂起，醒来后重新检查。
    ///
    /// 返回的 guard 保证谓词成立；错误返回时锁已释放且状态未被修改。
    /// 只有谓词不成立时才消费待处理信号，醒来后先看谓词再看信号。
    fn wait_until_ready<'a>(
        &'a self,
        mut guard: MutexGuard<'a, BufferState>,
        target: Await,
        ctx: &IoContext,
    ) -> Result<MutexGuard<'a, BufferState>, FifoError> {
        let condvar = match target {
            Await::Data => &self.not_empty,
            Await::Space => &self.not_full,
        };
        while target.blocked(&guard) {
            if ctx.mode().is_non_blocking() {
                drop(guard);
                self.stats.record_would_block();
                debug!(op = target.op(), "fifo not ready, would block");
                return Err(FifoError::WouldBlock);
            }
            if ctx.cancellation().take() {
                drop(guard);
                return Err(self.interrupted(target.op()));
            }
            guard = sync::wait_for(condvar, guard, self.poll_interval);
        }
        Ok(guard)
    }

    fn lock_interruptible(
        &self,
        cancellation: &Cancellation,
    ) -> Result<MutexGuard<'_, BufferState>, FifoError> {
        loop {
            if let Some(guard) = sync::try_lock_for(&self.state, self.poll_interval) {
                return Ok(guard);
            }
            if cancellation.take() {
                return Err(self.interrupted("clear"));
            }
        }
    }

    fn interrupted(&self, op: &'static str) -> FifoError {
        self.stats.record_interrupted();
        debug!(op, "fifo wait interrupted");
        FifoError::Interrupted
    }
}

impl fmt::Debug for BoundedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedBuffer")
            .field("capacity", &self.capacity)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}
