use crate::sync::{AtomicU64, Ordering};

/// 缓冲运行统计快照。
///
/// # 契约说明（What）
/// - 计数器单调递增，只用于观测，从不参与读写判定；
/// - 各字段独立采样，快照不保证跨字段的原子一致性。
///   需要“长度 = 写入 - 读取”这类精确关系时，请在无并发写读的时刻采样。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BufferStats {
    pub bytes_written: u64,
    pub bytes_read: u64,
    pub writes: u64,
    pub reads: u64,
    pub would_block: u64,
    pub interrupted: u64,
    pub faults: u64,
    pub clears: u64,
}

pub(crate) struct StatsRecorder {
    bytes_written: AtomicU64,
    bytes_read: AtomicU64,
    writes: AtomicU64,
    reads: AtomicU64,
    would_block: AtomicU64,
    interrupted: AtomicU64,
    faults: AtomicU64,
    clears: AtomicU64,
}

impl StatsRecorder {
    pub(crate) fn new() -> Self {
        Self {
            bytes_written: AtomicU64::new(0),
            bytes_read: AtomicU64::new(0),
            writes: AtomicU64::new(0),
            reads: AtomicU64::new(0),
            would_block: AtomicU64::new(0),
            interrupted: AtomicU64::new(0),
            faults: AtomicU64::new(0),
            clears: AtomicU64::new(0),
        }
    }

    pub(crate) fn record_write(&self, count: usize) {
        self.bytes_written.fetch_add(count as u64, Ordering::Relaxed);
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_read(&self, count: usize) {
        self.bytes_read.fetch_add(count as u64, Ordering::Relaxed);
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_would_block(&self) {
        self.would_block.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_interrupted(&self) {
        self.interrupted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_fault(&self) {
        self.faults.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_clear(&self) {
        self.clears.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> BufferStats {
        BufferStats {
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            reads: self.reads.load(Ordering::Relaxed),
            would_block: self.would_block.load(Ordering::Relaxed),
            interrupted: self.interrupted.load(Ordering::Relaxed),
            faults: self.faults.load(Ordering::Relaxed),
            clears: self.clears.load(Ordering::Relaxed),
        }
    }
}
