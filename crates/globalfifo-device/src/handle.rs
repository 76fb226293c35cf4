use std::io::{self, SeekFrom};
use std::sync::Arc;

use globalfifo_core::{
    BlockingMode, BoundedBuffer, Cancellation, FifoError, IoContext, PollMask,
};
use tracing::{debug, warn};

use crate::control::ControlCode;

/// 一次 `open` 得到的设备句柄。
///
/// # 教案式注释
///
/// ## 意图 (Why)
/// - 对应宿主的“打开文件”：绑定到共享缓冲，并携带只属于本次打开的状态，
///   即建议性游标与取消令牌。
///
/// ## 逻辑 (How)
/// - 读写、清空与就绪等待都用句柄的取消令牌组装 [`IoContext`]；
/// - 游标由 `&mut self` 独占更新，不需要缓冲锁；只有定位成功时才会改变。
///
/// ## 契约 (What)
/// - `read`/`read_into`/`write`：按 `mode` 挂起或返回 `WouldBlock`；
/// - `seek`：在 `[0, capacity]` 内移动游标，越界或 `SeekFrom::End` 返回 `InvalidArgument`；
/// - `control`：只接受 [`ControlCode::Clear`]；
/// - `poll`：立即返回就绪掩码；`wait_poll`：挂起直到掩码与关注集相交；
/// - `close`：空操作，缓冲保留全部内容。
#[derive(Debug)]
pub struct FifoHandle {
    buffer: Arc<BoundedBuffer>,
    position: u64,
    cancellation: Cancellation,
}

impl FifoHandle {
    pub(crate) fn new(buffer: Arc<BoundedBuffer>, cancellation: Cancellation) -> Self {
        Self {
            buffer,
            position: 0,
            cancellation,
        }
    }

    /// 宿主向本句柄上挂起的调用投递“信号”的令牌。
    ///
    /// 每次投递只打断一次挂起；能够立即完成的调用不会消费它。
    pub fn cancellation(&self) -> &Cancellation {
        &self.cancellation
    }

    /// 当前建议性游标。
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn read(&self, max_len: usize, mode: BlockingMode) -> Result<Vec<u8>, FifoError> {
        self.buffer.read(max_len, &self.context(mode))
    }

    /// 读入调用方提供的切片，最多 `buf.len()` 字节。
    pub fn read_into(&self, buf: &mut [u8], mode: BlockingMode) -> Result<usize, FifoError> {
        let want_len = buf.len();
        let mut sink = buf;
        self.buffer
            .read_into(&mut sink, want_len, &self.context(mode))
    }

    pub fn write(&self, data: &[u8], mode: BlockingMode) -> Result<usize, FifoError> {
        self.buffer.write(data, &self.context(mode))
    }

    pub fn seek(&mut self, target: SeekFrom) -> Result<u64, FifoError> {
        let position = self.buffer.seek(self.position, target)?;
        self.position = position;
        Ok(position)
    }

    /// 执行控制命令，`raw` 为宿主传入的命令号。
    pub fn control(&self, raw: u32) -> Result<(), FifoError> {
        match ControlCode::try_from(raw) {
            Ok(ControlCode::Clear) => self.buffer.clear(&self.cancellation),
            Err(unknown) => {
                warn!(code = raw, "rejecting {unknown}");
                Err(unknown.into())
            }
        }
    }

    pub fn poll(&self) -> PollMask {
        self.buffer.poll_readiness().to_mask()
    }

    pub fn wait_poll(&self, interest: PollMask, mode: BlockingMode) -> Result<PollMask, FifoError> {
        self.buffer.wait_readiness(interest, &self.context(mode))
    }

    pub fn close(self) {
        debug!(position = self.position, "globalfifo closed");
    }

    fn context(&self, mode: BlockingMode) -> IoContext {
        IoContext::new(mode).with_cancellation(self.cancellation.child())
    }
}

// 标准库适配器均为阻塞模式；空切片按 `std::io` 约定立即返回 0，而不是等待缓冲状态。
impl io::Read for FifoHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        Ok(self.read_into(buf, BlockingMode::Blocking)?)
    }
}

impl io::Write for FifoHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        Ok(FifoHandle::write(self, buf, BlockingMode::Blocking)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Seek for FifoHandle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Ok(FifoHandle::seek(self, pos)?)
    }
}

/// 把调用结果折叠为系统调用返回值：成功为非负计数，失败为负 errno。
pub fn syscall_return(result: Result<usize, FifoError>) -> isize {
    match result {
        Ok(count) => isize::try_from(count).unwrap_or(isize::MAX),
        Err(err) => -(err.errno() as isize),
    }
}
