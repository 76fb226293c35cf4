//! 调用方与缓冲之间的拷贝边界。
//!
//! 字符设备在这里使用 `copy_from_user`/`copy_to_user`，失败时返回 `EFAULT`。
//! Rust 侧把这条边界抽象为 [`ByteSource`] 与 [`ByteSink`] 两个 trait：
//! 缓冲只通过它们读写调用方内存，任何一方报告 [`TransferFault`] 时缓冲状态保持不变。

use core::mem;

/// 跨边界拷贝失败：调用方只能提供（或容纳）`available` 字节，却被要求 `requested` 字节。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferFault {
    pub requested: usize,
    pub available: usize,
}

/// 写路径的数据来源。
///
/// # 契约 (What)
/// - `copy_to` 必须恰好填满 `dst`，否则返回 [`TransferFault`]；
/// - 失败时不得部分消费自身，调用方可以修正长度后重试。
pub trait ByteSource {
    fn copy_to(&mut self, dst: &mut [u8]) -> Result<(), TransferFault>;
}

/// 读路径的数据去向。
///
/// # 契约 (What)
/// - `copy_from` 必须完整接收 `src`，否则返回 [`TransferFault`]；
/// - 失败时不得保留部分数据。
pub trait ByteSink {
    fn copy_from(&mut self, src: &[u8]) -> Result<(), TransferFault>;
}

/// 与 `io::Read for &[u8]` 一致：拷贝后切片前移。
impl ByteSource for &[u8] {
    fn copy_to(&mut self, dst: &mut [u8]) -> Result<(), TransferFault> {
        if dst.len() > self.len() {
            return Err(TransferFault {
                requested: dst.len(),
                available: self.len(),
            });
        }
        let (head, tail) = self.split_at(dst.len());
        dst.copy_from_slice(head);
        *self = tail;
        Ok(())
    }
}

impl ByteSink for Vec<u8> {
    fn copy_from(&mut self, src: &[u8]) -> Result<(), TransferFault> {
        self.extend_from_slice(src);
        Ok(())
    }
}

/// 与 `io::Write for &mut [u8]` 一致：写入后切片前移。
impl ByteSink for &mut [u8] {
    fn copy_from(&mut self, src: &[u8]) -> Result<(), TransferFault> {
        if src.len() > self.len() {
            return Err(TransferFault {
                requested: src.len(),
                available: self.len(),
            });
        }
        let (head, tail) = mem::take(self).split_at_mut(src.len());
        head.copy_from_slice(src);
        *self = tail;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_source_advances_and_faults_on_short_input() {
        let mut source: &[u8] = b"abcdef";
        let mut dst = [0u8; 4];
        source.copy_to(&mut dst).unwrap();
        assert_eq!(&dst, b"abcd");
        assert_eq!(source, b"ef");

        let err = source.copy_to(&mut dst).unwrap_err();
        assert_eq!(
            err,
            TransferFault {
                requested: 4,
                available: 2
            }
        );
        assert_eq!(source, b"ef", "失败时不得消费来源");
    }

    #[test]
    fn slice_sink_rejects_overflow_without_partial_write() {
        let mut storage = [0u8; 3];
        let mut sink: &mut [u8] = &mut storage;
        assert!(sink.copy_from(b"wxyz").is_err());
        sink.copy_from(b"xy").unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(&storage, b"xy\0");
    }
}
