#![cfg(not(any(loom, fifo_loom)))]
//! 缓冲记账与顺序性质验证。
//!
//! # 教案级注释概览
//!
//! - **核心目标 (Why)**：前移压缩是本缓冲最容易出错的地方：每次读取都要把剩余字节搬回偏移 0。
//!   这里用影子模型（`VecDeque<u8>`）对照任意“写/读/清空”序列，确认字节顺序与长度记账始终一致。
//! - **设计手法 (How)**：Proptest 生成操作序列，全部以非阻塞模式执行，使 `WouldBlock` 成为可断言的结果，
//!   而不是让测试线程挂起。
//! - **断言 (What)**：
//!   1. 每次读取返回的字节与影子模型出队的字节完全相同（FIFO）；
//!   2. 每次调用后 `0 <= length <= capacity`；
//!   3. 自上次清空以来，`length == 已提交写入 - 已提交读取`；
//!   4. 空读、满写必然返回 `WouldBlock`，且不修改状态。

use std::collections::VecDeque;

use globalfifo_core::{BoundedBuffer, Cancellation, FifoError, IoContext, Readiness};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Write(Vec<u8>),
    Read(usize),
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => prop::collection::vec(any::<u8>(), 0..48).prop_map(Op::Write),
        4 => (0usize..48).prop_map(Op::Read),
        1 => Just(Op::Clear),
    ]
}

proptest! {
    #[test]
    fn prop_shadow_model_matches_buffer(
        capacity in 1usize..64,
        ops in prop::collection::vec(op(), 1..80),
    ) {
        let buffer = BoundedBuffer::new(capacity);
        let ctx = IoContext::non_blocking();
        let token = Cancellation::new();
        let mut shadow: VecDeque<u8> = VecDeque::new();
        let mut committed_in = 0usize;
        let mut committed_out = 0usize;

        for op in ops {
            match op {
                Op::Write(data) => {
                    let result = buffer.write(&data, &ctx);
                    if shadow.len() == capacity {
                        prop_assert_eq!(result, Err(FifoError::WouldBlock));
                    } else {
                        let expected = data.len().min(capacity - shadow.len());
                        prop_assert_eq!(result, Ok(expected));
                        shadow.extend(&data[..expected]);
                        committed_in += expected;
                    }
                }
                Op::Read(want) => {
                    let result = buffer.read(want, &ctx);
                    if shadow.is_empty() {
                        prop_assert_eq!(result, Err(FifoError::WouldBlock));
                    } else {
                        let count = want.min(shadow.len());
                        let expected: Vec<u8> = shadow.drain(..count).collect();
                        prop_assert_eq!(result, Ok(expected));
                        committed_out += count;
                    }
                }
                Op::Clear => {
                    buffer.clear(&token).unwrap();
                    shadow.clear();
                    committed_in = 0;
                    committed_out = 0;
                    prop_assert_eq!(
                        buffer.poll_readiness(),
                        Readiness { readable: false, writable: true }
                    );
                }
            }

            let length = buffer.len();
            prop_assert!(length <= capacity);
            prop_assert_eq!(length, shadow.len());
            prop_assert_eq!(length, committed_in - committed_out);
            prop_assert_eq!(
                buffer.poll_readiness(),
                Readiness::from_occupancy(shadow.len(), capacity)
            );
        }
    }

    #[test]
    fn prop_writes_within_capacity_read_back_in_order(
        chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..16), 1..8),
    ) {
        let total: usize = chunks.iter().map(Vec::len).sum();
        let buffer = BoundedBuffer::new(total);
        let ctx = IoContext::blocking();
        for chunk in &chunks {
            prop_assert_eq!(buffer.write(chunk, &ctx), Ok(chunk.len()));
        }

        let mut drained = Vec::with_capacity(total);
        for chunk in &chunks {
            drained.extend(buffer.read(chunk.len(), &ctx).unwrap());
        }
        prop_assert_eq!(drained, chunks.concat());
        prop_assert!(buffer.is_empty());
    }
}
