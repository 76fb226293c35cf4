//! `globalfifo-core` 提供单实例、固定容量的共享字节缓冲及其同步协议。
//!
//! # 模块定位（Why）
//! - 读者与写者之间只有一条窄接口：有界读、有界写、缓冲内定位、清空命令以及供外部多路复用方
//!   使用的就绪查询；
//! - 这是整个系统唯一存在真实不变量与竞态的部分：阻塞/非阻塞读写协议、唯一互斥锁、
//!   “有数据”/“有空间”两个等待条件及其唤醒规则、以及就绪掩码的计算。
//!   设备注册、生命周期与测试客户端都属于宿主接入层（见 `globalfifo-device`）。
//!
//! # 设计概要（How）
//! - [`buffer`] 模块实现 [`BoundedBuffer`]：互斥锁 + 条件变量，读取后前移压缩；
//! - [`context`] 与 [`cancellation`] 描述单次调用的阻塞语义与外部取消；
//! - [`transfer`] 把调用方内存抽象为 [`ByteSource`]/[`ByteSink`]，使拷贝失败成为可观察的错误；
//! - [`readiness`] 把占用状态映射为 `poll` 掩码；
//! - [`config`] 与 [`stats`] 分别承载构造参数与运行计数。
//!
//! # 并发模型（What）
//! - 锁只在检查与修改状态期间持有，挂起前必须释放（由条件变量的等待原子完成）；
//! - 挂起点只存在于读写的等待循环中；醒来后总是重新检查谓词；
//! - 非阻塞模式完全跳过挂起，同步返回 [`FifoError::WouldBlock`]。

pub mod buffer;
pub mod cancellation;
pub mod config;
pub mod context;
pub mod error;
pub mod readiness;
pub mod stats;
pub mod transfer;

mod sync;

pub use buffer::{BoundedBuffer, BufferSnapshot, Occupancy};
pub use cancellation::Cancellation;
pub use config::{DEFAULT_CAPACITY, FifoConfig};
pub use context::{BlockingMode, IoContext};
pub use error::{ConfigError, FifoError};
pub use readiness::{PollMask, Readiness};
pub use stats::BufferStats;
pub use transfer::{ByteSink, ByteSource, TransferFault};
