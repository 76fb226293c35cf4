#![doc = r#"
# globalfifo-device

## 设计动机（Why）
- **定位**：把 `globalfifo-core` 的单例共享缓冲包装成字符设备式的调用面：
  `open`/`close`、`read`/`write`、`llseek`、`ioctl` 与 `poll`。
- **架构角色**：宿主接入层。设备号分配、模块装卸与用户态测试客户端都不在这里；
  本 crate 只负责“句柄 -> 缓冲”的绑定以及调用约定的翻译。
- **设计理念**：整个进程只有一个缓冲，由 [`FifoDevice`] 构造并持有，
  再以 `Arc` 注入到每个打开的 [`FifoHandle`]，不存在全局可变状态。

## 核心契约（What）
- `open` 永不失败，返回游标为 0、拥有独立取消令牌的句柄；`close` 为空操作，缓冲持续存在；
- `read`/`write` 按调用方给出的 [`BlockingMode`](globalfifo_core::BlockingMode)
  决定挂起或返回 `WouldBlock`；
- `seek` 只移动句柄自己的建议性游标，读写总是作用于缓冲头部；
- `control` 只接受 [`ControlCode::Clear`]，其余控制码一律 `InvalidArgument`；
- `poll` 返回 Linux 位值的 [`PollMask`](globalfifo_core::PollMask)。

## 实现策略（How）
- 每次调用都以 `IoContext::new(mode).with_cancellation(handle.cancellation().child())`
  组装上下文，宿主通过句柄的取消令牌向挂起中的调用投递“信号”；
- 错误以 [`FifoError`](globalfifo_core::FifoError) 传播，[`syscall_return`] 把结果折叠为
  “非负字节数 / 负 errno” 的系统调用返回值；
- 句柄实现 `std::io::{Read, Write, Seek}`，以阻塞模式对接标准库生态。

## 风险与考量（Trade-offs）
- 句柄上的信号是一次性的：它只打断一次挂起，随后被消费；`std::io` 适配器遇到
  `Interrupted` 会自动重发，重发的调用重新正常挂起；
- 游标不参与读写，仅做边界校验，这与原始设备的行为一致。
"#]

mod control;
mod device;
mod handle;

pub use control::{ControlCode, FIFO_CLEAR, UnknownControlCode};
pub use device::FifoDevice;
pub use handle::{FifoHandle, syscall_return};
