//! 就绪语义：`poll` 的唯一事实来源。
//!
//! ## 设计目标（Why）
//! - 外部多路复用方（`select`/事件循环）只消费两条布尔事实：此刻非阻塞读能否成功、非阻塞写能否成功；
//! - 掩码位沿用 Linux `poll` 的数值，宿主层可以原样交给上游而无需再次翻译。
//!
//! ## 契约说明（What）
//! - 可读置位 `POLLIN | POLLRDNORM`，可写置位 `POLLOUT | POLLWRNORM`；
//! - 空缓冲只可写，满缓冲只可读，部分占用时两者皆可。

use core::fmt;
use core::ops::{BitAnd, BitOr, BitOrAssign};

/// 某一时刻的就绪快照。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Readiness {
    pub readable: bool,
    pub writable: bool,
}

impl Readiness {
    /// 由占用长度与容量推导就绪状态。
    pub fn from_occupancy(length: usize, capacity: usize) -> Self {
        Self {
            readable: length != 0,
            writable: length != capacity,
        }
    }

    pub fn to_mask(self) -> PollMask {
        let mut mask = PollMask::empty();
        if self.readable {
            mask |= PollMask::READABLE;
        }
        if self.writable {
            mask |= PollMask::WRITABLE;
        }
        mask
    }
}

/// `poll` 事件位集合。
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PollMask(u32);

impl PollMask {
    pub const POLLIN: PollMask = PollMask(0x001);
    pub const POLLOUT: PollMask = PollMask(0x004);
    pub const POLLRDNORM: PollMask = PollMask(0x040);
    pub const POLLWRNORM: PollMask = PollMask(0x100);

    /// 可读时置位的全部事件。
    pub const READABLE: PollMask = PollMask(Self::POLLIN.0 | Self::POLLRDNORM.0);
    /// 可写时置位的全部事件。
    pub const WRITABLE: PollMask = PollMask(Self::POLLOUT.0 | Self::POLLWRNORM.0);

    const ALL: u32 = Self::READABLE.0 | Self::WRITABLE.0;

    pub const fn empty() -> Self {
        PollMask(0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// 丢弃未定义的位。
    pub const fn from_bits_truncate(bits: u32) -> Self {
        PollMask(bits & Self::ALL)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: PollMask) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: PollMask) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn union(self, other: PollMask) -> Self {
        PollMask(self.0 | other.0)
    }

    pub fn is_readable(self) -> bool {
        self.intersects(Self::READABLE)
    }

    pub fn is_writable(self) -> bool {
        self.intersects(Self::WRITABLE)
    }
}

impl BitOr for PollMask {
    type Output = PollMask;

    fn bitor(self, rhs: PollMask) -> PollMask {
        self.union(rhs)
    }
}

impl BitOrAssign for PollMask {
    fn bitor_assign(&mut self, rhs: PollMask) {
        *self = self.union(rhs);
    }
}

impl BitAnd for PollMask {
    type Output = PollMask;

    fn bitand(self, rhs: PollMask) -> PollMask {
        PollMask(self.0 & rhs.0)
    }
}

impl From<Readiness> for PollMask {
    fn from(readiness: Readiness) -> Self {
        readiness.to_mask()
    }
}

impl fmt::Debug for PollMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(PollMask, &str); 4] = [
            (PollMask::POLLIN, "POLLIN"),
            (PollMask::POLLOUT, "POLLOUT"),
            (PollMask::POLLRDNORM, "POLLRDNORM"),
            (PollMask::POLLWRNORM, "POLLWRNORM"),
        ];
        let mut list = f.debug_set();
        for (flag, name) in NAMES {
            if self.contains(flag) {
                list.entry(&format_args!("{name}"));
            }
        }
        list.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupancy_maps_to_poll_bits() {
        let empty = Readiness::from_occupancy(0, 8).to_mask();
        assert_eq!(empty, PollMask::WRITABLE);
        assert_eq!(empty.bits(), 0x104);

        let partial = Readiness::from_occupancy(3, 8).to_mask();
        assert!(partial.is_readable() && partial.is_writable());
        assert_eq!(partial.bits(), 0x145);

        let full = Readiness::from_occupancy(8, 8).to_mask();
        assert_eq!(full, PollMask::READABLE);
    }

    #[test]
    fn truncation_and_debug_listing() {
        let mask = PollMask::from_bits_truncate(0xffff_ffff);
        assert_eq!(mask, PollMask::READABLE | PollMask::WRITABLE);
        assert_eq!(format!("{:?}", PollMask::POLLIN), "{POLLIN}");
        assert!(PollMask::empty().is_empty());
    }
}
