// ==========================================
// 个别指导排课系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、值类型
// 红线: 不含 I/O，不含排课算法
// ==========================================

pub mod calendar;
pub mod capacity;
pub mod grid;
pub mod schedule;
pub mod student;
pub mod types;

// 重导出核心类型
pub use calendar::CalendarWindow;
pub use capacity::{Slot, StudentAvailability, TutorCapacity};
pub use grid::{TokenGrid, TokenRow};
pub use schedule::{Assignment, ScheduleEntry, ScheduleMap, UnscheduledItem};
pub use student::StudentDemand;
pub use types::{Period, SlotKey, Subject};
