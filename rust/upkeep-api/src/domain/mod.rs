//! Core domain types for the maintenance scheduling engine.
//!
//! Schedules and tasks are owned by this service; bookings and vendors
//! are read models over data owned elsewhere in the platform.

pub mod booking;
pub mod schedule;
pub mod task;
pub mod vendor;

pub use booking::{Booking, BookingStatus};
pub use schedule::{MaintenanceSchedule, MaintenanceTemplate, ScheduleRecord};
pub use task::{MaintenanceTask, TaskStatus};
pub use vendor::{Vendor, VendorStatus};
