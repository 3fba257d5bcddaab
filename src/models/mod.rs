//! Data models for the salon booking server

pub mod availability;
pub mod booking;
pub mod salon;
pub mod schedule;
pub mod service;
pub mod staff;

// Re-export commonly used types
pub use booking::{Booking, BookingStatus, NewBooking};
pub use salon::Salon;
pub use schedule::{ClosedDay, DaySchedule, ScheduleOwner};
pub use service::Service;
pub use staff::Staff;
