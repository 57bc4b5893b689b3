pub mod appointment;
pub mod business_hours;
pub mod service;
pub mod slot;
pub mod vehicle;

pub use appointment::{Appointment, AppointmentStatus};
pub use business_hours::{BusinessHours, DayHours};
pub use service::{EngineBand, FuelType, ServiceType};
pub use slot::Slot;
pub use vehicle::Vehicle;
