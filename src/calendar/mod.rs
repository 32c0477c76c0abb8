pub mod appointment;
pub mod day;
pub mod month;

pub use appointment::{Appointment, RawEvent};
pub use day::Day;
pub use month::Month;
