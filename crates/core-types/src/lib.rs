pub mod enums;
pub mod error;
pub mod reports;
pub mod structs;
pub mod validation;

// Re-export the core types to provide a clean public API.
pub use enums::Status;
pub use error::{FieldError, ValidationErrors};
pub use reports::{
    attendance_percent, EventPopularity, EventStats, StudentParticipation, TopActiveStudent,
};
pub use structs::{
    Ack, Attendance, College, Event, EventFilter, Feedback, NewAttendance, NewCollege, NewEvent,
    NewFeedback, NewRegistration, NewStudent, Registration, Student,
};
pub use validation::{Normalize, Validate};
