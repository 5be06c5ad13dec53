/// Utility modules for common functionality
pub mod datetime;
pub mod error;
pub mod messages;
pub mod reminder;
pub mod timezone;
pub mod validation;
