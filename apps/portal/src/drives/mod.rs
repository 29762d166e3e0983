// Recruitment drives and student applications.

pub mod handlers;
pub mod store;
