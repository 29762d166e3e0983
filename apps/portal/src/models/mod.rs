pub mod drive;
pub mod resume;
pub mod student;
pub mod user;
