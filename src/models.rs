pub mod auth;
pub mod billing;
pub mod coach;
pub mod dashboard;
pub mod student;
