pub mod account;
pub mod auth;
pub mod billing;
pub mod dashboard;
pub mod students;
