pub mod auth;
pub mod billing_service;
pub mod dashboard_service;
pub mod plan_service;
pub mod student_service;
