pub mod user_repo;
pub use user_repo::UserRepository;
pub mod coach_repo;
pub use coach_repo::CoachRepository;
pub mod student_repo;
pub use student_repo::StudentRepository;
