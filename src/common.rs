pub mod clock;
pub mod currency;
pub mod error;
