pub mod driver;
pub mod launch;
pub mod pacing;
pub mod page;
