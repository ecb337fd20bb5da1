pub mod memo;
pub mod parallel;
