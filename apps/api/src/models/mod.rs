pub mod candidate;
pub mod matching;
pub mod role;
pub mod submission;
