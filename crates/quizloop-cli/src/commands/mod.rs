pub mod init;
pub mod leaderboard;
pub mod progress;
pub mod score;
pub mod study;
pub mod validate;
