pub mod auth_service;
pub mod leaderboard_service;
pub mod quiz_service;
pub mod timeout;
