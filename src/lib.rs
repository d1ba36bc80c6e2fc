pub mod config;
pub mod retry;
pub mod search;
