//! API handlers

pub mod health;
pub mod stats;
pub mod tasks;
pub mod users;
pub mod wallet;
