//! Model files for the baby routine notifications service

pub mod age;
pub mod notification;
pub mod time;
pub mod user;
