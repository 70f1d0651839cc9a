pub mod auth;
pub mod error;
pub mod mail;
pub mod platform;
pub mod recommend;
pub mod storage;
