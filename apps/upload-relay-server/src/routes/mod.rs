//! Route modules for Upload Relay Server

pub mod health;
pub mod timing;
pub mod upload;
