//! Route handlers

pub mod account;
pub mod admin;
pub mod health;
