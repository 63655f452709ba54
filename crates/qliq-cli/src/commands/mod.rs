//! Command implementations

pub mod account;
pub mod downline;
pub mod shop;
