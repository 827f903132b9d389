//! CLI Commands

pub mod identity;
pub mod interpret;
pub mod monitor;
pub mod phone;
