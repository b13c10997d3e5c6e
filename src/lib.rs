// src/lib.rs

pub mod api;
pub mod bridge;
pub mod chains;
pub mod core;
