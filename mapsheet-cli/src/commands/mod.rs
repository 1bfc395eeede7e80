//! Command implementations for the MapSheet CLI

pub mod export;
pub mod pages;
