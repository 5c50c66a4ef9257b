#![allow(clippy::redundant_pub_crate)]

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod model;
pub mod repo;

pub use api::{router, AppState};
