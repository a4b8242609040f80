//! ACRCloud identify API integration
//!
//! ACRCloud identifies music from a short recorded sample.
//! API docs: https://docs.acrcloud.com/reference/identification-api

mod adapter;
mod client;
pub mod dto;

pub use adapter::from_json;
pub use client::AcrCloudClient;
