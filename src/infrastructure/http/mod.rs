//! HTTP adapter for the backend settings API.

pub mod client;

pub use client::HttpSettingsApi;
