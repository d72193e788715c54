//! LMA Backend Library
//!
//! Course, progress and onboarding services behind the LMA Shopify app.

pub mod api;
pub mod auth;
pub mod catalog;
pub mod db;
pub mod onboarding;
pub mod progress;
pub mod shopify;
pub mod student;
