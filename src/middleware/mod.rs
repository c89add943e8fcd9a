//! HTTP middleware for Tokenmeter

pub mod auth;
