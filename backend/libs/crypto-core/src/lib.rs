//! Shared cryptographic helpers for the posts backend
//!
//! Currently limited to bearer token validation (`jwt`).

pub mod jwt;
