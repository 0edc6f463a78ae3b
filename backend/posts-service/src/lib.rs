/// Posts Service Library
///
/// REST backend for posts with votes: users create posts, list and search
/// them, and vote on them. Only the owner of a post may change or delete it.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and the route table
/// - `models`: Storage rows, request DTOs and response projections
/// - `services`: Ownership and vote rules on top of the repositories
/// - `db`: SQL repositories and embedded migrations
/// - `middleware`: Bearer token authentication
/// - `error`: Error types and HTTP mapping
/// - `config`: Configuration management
/// - `openapi`: OpenAPI document
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
