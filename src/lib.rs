//! LEDVision API Library
//!
//! Backend for the LED screen catalog site: products, ready-made solutions
//! and case studies, plus the lead form whose submissions are stored and
//! forwarded to the sales chat.
//!
//! # Modules
//!
//! - `circuit_breaker`: Circuit breaker for the notification endpoint.
//! - `config`: Configuration management.
//! - `db`: Database connection pool and schema setup.
//! - `dispatch`: Fire-and-forget notification tasks.
//! - `errors`: Error handling types.
//! - `extract`: Request extractors reporting `AppError`.
//! - `handlers`: Application state, health and catalog handlers.
//! - `lead_intake`: Lead list, submission and status update handlers.
//! - `models`: Records and request payloads.
//! - `notifier`: Lead notifications (Telegram).
//! - `openapi`: OpenAPI document and docs page.
//! - `routes`: Router and middleware assembly.
//! - `store`: Record store trait with Postgres and in-memory backends.

pub mod circuit_breaker;
pub mod config;
pub mod db;
pub mod dispatch;
pub mod errors;
pub mod extract;
pub mod handlers;
pub mod lead_intake;
pub mod models;
pub mod notifier;
pub mod openapi;
pub mod routes;
pub mod store;
