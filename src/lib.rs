//! Wizzio Lead Forwarder Library
//!
//! Receives lead form submissions, maps them onto the Wizzio PushLead schema,
//! signs them and relays the Wizzio response to the browser.
//!
//! # Modules
//!
//! - `api`: API definitions.
//! - `core`: Core business logic.
//! - `integrations`: External service integrations.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `field_mapping`: Submission to Wizzio field mapping and validation.
//! - `forwarder`: Validate, map, sign, dispatch, relay.
//! - `handlers`: HTTP request handlers.
//! - `models`: Core data models.
//! - `router`: Axum router and shared layers.
//! - `signing`: `DateTime` formatting and HMAC-SHA1 request signature.
//! - `wizzio_client`: Wizzio PushLead client.

pub mod api;
pub mod core;
pub mod integrations;

pub mod config;
pub mod errors;
pub mod field_mapping;
pub mod forwarder;
pub mod handlers;
pub mod models;
pub mod router;
pub mod signing;
pub mod wizzio_client;
