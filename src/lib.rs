//! dailylog - a strict local record store for daily status updates
//!
//! - `schema`: what a valid record is
//! - `ingest`: image files → inline-encoded attachments
//! - `store`: durable create / read / update / delete
//! - `view`: search and detail projections
//! - `service`: the facade a presentation layer calls

pub mod cli;
pub mod config;
pub mod ingest;
pub mod observability;
pub mod schema;
pub mod service;
pub mod store;
pub mod view;
