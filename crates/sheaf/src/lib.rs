//! Backend for a printable-worksheet catalog: a two-level category tree,
//! tags with denormalized usage counters, and worksheet records carrying a
//! PDF plus derived preview images, exposed over a read-mostly REST API.

pub mod catalog;
pub mod config;
pub mod error;
pub mod media;
pub mod previews;
pub mod telemetry;
