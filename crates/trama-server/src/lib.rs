//! HTTP server for the Trama content service.
//!
//! Serves reconstructed pages, accepts edit and delete batches, and exposes
//! per-page integrity reports over a small REST surface.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod wire;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::build_router;
pub use server::ContentServer;
pub use wire::{
    DeleteRequest, DeleteResponse, FieldPayload, PageQuery, UpdateRequest, UpdateResponse,
};
