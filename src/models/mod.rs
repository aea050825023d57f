//! Request and Response models for the inspection API
//!
//! DTOs serialized to and from HTTP bodies.

pub mod requests;
pub mod responses;

pub use requests::SetRequest;
pub use responses::{ClearResponse, DeleteResponse, GetResponse, HealthResponse, SetResponse};
