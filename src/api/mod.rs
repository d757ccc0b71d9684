//! Client for the reporting platform's admin API

pub mod brigadistas;
pub mod client;
pub mod interceptors;
mod normalize;
pub mod pipeline;
pub mod reportes;
pub mod ubicaciones;
pub mod usuarios;

pub use client::{ApiClient, ReqwestTransport};
pub use interceptors::{BearerAuth, ErrorReporter, TraceRequests};
pub use pipeline::{ApiRequest, ApiResponse, Middleware, Next, Pipeline, Transport};
