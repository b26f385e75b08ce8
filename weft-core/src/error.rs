//! Error types for the public renderer API.

use thiserror::Error;

/// Errors surfaced at the renderer boundary.
///
/// The engine deliberately has almost no failure modes: malformed element
/// input is coerced to text, host mutations are infallible by contract, and
/// tree-shape violations are programming errors. What remains is the
/// overlap policy for competing render requests.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A render was requested while a reconciliation cycle is in flight.
    ///
    /// Drive [`Renderer::tick`](crate::render::Renderer::tick) (or
    /// [`flush`](crate::render::Renderer::flush)) until the renderer is
    /// idle, then retry.
    #[error("a reconciliation cycle is already in flight")]
    RenderInFlight,
}
