//! Ray picking across the three viewports.
//!
//! The pointer is resolved against the viewport it belongs to, turned into a
//! world ray, and tested against oriented pick boxes. Gizmo handles always
//! win over building bodies.

/// Gizmo-first nearest hit over pickable boxes.
pub mod pick;

/// Pointer capture, viewport-local position, ray and ground point.
pub mod pointer;

/// Ray construction, ground intersection and box tests.
pub mod ray;
