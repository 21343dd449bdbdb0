//! View-dependent look of building meshes.

/// System that writes visibility, materials and edges to view proxies.
pub mod apply;

/// Pure rules deciding how a mesh looks in each view.
pub mod policy;
