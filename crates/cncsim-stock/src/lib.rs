//! # cncsim stock
//!
//! Dense voxel model of the raw stock block. Cells start occupied and are
//! cleared by a sphere swept along the tool path; they are never refilled.
//! The occupancy can be hashed for regression checks and exported as an
//! ASCII STL surface.

pub mod mesh;
pub mod removal;
pub mod voxel;

pub use mesh::{write_ascii_stl, Facet, MeshExport, SOLID_NAME};
pub use removal::RemovalPolicy;
pub use voxel::{VoxelStock, OCCUPIED, REMOVED};
