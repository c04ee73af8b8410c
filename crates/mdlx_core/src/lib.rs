//! MDLX Core - Scene graph and MDL-family model import.
//!
//! This crate provides:
//!
//! - **Scene graph types**: `Scene`, `Node`, `Mesh`, `Material`, `Animation`
//! - **MDL support**: Quake 1 `IDPO` and 3D GameStudio `MDL2`..`MDL7` decoding
//!
//! # Example
//!
//! ```ignore
//! use mdlx_core::mdl::load_mdl;
//!
//! // Load a model
//! let scene = load_mdl("soldier.mdl")?;
//! println!("Loaded {} meshes, {} materials",
//!     scene.mesh_count(),
//!     scene.material_count());
//! ```

pub mod mdl;
pub mod mesh;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use mdl::{load_mdl, load_mdl_from_bytes, ImportConfig, MdlError, MdlResult};
pub use mesh::{Mesh, MeshBone, VertexWeight};
pub use scene::{
    Animation, Material, Node, NodeAnimation, QuatKey, Scene, ShadingMode, TextureSlot, VectorKey,
};
pub use texture::{EmbeddedTexture, TexelFormat};
