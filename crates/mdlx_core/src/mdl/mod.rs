//! MDL model support for MDLX.
//!
//! This module decodes the MDL family of binary model formats into the
//! MDLX scene graph. All of them start with a four byte magic word that
//! selects the decoder.
//!
//! ## Supported Formats
//!
//! - Quake 1 `IDPO`: skins, skin groups, texture coordinates with seams,
//!   simple and grouped frames
//! - 3D GameStudio `MDL2` to `MDL6`: 8/16 bit frames, embedded textures,
//!   DDS skins and MDL5 texel coordinates
//! - 3D GameStudio A7 `MDL7`: mesh groups, material colors, two texture
//!   layers, bone hierarchies, rigid skinning and bone animation
//!
//! ## Not Supported
//!
//! - Half-Life 2 `IDST`/`IDSQ` (recognized, rejected as unsupported)
//! - Decoding texture images; texels are kept as raw bytes
//! - Writing MDL files
//!
//! # Example
//!
//! ```ignore
//! use mdlx_core::mdl::{load_mdl_with_config, ImportConfig};
//!
//! let config = ImportConfig::default().with_keyframe(3);
//! let scene = load_mdl_with_config("models/soldier.mdl", &config)?;
//! println!("Loaded {} meshes, {} bones animated",
//!     scene.mesh_count(),
//!     scene.animations.first().map_or(0, |a| a.channels.len()));
//! ```

mod assemble;
mod config;
mod cursor;
mod error;
mod format;
mod frames;
mod gamestudio;
mod header;
mod loader;
mod mdl7;
mod normals;
mod quake1;
mod skins;

#[cfg(test)]
mod fixtures;

pub use config::ImportConfig;
pub use error::{MdlError, MdlResult};
pub use format::Subformat;
pub use loader::*;
pub use normals::{decode_normal, NUM_NORMALS};
