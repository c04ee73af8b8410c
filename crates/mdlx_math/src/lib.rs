// Re-export glam for convenience
pub use glam::*;

// MDLX math types
mod aabb;
mod interval;
mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use transform::{swap_yz, Mat4Ext, Srt};
