// Transform utilities for Mat4
//
// Extends glam::Mat4 with the decomposition and axis conversion the importers need.
// Note: glam's to_scale_rotation_translation() never fails, so degenerate input is
// rejected here before and after calling it.

use glam::{Mat4, Quat, Vec3, Vec4};

/// Scale, rotation and translation of an affine matrix.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Srt {
    pub scale: Vec3,
    pub rotation: Quat,
    pub translation: Vec3,
}

/// Swap the Y and Z components of a vector.
///
/// Model files in this family are Z-up; the output scene is Y-up.
pub fn swap_yz(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.z, v.y)
}

/// Change of basis matrix for [`swap_yz`]. It is its own inverse.
const SWAP_YZ: Mat4 = Mat4::from_cols(
    Vec4::new(1.0, 0.0, 0.0, 0.0),
    Vec4::new(0.0, 0.0, 1.0, 0.0),
    Vec4::new(0.0, 1.0, 0.0, 0.0),
    Vec4::new(0.0, 0.0, 0.0, 1.0),
);

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Decompose into scale, rotation and translation.
    ///
    /// Returns `None` for singular or non-finite matrices, where a
    /// decomposition would silently produce garbage.
    fn try_decompose(&self) -> Option<Srt>;

    /// Express this transform in the Y/Z swapped basis (`S * M * S`).
    fn swap_yz_basis(&self) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn try_decompose(&self) -> Option<Srt> {
        if !self.is_finite() {
            return None;
        }
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }

        let (scale, rotation, translation) = self.to_scale_rotation_translation();
        if !scale.is_finite() || !rotation.is_finite() || !translation.is_finite() {
            return None;
        }

        Some(Srt {
            scale,
            rotation: rotation.normalize(),
            translation,
        })
    }

    fn swap_yz_basis(&self) -> Mat4 {
        SWAP_YZ * *self * SWAP_YZ
    }
}
