use serde::{Deserialize, Serialize};

/// Options controlling an MDL import.
///
/// Deserializable so hosts can keep it in their own config files; missing
/// fields take their defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Frame whose vertex positions are output.
    pub keyframe: u32,

    /// Negate normals that point into the mesh.
    pub fix_inward_normals: bool,
}

impl ImportConfig {
    pub fn with_keyframe(mut self, keyframe: u32) -> Self {
        self.keyframe = keyframe;
        self
    }

    pub fn with_fix_inward_normals(mut self, enabled: bool) -> Self {
        self.fix_inward_normals = enabled;
        self
    }
}
