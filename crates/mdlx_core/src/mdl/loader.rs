//! High-level MDL loading.
//!
//! Reads the magic word, hands the buffer to the matching decoder and
//! applies the optional post-processing from [`ImportConfig`].

use std::path::Path;

use crate::mdl::config::ImportConfig;
use crate::mdl::cursor::Cursor;
use crate::mdl::error::{MdlError, MdlResult};
use crate::mdl::format::Subformat;
use crate::mdl::gamestudio::read_gamestudio;
use crate::mdl::mdl7::read_mdl7;
use crate::mdl::quake1::read_quake1;
use crate::scene::Scene;

/// Load an MDL file and return a Scene.
///
/// The scene is named after the file stem.
///
/// # Example
///
/// ```ignore
/// use mdlx_core::mdl::load_mdl;
///
/// let scene = load_mdl("models/soldier.mdl")?;
/// println!("Loaded {} meshes", scene.mesh_count());
/// ```
pub fn load_mdl<P: AsRef<Path>>(path: P) -> MdlResult<Scene> {
    load_mdl_with_config(path, &ImportConfig::default())
}

/// Load an MDL file with explicit import options.
pub fn load_mdl_with_config<P: AsRef<Path>>(path: P, config: &ImportConfig) -> MdlResult<Scene> {
    let path = path.as_ref();
    let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("unnamed");

    let data = std::fs::read(path)?;
    load_mdl_from_bytes_with_config(&data, name, config)
}

/// Decode an MDL file that is already in memory.
pub fn load_mdl_from_bytes(data: &[u8], name: &str) -> MdlResult<Scene> {
    load_mdl_from_bytes_with_config(data, name, &ImportConfig::default())
}

/// Decode an in-memory MDL file with explicit import options.
///
/// Either the whole file decodes into a scene or an error is returned;
/// nothing partial is handed back.
pub fn load_mdl_from_bytes_with_config(data: &[u8], name: &str, config: &ImportConfig) -> MdlResult<Scene> {
    let format = Subformat::detect(Cursor::new(data).peek_magic()?)?;
    log::debug!("MDL subtype: {}", format.description());

    let mut scene = match format {
        Subformat::Quake1 => read_quake1(data, name, config)?,
        Subformat::GameStudio(version) => read_gamestudio(data, name, version, config)?,
        Subformat::GameStudio7 => read_mdl7(data, name, config)?,
        Subformat::HalfLife2 => {
            return Err(MdlError::UnsupportedFeature(
                "Half-Life 2 MDL (IDST/IDSQ)".to_string(),
            ))
        }
    };

    if config.fix_inward_normals {
        let flipped = scene
            .meshes
            .iter_mut()
            .map(|mesh| mesh.flip_normals_if_inward())
            .filter(|&f| f)
            .count();
        if flipped > 0 {
            log::info!("Flipped inward facing normals of {} meshes", flipped);
        }
    }

    log::info!(
        "Loaded {} '{}': {} meshes, {} materials, {} textures, {} triangles",
        format.name(),
        name,
        scene.mesh_count(),
        scene.material_count(),
        scene.textures.len(),
        scene.total_triangle_count()
    );

    Ok(scene)
}
