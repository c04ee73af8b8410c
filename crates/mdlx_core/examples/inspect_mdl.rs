//! Example: Load and inspect an MDL file.
//!
//! Run with: cargo run --example inspect_mdl -- models/soldier.mdl
//!
//! `--json` prints the summary as JSON instead.
//!
//! Import options can be given as a JSON file:
//!
//! ```text
//! cargo run --example inspect_mdl -- models/soldier.mdl --config import.json
//! ```
//!
//! where `import.json` looks like `{ "keyframe": 2, "fix_inward_normals": true }`.

use std::env;

use anyhow::{bail, Context};
use mdlx_core::mdl::{load_mdl_with_config, ImportConfig};
use mdlx_core::Scene;
use serde_json::json;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: inspect_mdl <path-to-mdl-file> [--json] [--config <import.json>]");
        println!("\nExamples:");
        println!("  cargo run --example inspect_mdl -- models/player.mdl");
        println!("  cargo run --example inspect_mdl -- models/soldier.mdl --json");
        println!("  RUST_LOG=debug cargo run --example inspect_mdl -- models/soldier.mdl");
        return Ok(());
    }

    let path = &args[1];
    let mut config = ImportConfig::default();
    let mut as_json = false;

    let mut rest = args[2..].iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--json" => as_json = true,
            "--config" => {
                let Some(config_path) = rest.next() else {
                    bail!("--config needs a path");
                };
                let text = std::fs::read_to_string(config_path)
                    .with_context(|| format!("reading {}", config_path))?;
                config = serde_json::from_str(&text).with_context(|| format!("parsing {}", config_path))?;
            }
            other => bail!("unknown argument '{}'", other),
        }
    }

    let scene = load_mdl_with_config(path, &config).with_context(|| format!("loading {}", path))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&json_summary(&scene, &config))?);
    } else {
        println!("Loading MDL file: {}", path);
        println!("Import options: {}", serde_json::to_string(&config)?);
        print_scene(&scene);
    }
    Ok(())
}

fn json_summary(scene: &Scene, config: &ImportConfig) -> serde_json::Value {
    json!({
        "name": scene.name,
        "format": scene.source_format,
        "config": config,
        "triangles": scene.total_triangle_count(),
        "meshes": scene.meshes.iter().map(|m| json!({
            "name": m.name,
            "group": m.group_index,
            "material": m.material_index,
            "vertices": m.vertex_count(),
            "bones": m.bones.len(),
            "second_uv_layer": m.uvs2.is_some(),
        })).collect::<Vec<_>>(),
        "materials": scene.materials.iter().map(|m| json!({
            "name": m.name,
            "textures": m.diffuse_textures.iter().map(|t| t.path.as_str()).collect::<Vec<_>>(),
        })).collect::<Vec<_>>(),
        "textures": scene.textures.iter().map(|t| json!({
            "width": t.width,
            "height": t.height,
            "format": t.format.hint(),
            "bytes": t.data.len(),
        })).collect::<Vec<_>>(),
        "nodes": scene.nodes.iter().map(|n| n.name.as_str()).collect::<Vec<_>>(),
        "animations": scene.animations.iter().map(|a| json!({
            "name": a.name,
            "duration": a.duration,
            "channels": a.channels.len(),
        })).collect::<Vec<_>>(),
    })
}

fn print_scene(scene: &Scene) {
    println!("\n=== Scene: {} ({}) ===", scene.name, scene.source_format);
    println!("Meshes: {}", scene.mesh_count());
    println!("Materials: {}", scene.material_count());
    println!("Textures: {}", scene.textures.len());
    println!("Total triangles: {}", scene.total_triangle_count());

    println!("\n--- Meshes ---");
    for (i, mesh) in scene.meshes.iter().enumerate() {
        println!(
            "  [{}] {} - {} vertices, {} triangles, material {}",
            i,
            mesh.name,
            mesh.vertex_count(),
            mesh.triangle_count(),
            mesh.material_index
        );
        println!(
            "       Bounds: ({:.2}, {:.2}, {:.2}) to ({:.2}, {:.2}, {:.2})",
            mesh.bounds.x.min,
            mesh.bounds.y.min,
            mesh.bounds.z.min,
            mesh.bounds.x.max,
            mesh.bounds.y.max,
            mesh.bounds.z.max
        );
        println!(
            "       Normals: {}, UV layers: {}, bones: {}",
            mesh.normals.is_some(),
            mesh.uvs.iter().count() + mesh.uvs2.iter().count(),
            mesh.bones.len()
        );
    }

    println!("\n--- Materials ---");
    for (i, material) in scene.materials.iter().enumerate() {
        let textures: Vec<&str> = material.diffuse_textures.iter().map(|t| t.path.as_str()).collect();
        println!(
            "  [{}] {} - diffuse ({:.2}, {:.2}, {:.2}), textures {:?}",
            i, material.name, material.diffuse_color.x, material.diffuse_color.y, material.diffuse_color.z, textures
        );
    }

    println!("\n--- Textures ---");
    for (i, texture) in scene.textures.iter().enumerate() {
        println!(
            "  [{}] {}x{} {} ({} bytes)",
            i,
            texture.width,
            texture.height,
            texture.format.hint(),
            texture.data.len()
        );
    }

    println!("\n--- Nodes ---");
    print_node(scene, scene.root, 1);

    for animation in &scene.animations {
        println!(
            "\n--- Animation: {} ({} channels, duration {}) ---",
            animation.name,
            animation.channels.len(),
            animation.duration
        );
    }
}

fn print_node(scene: &Scene, node: usize, depth: usize) {
    let Some(n) = scene.nodes.get(node) else {
        return;
    };
    println!("{}{} ({} meshes)", "  ".repeat(depth), n.name, n.meshes.len());
    for &child in &n.children {
        print_node(scene, child, depth + 1);
    }
}
