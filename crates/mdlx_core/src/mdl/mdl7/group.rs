//! MDL7 mesh group records.

use mdlx_math::Vec3;

use super::header::ElementSizes;
use crate::mdl::cursor::Cursor;
use crate::mdl::error::{MdlError, MdlResult};

pub(crate) const GROUP_HEADER_SIZE: usize = 44;

/// Group type of a triangle mesh, the only kind MED writes.
const GROUP_TYPE_TRIANGLES: u8 = 1;

/// Material index MED writes for "no material".
pub(crate) const NO_MATERIAL: u32 = u32::MAX;

/// Bone index of a vertex that no bone drives.
pub(crate) const NO_BONE: u16 = 0xFFFF;

#[derive(Clone, Debug)]
pub(crate) struct GroupHeader {
    pub name: String,
    pub num_skins: usize,
    pub num_uvs: usize,
    pub num_tris: usize,
    pub num_verts: usize,
    pub num_frames: usize,
}

impl GroupHeader {
    pub fn read(cursor: &mut Cursor<'_>) -> MdlResult<Self> {
        let mut rec = cursor.record(GROUP_HEADER_SIZE)?;
        let group_type = rec.read_u8()?;
        // deformers, max weights, unused, group data size
        rec.skip(3 + 4)?;
        let name = rec.read_fixed_str(16)?;

        if group_type != GROUP_TYPE_TRIANGLES {
            log::warn!("MDL7 group '{}' has type {}, reading it as a triangle mesh", name, group_type);
        }

        Ok(Self {
            num_skins: read_count(&mut rec, &name)?,
            num_uvs: read_count(&mut rec, &name)?,
            num_tris: read_count(&mut rec, &name)?,
            num_verts: read_count(&mut rec, &name)?,
            num_frames: read_count(&mut rec, &name)?,
            name,
        })
    }

    pub fn has_geometry(&self) -> bool {
        self.num_tris != 0 && self.num_verts != 0
    }
}

fn read_count(cursor: &mut Cursor<'_>, group: &str) -> MdlResult<usize> {
    let value = cursor.read_i32()?;
    usize::try_from(value).map_err(|_| {
        MdlError::MalformedHeader(format!("MDL7 group '{}' has a negative count {}", group, value))
    })
}

/// Texture coordinate channel of a triangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SkinSet {
    pub uvs: [u16; 3],
    pub material: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Triangle {
    pub vertices: [u16; 3],
    pub first: Option<SkinSet>,
    pub second: Option<SkinSet>,
}

impl Triangle {
    /// Read a triangle of `size` bytes.
    ///
    /// Short records omit trailing fields: 12 bytes carry the first UV
    /// channel, 16 its material, 26 the second channel and material.
    pub fn read(cursor: &mut Cursor<'_>, size: usize) -> MdlResult<Self> {
        let mut rec = cursor.record(size)?;
        let vertices = read_indices(&mut rec)?;

        let first = if size >= 12 {
            let uvs = read_indices(&mut rec)?;
            let material = if size >= 16 { rec.read_u32()? } else { NO_MATERIAL };
            Some(SkinSet { uvs, material })
        } else {
            None
        };

        let second = if size >= 26 {
            Some(SkinSet {
                uvs: read_indices(&mut rec)?,
                material: rec.read_u32()?,
            })
        } else {
            None
        };

        Ok(Self {
            vertices,
            first,
            second,
        })
    }
}

fn read_indices(cursor: &mut Cursor<'_>) -> MdlResult<[u16; 3]> {
    Ok([cursor.read_u16()?, cursor.read_u16()?, cursor.read_u16()?])
}

/// Normal stored with a vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum VertexNormal {
    Missing,
    Table(u16),
    Full(Vec3),
}

/// A main or frame vertex.
///
/// `index` is the driving bone for main vertices and the replaced vertex
/// for frame vertices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Vertex {
    pub position: Vec3,
    pub index: u16,
    pub normal: VertexNormal,
}

impl Vertex {
    pub fn read(cursor: &mut Cursor<'_>, size: usize) -> MdlResult<Self> {
        let mut rec = cursor.record(size)?;
        let position = rec.read_vec3()?;
        let index = rec.read_u16()?;
        let normal = if size >= 26 {
            VertexNormal::Full(rec.read_vec3()?)
        } else if size >= 16 {
            VertexNormal::Table(rec.read_u16()?)
        } else {
            VertexNormal::Missing
        };
        Ok(Self {
            position,
            index,
            normal,
        })
    }
}

/// Everything a group stores between its skins and its frames.
#[derive(Clone, Debug, Default)]
pub(crate) struct GroupGeometry {
    pub uvs: Vec<[f32; 2]>,
    pub triangles: Vec<Triangle>,
    pub vertices: Vec<Vertex>,
}

impl GroupGeometry {
    pub fn read(cursor: &mut Cursor<'_>, group: &GroupHeader, sizes: &ElementSizes) -> MdlResult<Self> {
        let mut uvs = Vec::with_capacity(group.num_uvs);
        for _ in 0..group.num_uvs {
            let mut rec = cursor.record(sizes.skinpoint)?;
            uvs.push([rec.read_f32()?, rec.read_f32()?]);
        }

        let mut triangles = Vec::with_capacity(group.num_tris);
        for _ in 0..group.num_tris {
            triangles.push(Triangle::read(cursor, sizes.triangle)?);
        }

        let mut vertices = Vec::with_capacity(group.num_verts);
        for _ in 0..group.num_verts {
            vertices.push(Vertex::read(cursor, sizes.mainvertex)?);
        }

        Ok(Self {
            uvs,
            triangles,
            vertices,
        })
    }
}
