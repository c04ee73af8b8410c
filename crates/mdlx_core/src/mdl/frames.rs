//! Frame records of the single-mesh formats.

use super::cursor::Cursor;
use super::error::MdlResult;
use super::header::Header;

/// Size of a byte packed frame header: bbox min, bbox max, name.
pub const SIMPLE_FRAME_HEADER: usize = 4 + 4 + 16;

/// Size of a short packed frame header.
pub const SHORT_FRAME_HEADER: usize = 8 + 8 + 16;

/// One vertex of a keyframe, still in packed coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct FrameVertex {
    pub packed: [f32; 3],
    pub normal: u8,
}

/// How a frame stores its vertices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum VertexPacking {
    /// Three bytes and a normal index
    Byte,
    /// Three shorts, a normal index and a pad byte
    Short,
}

impl VertexPacking {
    pub fn vertex_size(self) -> usize {
        match self {
            VertexPacking::Byte => 4,
            VertexPacking::Short => 8,
        }
    }

    pub fn frame_size(self, num_verts: usize) -> usize {
        let header = match self {
            VertexPacking::Byte => SIMPLE_FRAME_HEADER,
            VertexPacking::Short => SHORT_FRAME_HEADER,
        };
        header + num_verts.saturating_mul(self.vertex_size())
    }
}

/// Read a simple frame: its header followed by `num_verts` vertices.
pub(crate) fn read_simple_frame(
    cursor: &mut Cursor<'_>,
    header: &Header,
    packing: VertexPacking,
) -> MdlResult<Vec<FrameVertex>> {
    let mut frame = cursor.record(packing.frame_size(header.num_verts))?;
    match packing {
        VertexPacking::Byte => frame.skip(SIMPLE_FRAME_HEADER)?,
        VertexPacking::Short => frame.skip(SHORT_FRAME_HEADER)?,
    }

    let mut vertices = Vec::with_capacity(header.num_verts);
    for _ in 0..header.num_verts {
        let vertex = match packing {
            VertexPacking::Byte => {
                let v = frame.read_bytes(3)?;
                FrameVertex {
                    packed: [v[0] as f32, v[1] as f32, v[2] as f32],
                    normal: frame.read_u8()?,
                }
            }
            VertexPacking::Short => {
                let x = frame.read_u16()? as f32;
                let y = frame.read_u16()? as f32;
                let z = frame.read_u16()? as f32;
                let normal = frame.read_u8()?;
                frame.skip(1)?;
                FrameVertex {
                    packed: [x, y, z],
                    normal,
                }
            }
        };
        vertices.push(vertex);
    }
    Ok(vertices)
}

/// Clamp a requested keyframe to the available frames.
pub(crate) fn resolve_keyframe(keyframe: u32, num_frames: usize) -> usize {
    let keyframe = keyframe as usize;
    if keyframe < num_frames {
        keyframe
    } else {
        log::warn!(
            "Keyframe {} does not exist ({} frames), using frame 0",
            keyframe,
            num_frames
        );
        0
    }
}
