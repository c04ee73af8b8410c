//! In-memory MDL files for tests.
//!
//! Builders write files field by field with `byteorder`, so every test
//! states exactly which bytes it feeds to the decoder.

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

/// Chainable little-endian writer.
#[derive(Default)]
pub(crate) struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.buf.write_u8(v).unwrap();
        self
    }

    pub fn u16(&mut self, v: u16) -> &mut Self {
        self.buf.write_u16::<LittleEndian>(v).unwrap();
        self
    }

    pub fn i16(&mut self, v: i16) -> &mut Self {
        self.buf.write_i16::<LittleEndian>(v).unwrap();
        self
    }

    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.buf.write_u32::<LittleEndian>(v).unwrap();
        self
    }

    pub fn i32(&mut self, v: i32) -> &mut Self {
        self.buf.write_i32::<LittleEndian>(v).unwrap();
        self
    }

    pub fn f32(&mut self, v: f32) -> &mut Self {
        self.buf.write_f32::<LittleEndian>(v).unwrap();
        self
    }

    pub fn vec3(&mut self, v: [f32; 3]) -> &mut Self {
        self.f32(v[0]).f32(v[1]).f32(v[2])
    }

    pub fn bytes(&mut self, b: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(b);
        self
    }

    /// NUL padded fixed-width name.
    pub fn name(&mut self, s: &str, width: usize) -> &mut Self {
        let mut field = vec![0u8; width];
        let n = s.len().min(width);
        field[..n].copy_from_slice(&s.as_bytes()[..n]);
        self.bytes(&field)
    }

    /// Pad with zeros up to `width` bytes past `start`.
    pub fn pad_to(&mut self, start: usize, width: usize) -> &mut Self {
        while self.buf.len() < start + width {
            self.buf.push(0);
        }
        self
    }

    pub fn patch_i32(&mut self, offset: usize, v: i32) {
        LittleEndian::write_i32(&mut self.buf[offset..offset + 4], v);
    }
}

/// Header shared by Quake 1 and GameStudio MDL2..MDL6.
#[derive(Clone)]
pub(crate) struct QuakeHeaderFixture {
    pub ident: [u8; 4],
    pub version: i32,
    pub scale: [f32; 3],
    pub translate: [f32; 3],
    pub num_skins: i32,
    pub skin_width: i32,
    pub skin_height: i32,
    pub num_verts: i32,
    pub num_tris: i32,
    pub num_frames: i32,
    pub synctype: i32,
}

impl QuakeHeaderFixture {
    pub fn new(ident: [u8; 4], num_verts: i32, num_tris: i32, num_frames: i32) -> Self {
        Self {
            ident,
            version: 6,
            scale: [1.0; 3],
            translate: [0.0; 3],
            num_skins: 0,
            skin_width: 8,
            skin_height: 8,
            num_verts,
            num_tris,
            num_frames,
            synctype: 0,
        }
    }

    pub fn write(&self, w: &mut ByteWriter) {
        w.bytes(&self.ident).i32(self.version);
        w.vec3(self.scale).vec3(self.translate);
        w.f32(1.0).vec3([0.0; 3]);
        w.i32(self.num_skins).i32(self.skin_width).i32(self.skin_height);
        w.i32(self.num_verts).i32(self.num_tris).i32(self.num_frames);
        w.i32(self.synctype).i32(0).f32(1.0);
    }

    pub fn write_to_vec(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();
        self.write(&mut w);
        w.into_vec()
    }
}

/// A packed vertex: coordinates and normal index.
pub(crate) type PackedVertex = ([u8; 3], u8);

pub(crate) enum QuakeFrame {
    Simple(Vec<PackedVertex>),
    Group(Vec<Vec<PackedVertex>>),
}

/// Complete Quake 1 `IDPO` file.
pub(crate) struct Quake1Fixture {
    pub header: QuakeHeaderFixture,
    /// Single skins, one palette image each
    pub skins: Vec<Vec<u8>>,
    /// (onseam, s, t)
    pub texcoords: Vec<(i32, i32, i32)>,
    /// (faces front, vertex indices)
    pub triangles: Vec<(i32, [i32; 3])>,
    pub frames: Vec<QuakeFrame>,
}

impl Quake1Fixture {
    /// A unit quad: four vertices, two triangles, one frame.
    pub fn quad() -> Self {
        let verts = vec![([0, 0, 0], 0), ([1, 0, 0], 0), ([1, 1, 0], 5), ([0, 1, 0], 5)];
        Self {
            header: QuakeHeaderFixture::new(*b"IDPO", 4, 2, 1),
            skins: Vec::new(),
            texcoords: vec![(0, 0, 0), (0, 7, 0), (0, 7, 7), (0, 0, 7)],
            triangles: vec![(1, [0, 1, 2]), (1, [0, 2, 3])],
            frames: vec![QuakeFrame::Simple(verts)],
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let mut header = self.header.clone();
        header.num_skins = self.skins.len() as i32;
        header.num_frames = self.frames.len() as i32;

        let mut w = ByteWriter::new();
        header.write(&mut w);
        for skin in &self.skins {
            w.i32(0).bytes(skin);
        }
        for &(onseam, s, t) in &self.texcoords {
            w.i32(onseam).i32(s).i32(t);
        }
        for (front, v) in &self.triangles {
            w.i32(*front).i32(v[0]).i32(v[1]).i32(v[2]);
        }
        for frame in &self.frames {
            match frame {
                QuakeFrame::Simple(verts) => {
                    w.i32(0);
                    write_simple_frame(&mut w, "frame", verts);
                }
                QuakeFrame::Group(frames) => {
                    w.i32(1).i32(frames.len() as i32);
                    w.bytes(&[0; 8]);
                    for _ in frames {
                        w.f32(0.1);
                    }
                    for verts in frames {
                        write_simple_frame(&mut w, "sub", verts);
                    }
                }
            }
        }
        w.into_vec()
    }
}

fn write_simple_frame(w: &mut ByteWriter, name: &str, verts: &[PackedVertex]) {
    // bbox min and max
    w.bytes(&[0; 8]).name(name, 16);
    for (v, n) in verts {
        w.bytes(v).u8(*n);
    }
}

pub(crate) struct GsSkinFixture {
    pub skin_type: u32,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

pub(crate) enum GsFrame {
    /// Byte packed vertices
    Packed(Vec<PackedVertex>),
    /// Short packed vertices
    Short(Vec<([u16; 3], u8)>),
}

/// Complete GameStudio MDL2..MDL6 file.
pub(crate) struct GameStudioFixture {
    pub version: u8,
    pub header: QuakeHeaderFixture,
    pub skins: Vec<GsSkinFixture>,
    pub uvs: Vec<(i16, i16)>,
    /// (vertex indices, uv indices)
    pub triangles: Vec<([u16; 3], [u16; 3])>,
    pub frames: Vec<GsFrame>,
}

impl GameStudioFixture {
    /// A single triangle.
    pub fn triangle(version: u8) -> Self {
        let ident = [b'M', b'D', b'L', b'0' + version];
        Self {
            version,
            header: QuakeHeaderFixture::new(ident, 3, 1, 1),
            skins: Vec::new(),
            uvs: vec![(0, 0), (8, 0), (8, 8)],
            triangles: vec![([0, 1, 2], [0, 1, 2])],
            frames: vec![GsFrame::Packed(vec![
                ([0, 0, 0], 0),
                ([2, 0, 0], 0),
                ([2, 2, 0], 0),
            ])],
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let mut header = self.header.clone();
        header.num_skins = self.skins.len() as i32;
        header.num_frames = self.frames.len() as i32;
        header.synctype = self.uvs.len() as i32;

        let mut w = ByteWriter::new();
        header.write(&mut w);
        for skin in &self.skins {
            w.u32(skin.skin_type);
            if self.version >= 5 {
                w.u32(skin.width).u32(skin.height);
            }
            w.bytes(&skin.data);
        }
        for &(u, v) in &self.uvs {
            w.i16(u).i16(v);
        }
        for (xyz, uv) in &self.triangles {
            for i in xyz.iter().chain(uv) {
                w.u16(*i);
            }
        }
        for frame in &self.frames {
            match frame {
                GsFrame::Packed(verts) => {
                    w.u32(0);
                    write_simple_frame(&mut w, "frame", verts);
                }
                GsFrame::Short(verts) => {
                    w.u32(1).bytes(&[0; 16]).name("frame", 16);
                    for (v, n) in verts {
                        w.u16(v[0]).u16(v[1]).u16(v[2]).u8(*n).u8(0);
                    }
                }
            }
        }
        w.into_vec()
    }
}

/// Element sizes declared in an MDL7 header.
#[derive(Clone, Copy)]
pub(crate) struct Mdl7Sizes {
    pub bone: u16,
    pub skin: u16,
    pub colorvalue: u16,
    pub material: u16,
    pub skinpoint: u16,
    pub triangle: u16,
    pub mainvertex: u16,
    pub framevertex: u16,
    pub bonetrans: u16,
    pub frame: u16,
}

impl Default for Mdl7Sizes {
    fn default() -> Self {
        Self {
            bone: 36,
            skin: 28,
            colorvalue: 16,
            material: 68,
            skinpoint: 8,
            triangle: 26,
            mainvertex: 16,
            framevertex: 16,
            bonetrans: 68,
            frame: 24,
        }
    }
}

pub(crate) struct Mdl7Bone {
    pub parent: u16,
    pub position: [f32; 3],
    pub name: String,
}

pub(crate) struct Mdl7MaterialColors {
    pub diffuse: [f32; 4],
    pub ambient: [f32; 4],
    pub specular: [f32; 4],
    pub emissive: [f32; 4],
    pub power: f32,
}

pub(crate) struct Mdl7Skin {
    pub skin_type: u8,
    pub width: i32,
    pub height: i32,
    pub name: String,
    /// Bytes following the 28 byte skin header (texels, file name, ...)
    pub payload: Vec<u8>,
    pub material: Option<Mdl7MaterialColors>,
}

impl Mdl7Skin {
    /// A skin with no texture, only material colors.
    pub fn colors(name: &str, diffuse: [f32; 3]) -> Self {
        Self {
            skin_type: 0x10,
            width: 0,
            height: 0,
            name: name.to_string(),
            payload: Vec::new(),
            material: Some(Mdl7MaterialColors {
                diffuse: [diffuse[0], diffuse[1], diffuse[2], 1.0],
                ambient: [0.1, 0.1, 0.1, 1.0],
                specular: [0.5, 0.5, 0.5, 1.0],
                emissive: [0.0, 0.0, 0.0, 1.0],
                power: 0.0,
            }),
        }
    }

    /// An external texture file.
    pub fn file(path: &str) -> Self {
        let mut payload = path.as_bytes().to_vec();
        payload.push(0);
        Self {
            skin_type: 7,
            width: 0,
            height: 1,
            name: String::new(),
            payload,
            material: None,
        }
    }
}

pub(crate) struct Mdl7Triangle {
    pub vertices: [u16; 3],
    pub uv0: [u16; 3],
    pub material0: i32,
    pub uv1: [u16; 3],
    pub material1: i32,
}

impl Mdl7Triangle {
    pub fn new(vertices: [u16; 3], material: i32) -> Self {
        Self {
            vertices,
            uv0: [0, 1, 2],
            material0: material,
            uv1: [0, 1, 2],
            material1: -1,
        }
    }
}

/// (position, bone or vertex index, normal index)
pub(crate) type Mdl7Vertex = ([f32; 3], u16, u16);

#[derive(Default)]
pub(crate) struct Mdl7Frame {
    pub vertices: Vec<Mdl7Vertex>,
    /// (column-major matrix, bone index)
    pub transforms: Vec<([f32; 16], u16)>,
}

pub(crate) struct Mdl7Group {
    pub name: String,
    pub skins: Vec<Mdl7Skin>,
    pub uvs: Vec<[f32; 2]>,
    pub triangles: Vec<Mdl7Triangle>,
    pub vertices: Vec<Mdl7Vertex>,
    pub frames: Vec<Mdl7Frame>,
}

impl Mdl7Group {
    /// A group with a single triangle and no skins.
    pub fn triangle(name: &str) -> Self {
        Self {
            name: name.to_string(),
            skins: Vec::new(),
            uvs: vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
            triangles: vec![Mdl7Triangle::new([0, 1, 2], 0)],
            vertices: vec![
                ([0.0, 0.0, 0.0], 0, 0),
                ([1.0, 0.0, 0.0], 0, 0),
                ([1.0, 1.0, 0.0], 0, 0),
            ],
            frames: Vec::new(),
        }
    }
}

/// Complete 3D GameStudio A7 `MDL7` file.
pub(crate) struct Mdl7Fixture {
    pub sizes: Mdl7Sizes,
    pub bones: Vec<Mdl7Bone>,
    pub groups: Vec<Mdl7Group>,
    /// Overrides the computed data size when set
    pub data_size: Option<i32>,
}

impl Mdl7Fixture {
    pub fn new(groups: Vec<Mdl7Group>) -> Self {
        Self {
            sizes: Mdl7Sizes::default(),
            bones: Vec::new(),
            groups,
            data_size: None,
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let s = &self.sizes;
        let mut w = ByteWriter::new();
        w.bytes(b"MDL7").i32(0);
        w.i32(self.bones.len() as i32).i32(self.groups.len() as i32);
        w.i32(0).i32(0).i32(0);
        for size in [
            s.bone, s.skin, s.colorvalue, s.material, s.skinpoint, s.triangle, s.mainvertex,
            s.framevertex, s.bonetrans, s.frame,
        ] {
            w.u16(size);
        }

        for bone in &self.bones {
            let start = w.len();
            w.u16(bone.parent).u16(0).vec3(bone.position);
            if s.bone > 16 {
                w.name(&bone.name, s.bone as usize - 16);
            }
            w.pad_to(start, s.bone as usize);
        }

        for group in &self.groups {
            self.write_group(&mut w, group);
        }

        let data_size = self.data_size.unwrap_or(w.len() as i32);
        let mut bytes = w;
        bytes.patch_i32(16, data_size);
        bytes.into_vec()
    }

    fn write_group(&self, w: &mut ByteWriter, group: &Mdl7Group) {
        let s = &self.sizes;
        w.u8(1).u8(0).u8(0).u8(0).i32(0).name(&group.name, 16);
        w.i32(group.skins.len() as i32).i32(group.uvs.len() as i32);
        w.i32(group.triangles.len() as i32).i32(group.vertices.len() as i32);
        w.i32(group.frames.len() as i32);

        for skin in &group.skins {
            let start = w.len();
            w.u8(skin.skin_type).bytes(&[0; 3]).i32(skin.width).i32(skin.height);
            w.name(&skin.name, 16).pad_to(start, s.skin as usize);
            w.bytes(&skin.payload);
            if let Some(m) = &skin.material {
                for color in [m.diffuse, m.ambient, m.specular, m.emissive] {
                    for c in color {
                        w.f32(c);
                    }
                }
                w.f32(m.power);
            }
        }

        for uv in &group.uvs {
            let start = w.len();
            w.f32(uv[0]).f32(uv[1]).pad_to(start, s.skinpoint as usize);
        }

        for tri in &group.triangles {
            let mut rec = ByteWriter::new();
            for v in tri.vertices {
                rec.u16(v);
            }
            for v in tri.uv0 {
                rec.u16(v);
            }
            rec.i32(tri.material0);
            for v in tri.uv1 {
                rec.u16(v);
            }
            rec.i32(tri.material1);
            let rec = rec.into_vec();
            let n = (s.triangle as usize).min(rec.len());
            let start = w.len();
            w.bytes(&rec[..n]).pad_to(start, s.triangle as usize);
        }

        for vertex in &group.vertices {
            write_mdl7_vertex(w, vertex, s.mainvertex);
        }

        for frame in &group.frames {
            let start = w.len();
            w.name("frame", 16);
            w.u32(frame.vertices.len() as u32).u32(frame.transforms.len() as u32);
            w.pad_to(start, s.frame as usize);
            for vertex in &frame.vertices {
                write_mdl7_vertex(w, vertex, s.framevertex);
            }
            for (matrix, bone) in &frame.transforms {
                let start = w.len();
                for m in matrix {
                    w.f32(*m);
                }
                w.u16(*bone).u16(0).pad_to(start, s.bonetrans as usize);
            }
        }
    }
}

fn write_mdl7_vertex(w: &mut ByteWriter, vertex: &Mdl7Vertex, size: u16) {
    let start = w.len();
    let (pos, index, normal) = vertex;
    w.vec3(*pos).u16(*index);
    if size >= 26 {
        // Full normal derived from the table entry
        let n = crate::mdl::normals::NORMAL_TABLE[*normal as usize];
        w.vec3(n);
    } else if size >= 16 {
        w.u16(*normal);
    }
    w.pad_to(start, size as usize);
}
