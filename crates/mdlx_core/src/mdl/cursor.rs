//! Bounds-checked little-endian reader over the raw file buffer.

use byteorder::{ByteOrder, LittleEndian};
use mdlx_math::Vec3;

use super::error::{MdlError, MdlResult};

/// Read position inside an immutable byte buffer.
///
/// Every read checks the remaining length first and fails with
/// [`MdlError::BufferOverrun`] instead of reading past the end. Sub-cursors
/// created with [`Cursor::record`] report offsets relative to the whole file.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0, base: 0 }
    }

    /// Absolute offset of the next read.
    pub fn position(&self) -> usize {
        self.base + self.pos
    }

    pub fn len(&self) -> usize {
        self.base + self.data.len()
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn skip(&mut self, n: usize) -> MdlResult<()> {
        self.take(n).map(|_| ())
    }

    fn take(&mut self, n: usize) -> MdlResult<&'a [u8]> {
        if n > self.remaining() {
            return Err(MdlError::BufferOverrun {
                offset: self.position(),
                wanted: n,
                len: self.len(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Split off the next `size` bytes as a cursor of their own.
    ///
    /// Used for records whose size the file declares: the caller reads the
    /// fields it knows and the parent cursor has already moved past the
    /// whole record.
    pub fn record(&mut self, size: usize) -> MdlResult<Cursor<'a>> {
        let base = self.position();
        let data = self.take(size)?;
        Ok(Cursor { data, pos: 0, base })
    }

    pub fn read_bytes(&mut self, n: usize) -> MdlResult<&'a [u8]> {
        self.take(n)
    }

    pub fn read_u8(&mut self) -> MdlResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> MdlResult<u16> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub fn read_i16(&mut self) -> MdlResult<i16> {
        Ok(LittleEndian::read_i16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> MdlResult<u32> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_i32(&mut self) -> MdlResult<i32> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    pub fn read_f32(&mut self) -> MdlResult<f32> {
        Ok(LittleEndian::read_f32(self.take(4)?))
    }

    pub fn read_vec3(&mut self) -> MdlResult<Vec3> {
        let x = self.read_f32()?;
        let y = self.read_f32()?;
        let z = self.read_f32()?;
        Ok(Vec3::new(x, y, z))
    }

    /// Read a fixed-width, NUL padded name field.
    pub fn read_fixed_str(&mut self, n: usize) -> MdlResult<String> {
        Ok(c_string(self.take(n)?))
    }

    /// Read a NUL terminated string of at most `max` bytes.
    ///
    /// The terminator must appear inside the window; a string that runs off
    /// the end of the buffer is an overrun.
    pub fn read_cstr(&mut self, max: usize) -> MdlResult<String> {
        let window = &self.data[self.pos..];
        let window = &window[..window.len().min(max)];
        match window.iter().position(|&b| b == 0) {
            Some(len) => {
                let s = String::from_utf8_lossy(&window[..len]).into_owned();
                self.pos += (len + 1).min(max);
                Ok(s)
            }
            None => Err(MdlError::BufferOverrun {
                offset: self.position(),
                wanted: window.len() + 1,
                len: self.len(),
            }),
        }
    }

    /// The next four bytes, without consuming them.
    pub fn peek_magic(&self) -> MdlResult<[u8; 4]> {
        let mut copy = *self;
        let bytes = copy.take(4)?;
        Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

/// Decode a NUL padded byte field.
pub(crate) fn c_string(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
