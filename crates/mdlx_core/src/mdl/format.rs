use super::error::{MdlError, MdlResult};

/// MDL sub-format, selected by the four-byte magic word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Subformat {
    /// Quake 1 `IDPO`
    Quake1,
    /// 3D GameStudio `MDL2` to `MDL6`; holds the version digit
    GameStudio(u8),
    /// 3D GameStudio A7 `MDL7`
    GameStudio7,
    /// Half-Life 2 / CS:S `IDST` or `IDSQ`
    HalfLife2,
}

impl Subformat {
    /// Identify the format from its magic word.
    ///
    /// Both byte orders of each tag are accepted.
    pub fn detect(magic: [u8; 4]) -> MdlResult<Self> {
        let reversed = [magic[3], magic[2], magic[1], magic[0]];
        for tag in [magic, reversed] {
            let format = match &tag {
                b"IDPO" => Some(Subformat::Quake1),
                b"MDL2" => Some(Subformat::GameStudio(2)),
                b"MDL3" => Some(Subformat::GameStudio(3)),
                b"MDL4" => Some(Subformat::GameStudio(4)),
                b"MDL5" => Some(Subformat::GameStudio(5)),
                b"MDL6" => Some(Subformat::GameStudio(6)),
                b"MDL7" => Some(Subformat::GameStudio7),
                b"IDST" | b"IDSQ" => Some(Subformat::HalfLife2),
                _ => None,
            };
            if let Some(format) = format {
                return Ok(format);
            }
        }

        let printable: String = magic.iter().map(|&b| b as char).collect();
        Err(MdlError::UnknownSubformat(printable))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Subformat::Quake1 => "IDPO",
            Subformat::GameStudio(2) => "MDL2",
            Subformat::GameStudio(3) => "MDL3",
            Subformat::GameStudio(4) => "MDL4",
            Subformat::GameStudio(5) => "MDL5",
            Subformat::GameStudio(_) => "MDL6",
            Subformat::GameStudio7 => "MDL7",
            Subformat::HalfLife2 => "IDST",
        }
    }

    /// Human readable description, used in log output.
    pub fn description(&self) -> &'static str {
        match self {
            Subformat::Quake1 => "Quake 1, magic word is IDPO",
            Subformat::GameStudio(2) | Subformat::GameStudio(3) => "3D GameStudio A4",
            Subformat::GameStudio(4) | Subformat::GameStudio(5) => "3D GameStudio A5",
            Subformat::GameStudio(_) => "3D GameStudio A6",
            Subformat::GameStudio7 => "3D GameStudio A7, magic word is MDL7",
            Subformat::HalfLife2 => "CS:S/HL2, magic word is IDST/IDSQ",
        }
    }
}
