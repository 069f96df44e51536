//! Binary EPS native-header decoding.
//!
//! A binary-flavored EPS file starts with a fixed-layout header: a 4-byte
//! magic signature followed by little-endian u32 offset/size pairs locating
//! embedded preview images (a TIFF raster and/or a WMF vector). Operates on
//! slices; pure functions, no allocation.

use std::fmt;

/// Native-header magic signature, read big-endian from bytes [0,4).
pub const NATIVE_SIGNATURE: u32 = 0xC5D0_D3C6;

/// Embedded preview image kinds carried by the native header.
///
/// Each variant is statically bound to the header location of its
/// offset field; the size field always sits 4 bytes after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreviewKind {
    Tiff,
    Wmf,
}

impl PreviewKind {
    /// Extraction order matches the original tool: TIFF first, then WMF.
    pub const ALL: [PreviewKind; 2] = [PreviewKind::Tiff, PreviewKind::Wmf];

    /// Header location of the u32 LE offset field for this kind.
    pub const fn offset_field(self) -> usize {
        match self {
            PreviewKind::Tiff => 20,
            PreviewKind::Wmf => 12,
        }
    }

    /// Header location of the u32 LE size field for this kind.
    pub const fn size_field(self) -> usize {
        self.offset_field() + 4
    }

    /// File extension used for extracted previews of this kind.
    pub const fn extension(self) -> &'static str {
        match self {
            PreviewKind::Tiff => "tiff",
            PreviewKind::Wmf => "wmf",
        }
    }
}

impl fmt::Display for PreviewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A contiguous byte range `[start, start + len)` within a source buffer,
/// holding one embedded preview's raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewRegion {
    pub start: usize,
    pub len: usize,
}

impl PreviewRegion {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// The region's bytes. Only valid for the buffer the region was
    /// extracted from; `extract_region` guarantees the range is in bounds.
    pub fn slice<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        &data[self.start..self.end()]
    }
}

/// Why a preview's header fields could not describe a usable region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorruptHeader {
    /// The file carries the signature but is too short to hold the
    /// offset/size field pair.
    TruncatedFields,
    /// The declared region extends past the end of the file.
    OutOfBounds { offset: u32, size: u32 },
}

impl fmt::Display for CorruptHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorruptHeader::TruncatedFields => {
                write!(f, "header too short to hold the preview pointer fields")
            }
            CorruptHeader::OutOfBounds { offset, size } => write!(
                f,
                "declared region [{}, {}) lies outside the file",
                offset,
                *offset as u64 + *size as u64
            ),
        }
    }
}

/// Result of looking up one preview kind in the native header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionOutcome {
    /// A preview of this kind is embedded at the contained region.
    Present(PreviewRegion),
    /// Offset or size field is zero: no preview of this kind. Not an error.
    Absent,
    /// The fields are unusable; nothing should be extracted for this kind.
    Corrupt(CorruptHeader),
}

#[inline]
fn read_u32_be(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

#[inline]
fn read_u32_le(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Whether the buffer starts with the binary EPS native-header signature.
///
/// Buffers shorter than 4 bytes are simply "no header".
pub fn has_native_header(data: &[u8]) -> bool {
    read_u32_be(data, 0) == Some(NATIVE_SIGNATURE)
}

/// Locate the embedded preview of `kind` in a buffer that carries the
/// native header.
///
/// Reads the kind's offset and size fields (u32 LE) and validates them
/// against the buffer length. A zero offset or size means the preview is
/// absent. Fields describing a range outside the buffer are reported as
/// corrupt rather than truncated to fit.
///
/// Pure function of its inputs; the `Tiff` and `Wmf` lookups are fully
/// independent of each other.
pub fn extract_region(data: &[u8], kind: PreviewKind) -> RegionOutcome {
    let (Some(offset), Some(size)) = (
        read_u32_le(data, kind.offset_field()),
        read_u32_le(data, kind.size_field()),
    ) else {
        return RegionOutcome::Corrupt(CorruptHeader::TruncatedFields);
    };

    if offset == 0 || size == 0 {
        return RegionOutcome::Absent;
    }

    // Validate in u64 so offset + size cannot wrap.
    if offset as u64 + size as u64 > data.len() as u64 {
        return RegionOutcome::Corrupt(CorruptHeader::OutOfBounds { offset, size });
    }

    RegionOutcome::Present(PreviewRegion {
        start: offset as usize,
        len: size as usize,
    })
}
