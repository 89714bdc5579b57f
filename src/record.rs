//! Shape records handed over by the document reader.
//!
//! A record borrows the reader's property buffers; nothing here copies the
//! vertex or segment payloads.

use crate::defaults::{AUTO_ELEMENT_WIDTH, MAX_ADJUST_VALUES, MSO_ARRAY_HEADER_LEN};
use crate::errors::ArrayError;
use crate::log::warn;
use crate::types::Rect;

/// Bytes per array element, as declared by `cbElem`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementWidth {
    Fixed(u16),
    /// The `0xFFF0` sentinel: the property decides (vertices are then 4 bytes)
    Auto,
}

/// How one vertex coordinate pair is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateWidth {
    /// Two unsigned bytes
    U8,
    /// Two little-endian `i16`
    I16,
    /// Two little-endian `i32`
    I32,
}

impl CoordinateWidth {
    pub fn stride(self) -> usize {
        match self {
            CoordinateWidth::U8 => 2,
            CoordinateWidth::I16 => 4,
            CoordinateWidth::I32 => 8,
        }
    }

    /// Read the pair at the start of `bytes`, which must be at least `stride()` long.
    fn read(self, bytes: &[u8]) -> Option<(i32, i32)> {
        match self {
            CoordinateWidth::U8 => Some((*bytes.first()? as i32, *bytes.get(1)? as i32)),
            CoordinateWidth::I16 => {
                let x = i16::from_le_bytes([*bytes.first()?, *bytes.get(1)?]);
                let y = i16::from_le_bytes([*bytes.get(2)?, *bytes.get(3)?]);
                Some((x as i32, y as i32))
            }
            CoordinateWidth::I32 => {
                let x = i32::from_le_bytes(bytes.get(0..4)?.try_into().ok()?);
                let y = i32::from_le_bytes(bytes.get(4..8)?.try_into().ok()?);
                Some((x, y))
            }
        }
    }
}

impl ElementWidth {
    pub fn from_cb_elem(cb_elem: u16) -> Self {
        if cb_elem == AUTO_ELEMENT_WIDTH {
            ElementWidth::Auto
        } else {
            ElementWidth::Fixed(cb_elem)
        }
    }

    /// Layout of a vertex element of this width.
    pub fn coordinate_width(self) -> Result<CoordinateWidth, ArrayError> {
        match self {
            ElementWidth::Auto | ElementWidth::Fixed(4) => Ok(CoordinateWidth::I16),
            ElementWidth::Fixed(8) => Ok(CoordinateWidth::I32),
            ElementWidth::Fixed(2) => Ok(CoordinateWidth::U8),
            ElementWidth::Fixed(width) => Err(ArrayError::UnsupportedWidth { width }),
        }
    }

    /// Stride of a segment element. Segment words are 16 bits; wider
    /// elements carry the word in their first two bytes.
    pub fn segment_stride(self) -> usize {
        match self {
            ElementWidth::Auto => 2,
            ElementWidth::Fixed(width) => (width as usize).max(2),
        }
    }
}

/// An IMsoArray payload: `count` elements of `width` bytes each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MsoArray<'a> {
    /// `nElems` as declared; may exceed what the payload holds
    pub count: u16,
    pub width: ElementWidth,
    pub data: &'a [u8],
}

impl<'a> MsoArray<'a> {
    pub fn new(data: &'a [u8], width: ElementWidth, count: u16) -> Self {
        Self { count, width, data }
    }

    pub fn empty() -> Self {
        Self::new(&[], ElementWidth::Auto, 0)
    }

    /// Decode the 6-byte header (`nElems`, `nElemsAlloc`, `cbElem`, all
    /// little-endian `u16`) and borrow the payload that follows it.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, ArrayError> {
        if bytes.len() < MSO_ARRAY_HEADER_LEN {
            return Err(ArrayError::TruncatedHeader { len: bytes.len() });
        }
        let count = u16::from_le_bytes([bytes[0], bytes[1]]);
        // bytes 2..4 hold nElemsAlloc, which only matters to writers
        let cb_elem = u16::from_le_bytes([bytes[4], bytes[5]]);
        Ok(Self::new(
            &bytes[MSO_ARRAY_HEADER_LEN..],
            ElementWidth::from_cb_elem(cb_elem),
            count,
        ))
    }

    /// Number of complete elements of `stride` bytes actually available,
    /// never more than the declared count.
    pub fn available(&self, stride: usize) -> usize {
        if stride == 0 {
            return 0;
        }
        (self.count as usize).min(self.data.len() / stride)
    }

    /// Check that the payload holds every declared element.
    pub fn check(&self, stride: usize) -> Result<(), ArrayError> {
        let available = self.available(stride);
        if available < self.count as usize {
            return Err(ArrayError::ShortPayload {
                declared: self.count as usize,
                available,
            });
        }
        Ok(())
    }

    /// Decode the vertex pairs. Declared elements missing from the payload
    /// are dropped; the returned list only holds complete elements.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub fn vertices(&self) -> Result<Vec<(i32, i32)>, ArrayError> {
        let layout = self.width.coordinate_width()?;
        let stride = layout.stride();
        if let Err(e) = self.check(stride) {
            warn!(error = %e, "truncated vertex array");
        }
        Ok(self
            .data
            .chunks_exact(stride)
            .take(self.available(stride))
            .filter_map(|chunk| layout.read(chunk))
            .collect())
    }

    /// Decode the 16-bit segment words.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub fn segment_words(&self) -> Vec<u16> {
        let stride = self.width.segment_stride();
        if let Err(e) = self.check(stride) {
            warn!(error = %e, "truncated segment array");
        }
        self.data
            .chunks_exact(stride)
            .take(self.available(stride))
            .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
            .collect()
    }
}

/// The custom-geometry properties of a "NotPrimitive" shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplexGeometry<'a> {
    /// `pVertices`
    pub vertices: MsoArray<'a>,
    /// `pSegmentInfo`
    pub segments: MsoArray<'a>,
    /// `geoLeft`/`geoTop`/`geoRight`/`geoBottom`, used as the view box when
    /// no vertex is decoded
    pub geo_rect: Option<Rect>,
}

impl<'a> ComplexGeometry<'a> {
    pub fn new(vertices: MsoArray<'a>, segments: MsoArray<'a>) -> Self {
        Self {
            vertices,
            segments,
            geo_rect: None,
        }
    }

    pub fn with_geo_rect(mut self, rect: Rect) -> Self {
        self.geo_rect = Some(rect);
        self
    }
}

/// The `adjustValue` … `adjust8Value` properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdjustValues([Option<i32>; MAX_ADJUST_VALUES]);

impl AdjustValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set slot `index` (0-based). Indexes past the last slot are ignored.
    pub fn set(&mut self, index: usize, value: i32) {
        match self.0.get_mut(index) {
            Some(slot) => *slot = Some(value),
            None => {
                warn!(index, "adjust value index out of range");
            }
        }
    }

    pub fn get(&self, index: usize) -> Option<i32> {
        self.0.get(index).copied().flatten()
    }

    pub fn as_f64(&self) -> [Option<f64>; MAX_ADJUST_VALUES] {
        self.0.map(|v| v.map(f64::from))
    }

    /// Explicit value of slot `index`, else `default`.
    pub fn value_or(&self, index: usize, default: f64) -> f64 {
        self.get(index).map_or(default, f64::from)
    }
}

/// One drawn object as read from the document.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeRecord<'a> {
    /// MSOSPT code; unknown values are tolerated
    pub shape_type: i32,
    /// Anchor rectangle in the reader's abstract units
    pub bounds: Rect,
    pub flip_h: bool,
    pub flip_v: bool,
    /// Clockwise rotation in degrees, any range
    pub rotation: f64,
    pub complex: Option<ComplexGeometry<'a>>,
    pub adjust: AdjustValues,
}

impl<'a> ShapeRecord<'a> {
    pub fn new(shape_type: i32, bounds: Rect) -> Self {
        Self {
            shape_type,
            bounds,
            flip_h: false,
            flip_v: false,
            rotation: 0.0,
            complex: None,
            adjust: AdjustValues::new(),
        }
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_flip(mut self, horizontal: bool, vertical: bool) -> Self {
        self.flip_h = horizontal;
        self.flip_v = vertical;
        self
    }

    pub fn with_complex(mut self, complex: ComplexGeometry<'a>) -> Self {
        self.complex = Some(complex);
        self
    }

    pub fn with_adjust(mut self, index: usize, value: i32) -> Self {
        self.adjust.set(index, value);
        self
    }
}
