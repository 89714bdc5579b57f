//! Decoder for legacy Office drawing shapes.
//!
//! Takes shape records from the MS-ODRAW binary format (shape type, anchor
//! rect, flips, rotation, adjustment values, and for custom shapes packed
//! vertex/segment arrays) or VML geometry attributes, and produces ODF
//! drawing elements with `draw:enhanced-geometry` paths.
//!
//! ```
//! use odraw_shapes::{DecodeOptions, ElementTree, Rect, ShapeRecord, decode, emit};
//!
//! let record = ShapeRecord::new(1, Rect::new(0.0, 0.0, 100.0, 50.0));
//! let mut tree = ElementTree::new();
//! emit(&decode(&record), &DecodeOptions::default(), &mut tree);
//! assert_eq!(
//!     tree.to_string(),
//!     "<draw:rect svg:width=\"100\" svg:height=\"50\" svg:x=\"0\" svg:y=\"0\"/>\n"
//! );
//! ```
//!
//! Decoding never fails. Malformed input yields partial geometry, and shapes
//! that cannot be drawn come back as [`DecodeOutcome::Unhandled`]. Enable
//! the `tracing` feature to see what was skipped and why.

mod log;

pub mod binary;
pub mod defaults;
pub mod errors;
pub mod options;
pub mod path;
pub mod record;
pub mod shape_type;
pub mod shapes;
pub mod transform;
pub mod types;
pub mod vml;
pub mod writer;

pub use binary::{Segment, decode_complex_path, decode_segments};
pub use errors::{ArrayError, FormulaError};
pub use options::{DecodeOptions, LengthUnit, UnitScale};
pub use path::{Coord, EnhancedPath, PathCommand, PathPoint, resolve_modifiers};
pub use record::{AdjustValues, ComplexGeometry, ElementWidth, MsoArray, ShapeRecord};
pub use shape_type::ShapeType;
pub use shapes::{
    CustomShape, DecodeOutcome, EnhancedGeometry, StandardKind, StandardShape, UnhandledReason,
    UnhandledShape, decode, dispatch,
};
pub use transform::{Frame, adjust_rect_for_rotation, normalize_rotation};
pub use types::{NormalizedAngle, NumericError, Rect, ViewBox};
pub use vml::{VmlPath, VmlShape, convert_shape, parse_vml_path};
pub use writer::{Element, ElementTree, VectorWriter, emit};
