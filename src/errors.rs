//! Error types with rich diagnostics using miette
//!
//! None of these cross the public decoding entry points: the decoders log
//! them and fall back to partial output. They are exposed for readers that
//! want to validate records strictly.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

// ============================================================================
// Array Errors
// ============================================================================

/// Errors decoding an IMsoArray (vertex or segment property payload)
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ArrayError {
    #[error("array header truncated: need 6 bytes, got {len}")]
    #[diagnostic(code(odraw::array::truncated_header))]
    TruncatedHeader { len: usize },

    #[error("array declares {declared} elements but only {available} fit in the payload")]
    #[diagnostic(
        code(odraw::array::short_payload),
        help("the decoder keeps the {available} complete elements")
    )]
    ShortPayload { declared: usize, available: usize },

    #[error("unsupported vertex element width: {width} bytes")]
    #[diagnostic(
        code(odraw::array::unsupported_width),
        help("vertex elements are 2, 4 or 8 bytes wide")
    )]
    UnsupportedWidth { width: u16 },
}

// ============================================================================
// Formula Errors
// ============================================================================

/// Errors translating a VML `eqn` into an ODF formula
#[derive(Error, Diagnostic, Debug)]
pub enum FormulaError {
    #[error("invalid equation: {message}")]
    #[diagnostic(code(odraw::formula::syntax))]
    Syntax {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("unknown equation operation: {name}")]
    #[diagnostic(code(odraw::formula::unknown_operation))]
    UnknownOperation {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("not a VML operation")]
        span: SourceSpan,
    },

    #[error("`{op}` takes {expected} operands, got {got}")]
    #[diagnostic(code(odraw::formula::arity))]
    Arity {
        op: &'static str,
        expected: usize,
        got: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("operands")]
        span: SourceSpan,
    },

    #[error("unknown equation operand: {name}")]
    #[diagnostic(code(odraw::formula::unknown_operand))]
    UnknownOperand {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("not a VML value")]
        span: SourceSpan,
    },
}
