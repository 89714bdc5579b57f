//! VML shape geometry.
//!
//! A VML `v:shape` (or `v:shapetype`) describes its outline with a `path`
//! attribute in its own coordinate space (`coordorigin`/`coordsize`),
//! parametrized by `adj` values and a list of `v:f` equations. This module
//! turns those attributes into the same enhanced geometry the binary
//! decoder produces.

pub mod formula;
pub mod path;

use crate::defaults::COORD_SPACE;
use crate::log::{debug, warn};
use crate::path::{EnhancedPath, resolve_modifiers};
use crate::shapes::EnhancedGeometry;
use crate::types::ViewBox;

pub use formula::{Equation, translate, translate_all};
pub use path::{VmlCommand, VmlPath, VmlPathParser, VmlToken, parse_vml_path, translate_vml_path};

/// Geometry attributes of a VML shape, borrowed from the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VmlShape<'a> {
    /// `path`
    pub path: &'a str,
    /// `coordorigin`, e.g. `"0,0"`
    pub coord_origin: Option<&'a str>,
    /// `coordsize`, e.g. `"21600,21600"`
    pub coord_size: Option<&'a str>,
    /// `adj`, e.g. `"5400,,10800"`
    pub adj: Option<&'a str>,
    /// `eqn` of each `v:f`, in document order
    pub formulas: Vec<&'a str>,
}

impl<'a> VmlShape<'a> {
    pub fn new(path: &'a str) -> Self {
        Self {
            path,
            ..Self::default()
        }
    }

    pub fn with_coords(mut self, origin: &'a str, size: &'a str) -> Self {
        self.coord_origin = Some(origin);
        self.coord_size = Some(size);
        self
    }

    pub fn with_adj(mut self, adj: &'a str) -> Self {
        self.adj = Some(adj);
        self
    }

    pub fn with_formula(mut self, eqn: &'a str) -> Self {
        self.formulas.push(eqn);
        self
    }
}

/// Split a comma list of numbers; empty slots are `None`.
fn number_list(text: &str) -> Vec<Option<f64>> {
    text.split(',')
        .map(|item| {
            let item = item.trim();
            if item.is_empty() {
                return None;
            }
            let parsed = item.parse::<f64>().ok();
            if parsed.is_none() {
                warn!(item, "ignoring non-numeric VML list item");
            }
            parsed
        })
        .collect()
}

fn pair(text: Option<&str>, default: (f64, f64)) -> (f64, f64) {
    let Some(text) = text else {
        return default;
    };
    let values = number_list(text);
    let at = |i: usize, d: f64| values.get(i).copied().flatten().unwrap_or(d);
    (at(0, default.0), at(1, default.1))
}

/// The coordinate space of the shape, from `coordorigin`/`coordsize`.
pub fn view_box(shape: &VmlShape<'_>) -> ViewBox {
    let (x, y) = pair(shape.coord_origin, (0.0, 0.0));
    let (mut w, mut h) = pair(shape.coord_size, (COORD_SPACE, COORD_SPACE));
    if !(w > 0.0 && w.is_finite()) {
        warn!(w, "non-positive coordsize width, using default");
        w = COORD_SPACE;
    }
    if !(h > 0.0 && h.is_finite()) {
        warn!(h, "non-positive coordsize height, using default");
        h = COORD_SPACE;
    }
    ViewBox::new(x, y, x + w, y + h)
}

/// Adjustment values from the `adj` attribute, merged over `defaults`.
pub fn modifiers(shape: &VmlShape<'_>, defaults: &[f64]) -> Vec<f64> {
    let explicit = shape.adj.map(number_list).unwrap_or_default();
    resolve_modifiers(&explicit, defaults)
}

/// Convert VML geometry attributes into enhanced geometry.
///
/// Equations from relative steps off symbolic points are appended after the
/// shape's own formulas.
pub fn convert_shape(shape: &VmlShape<'_>, default_modifiers: &[f64]) -> EnhancedGeometry {
    let first_synthetic = shape.formulas.len();
    let vml_path = translate_vml_path(shape.path, u32::try_from(first_synthetic).unwrap_or(u32::MAX));
    debug!(
        commands = vml_path.commands.len(),
        equations = first_synthetic,
        synthetic = vml_path.equations.len(),
        "converted VML shape"
    );

    let mut equations = translate_all(shape.formulas.iter().copied());
    equations.extend(
        vml_path
            .equations
            .into_iter()
            .enumerate()
            .map(|(i, formula)| Equation {
                name: format!("f{}", first_synthetic + i),
                formula,
            }),
    );

    let path = EnhancedPath::new(vml_path.commands, view_box(shape))
        .with_modifiers(modifiers(shape, default_modifiers));
    EnhancedGeometry::new(path).with_equations(equations)
}
