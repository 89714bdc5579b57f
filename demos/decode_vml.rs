//! Convert a VML shape and a couple of binary shape records, printing the
//! ODF elements they produce.
//!
//! Run with `RUST_LOG=debug cargo run --example decode_vml --features tracing`
//! to see the decoder's trace output.

use odraw_shapes::vml::translate;
use odraw_shapes::writer::emit_custom_geometry;
use odraw_shapes::{
    DecodeOptions, ElementTree, Frame, Rect, ShapeRecord, VmlShape, convert_shape, decode, emit,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let options = DecodeOptions::default();
    let mut tree = ElementTree::new();

    // A pentagon-ish arrow drawn by VML path and formulas
    let arrow = VmlShape::new("m @0,0 l 21600,10800 @0,21600 @0,@2 0,@2 0,@1 @0,@1 x e")
        .with_adj("16200,5400")
        .with_formula("val #0")
        .with_formula("val #1")
        .with_formula("sum 21600 0 #1");
    let geometry = convert_shape(&arrow, &[]);
    emit_custom_geometry(
        &geometry,
        &Frame::new(Rect::new(0.0, 0.0, 200.0, 100.0)),
        &options,
        &mut tree,
    );

    let rotated = ShapeRecord::new(2, Rect::new(0.0, 150.0, 200.0, 100.0))
        .with_rotation(30.0)
        .with_adjust(0, 2700);
    emit(&decode(&rotated), &options, &mut tree);

    let connector = ShapeRecord::new(34, Rect::new(250.0, 0.0, 100.0, 250.0)).with_flip(true, false);
    emit(&decode(&connector), &options, &mut tree);

    print!("{tree}");

    // Formula errors carry a span into the equation text
    if let Err(e) = translate("sum #0 @1 2 3") {
        eprintln!("{:?}", miette::Report::new(e));
    }
}
