//! VML path fixtures: each `.vml` file under `tests/vml` holds a path
//! attribute, a `---` separator line, and the expected enhanced path.

use datatest_stable::Utf8Path;
use odraw_shapes::parse_vml_path;
use odraw_shapes::path::path_string;

fn split_fixture(content: &str) -> Option<(&str, &str)> {
    let (source, expected) = content.split_once("\n---\n")?;
    Some((source.trim(), expected.trim()))
}

fn check_fixture(path: &Utf8Path) -> datatest_stable::Result<()> {
    let content = std::fs::read_to_string(path)?;
    let Some((source, expected)) = split_fixture(&content) else {
        return Err(format!("{path}: missing `---` separator").into());
    };

    let actual = path_string(&parse_vml_path(source).commands);
    if actual != expected {
        let mut diff = String::new();
        for chunk in dissimilar::diff(expected, &actual) {
            match chunk {
                dissimilar::Chunk::Equal(s) => diff.push_str(s),
                dissimilar::Chunk::Delete(s) => diff.push_str(&format!("[-{s}-]")),
                dissimilar::Chunk::Insert(s) => diff.push_str(&format!("{{+{s}+}}")),
            }
        }
        return Err(format!(
            "{path}: path mismatch\n  source:   {source}\n  expected: {expected}\n  actual:   {actual}\n  diff:     {diff}"
        )
        .into());
    }
    Ok(())
}

datatest_stable::harness! {
    { test = check_fixture, root = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/vml"), pattern = r"\.vml$" },
}
