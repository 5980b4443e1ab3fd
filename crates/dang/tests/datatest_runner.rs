//! File-driven fixture tests.
//!
//! Every `tests/scripts/*.dang` file becomes one test case. The first line
//! of a fixture is a directive comment stating the expectation:
//!
//! - `// ret=<display>`: the program evaluates to a value whose display
//!   form matches exactly.
//! - `// err=<substring>`: evaluation fails with a diagnostic containing
//!   the substring.

use std::{fs, path::Path};

use dang::evaluate;

fn run_fixture(path: &Path) -> datatest_stable::Result<()> {
    let source = fs::read_to_string(path)?;
    let directive = source.lines().next().unwrap_or_default();

    if let Some(expected) = directive.strip_prefix("// ret=") {
        let value = evaluate(&source).map_err(|err| format!("expected `{expected}`, got error: {err}"))?;
        if value.to_string() != expected {
            return Err(format!("expected `{expected}`, got `{value}`").into());
        }
    } else if let Some(expected) = directive.strip_prefix("// err=") {
        match evaluate(&source) {
            Ok(value) => return Err(format!("expected error containing `{expected}`, got `{value}`").into()),
            Err(err) => {
                let rendered = err.to_string();
                if !rendered.contains(expected) {
                    return Err(format!("expected error containing `{expected}`, got `{rendered}`").into());
                }
            }
        }
    } else {
        return Err("fixture must start with a `// ret=` or `// err=` directive".into());
    }

    Ok(())
}

datatest_stable::harness!(run_fixture, "tests/scripts", r"^.*\.dang$");
