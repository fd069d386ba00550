//! A small source tree shaped like a Closure Library project.

use crate::core::SourceUnit;
use crate::test_support::{moocher, runtime_base, unit};

/// Units with well-known relationships:
///
/// - `base.js` is the runtime base (provides `goog`)
/// - `source1 <- source2 <- source3` is a chain on top of `goog`
/// - `providesSource3.js` clashes with `source3.js`
/// - `moocher.js` requires `goog` and provides nothing
/// - `cycle1 -> cycle3 -> cycle2 -> cycle1`
#[derive(Debug, Clone)]
pub struct ClosureFixture {
    pub base_js: SourceUnit,
    pub source1: SourceUnit,
    pub source2: SourceUnit,
    pub source3: SourceUnit,
    pub provides_source3: SourceUnit,
    pub moocher: SourceUnit,
    pub cycle1: SourceUnit,
    pub cycle2: SourceUnit,
    pub cycle3: SourceUnit,
}

impl ClosureFixture {
    pub fn new() -> Self {
        ClosureFixture {
            base_js: runtime_base("base.js"),
            source1: unit("source1.js", &["source1"], &["goog"]),
            source2: unit("source2.js", &["source2"], &["source1"]),
            source3: unit("source3.js", &["source3"], &["source2"]),
            provides_source3: unit("providesSource3.js", &["source3"], &[]),
            moocher: moocher("moocher.js", &["goog"]),
            cycle1: unit("cycle1.js", &["cycle1"], &["cycle3"]),
            cycle2: unit("cycle2.js", &["cycle2"], &["cycle1"]),
            cycle3: unit("cycle3.js", &["cycle3"], &["cycle2"]),
        }
    }
}

impl Default for ClosureFixture {
    fn default() -> Self {
        Self::new()
    }
}
