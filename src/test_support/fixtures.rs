//! Canned declaration sets shared by tests.

use crate::core::{ComponentDeclaration, ComponentId, Phase};

use super::component;

/// A small compiler pipeline: phases `parse -> check -> emit`, with
/// components attached to them and to each other's capabilities.
pub fn compiler_pipeline() -> (Vec<Phase>, Vec<ComponentDeclaration<ComponentId>>) {
    let phases = vec![
        Phase::new("parse").runs_before(["check"]),
        Phase::new("check").runs_before(["emit"]),
        Phase::new("emit"),
    ];
    let components = vec![
        component("lexer", &["tokens"], &["parse"], &[]),
        component("parser", &["ast"], &["check"], &["parse", "tokens"]),
        component("resolver", &["names"], &[], &["ast"]),
        component("typeck", &["types"], &["emit"], &["check", "names"]),
        component("codegen", &["object"], &[], &["emit", "types"]),
        component("linker", &["binary"], &[], &["object"]),
        component("stats", &["stats"], &[], &["*"]),
    ];
    (phases, components)
}

/// Ordering constraints every valid chain of [`compiler_pipeline`] satisfies.
pub const COMPILER_PIPELINE_ORDER: &[(&str, &str)] = &[
    ("lexer", "parser"),
    ("parser", "resolver"),
    ("resolver", "typeck"),
    ("typeck", "codegen"),
    ("codegen", "linker"),
    ("linker", "stats"),
];

/// Manifest text for [`compiler_pipeline`].
pub const COMPILER_PIPELINE_MANIFEST: &str = r#"
[[phase]]
name = "parse"
before = ["check"]

[[phase]]
name = "check"
before = ["emit"]

[[phase]]
name = "emit"

[[component]]
id = "lexer"
provides = ["tokens"]
before = ["parse"]

[[component]]
id = "parser"
provides = ["ast"]
before = ["check"]
after = ["parse", "tokens"]

[[component]]
id = "resolver"
provides = ["names"]
after = ["ast"]

[[component]]
id = "typeck"
provides = ["types"]
before = ["emit"]
after = ["check", "names"]

[[component]]
id = "codegen"
provides = ["object"]
after = ["emit", "types"]

[[component]]
id = "linker"
provides = ["binary"]
after = ["object"]

[[component]]
id = "stats"
provides = ["stats"]
after = ["*"]
"#;

/// Two components that each wait for the other.
pub const CYCLIC_MANIFEST: &str = r#"
[[component]]
id = "audit"
provides = ["audit"]
after = ["persist"]

[[component]]
id = "store"
provides = ["persist"]
after = ["audit"]
"#;
