//! Manifest and dependency tree fixtures.

/// A release manifest exercising every dependency kind.
pub const WIDGET_MANIFEST: &str = r#"
[package]
name = "widget"
version = "1.2.0"
description = "Widgets for everyone"
license = "Apache-2.0"
authors = ["Ada"]
flix = "0.40.0"

[dependencies]
"github:globex/sprockets" = "2.0.0"
"github:acme/gears" = "0.3.1"

[mvn-dependencies]
"org.json:json" = "20240303"
"#;

/// A manifest with a dependency key of an unsupported host.
pub const UNKNOWN_DEPENDENCY_MANIFEST: &str = r#"
[package]
name = "widget"
version = "1.2.0"

[dependencies]
"gitlab:acme/gears" = "0.3.1"
"#;

/// A resolved forest: widget (fpkg) -> gears (fpkg) -> json (jar),
/// plus a top-level jar-only commons-lang.
pub const RESOLVED_FOREST_JSON: &str = r#"[
  {
    "module": {"group": "io.github.acme", "name": "widget", "version": "1.2.0"},
    "artifacts": [{"extension": "fpkg"}],
    "children": [
      {
        "module": {"group": "io.github.acme", "name": "gears", "version": "0.3.1"},
        "artifacts": [{"extension": "fpkg"}],
        "children": [
          {
            "module": {"group": "org.json", "name": "json", "version": "20240303"},
            "artifacts": [{"extension": "jar"}]
          }
        ]
      }
    ]
  },
  {
    "module": {"group": "org.apache.commons", "name": "commons-lang3", "version": "3.14.0"},
    "artifacts": [{"extension": "jar"}]
  }
]"#;
