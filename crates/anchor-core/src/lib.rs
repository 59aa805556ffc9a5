pub mod geometry;
pub mod id;
pub mod lint;
pub mod model;
pub mod parser;
pub mod store;
pub mod surface;
pub mod xml;

pub use geometry::{Point, PointerEvent, Rect, Viewport, contains_point, pointer_position};
pub use id::{UnitId, WordId};
pub use lint::{LintDiagnostic, LintSeverity, lint_document};
pub use model::{Level, ModelError, TextDocument, TextUnit};
pub use parser::{DocumentSchema, ElementMatch, parse_document, parse_document_with};
pub use store::{Anchor, AnchorStore, ValidationResult};
pub use surface::TextSurface;
pub use xml::ParseError;

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
