//! zodgen
//!
//! Dependency-ordered Zod schema generation from structural type graphs.
//!
//! ## Pipeline
//!
//! ```text
//! TypeGraph ──► reference extraction ──► cycle analysis (Tarjan SCC)
//!                                               │
//!            enums, declaration order           ▼
//!                      │              emission scheduling
//!                      ▼              (condensation + toposort)
//!                ┌───────────────────────────┐
//!                │       schema emitter      │──► ordered declarations
//!                └───────────────────────────┘
//! ```
//!
//! Enums are emitted first; objects follow in an order where every
//! declaration only refers to names already defined, except within a
//! reference cycle, whose members are emitted as deferred `z.lazy`
//! declarations. One invocation performs one full analysis and one full
//! emission; nothing persists across passes.

pub mod codegen;
pub mod error;
pub mod graph;

pub use codegen::{generate, render_module, Declaration, EmitOptions, NamingConfig};
pub use error::{CodegenError, Result};
pub use graph::{GraphBuilder, NodeId, PrimitiveKind, Property, TypeGraph, TypeNode};
