//! Java source model: syntax tree, builders and serializer.

pub mod ast;
pub mod builder;
pub mod codegen;
pub mod imports;

pub use ast::{CompilationUnit, Modifier};
pub use codegen::render_unit;
