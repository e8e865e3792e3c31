//! erdkit - Entity-Relationship Diagram editing core
//!
//! A command-driven document model for ER diagrams with undo/redo and
//! fine-grained change notification, plus SQL DDL and object code generation.

pub mod core;
