//! Integration tests for Layer 3: Runtime
//!
//! Tests building a project from its configuration file to a pack on disk.

mod build;
