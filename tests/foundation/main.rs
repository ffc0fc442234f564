//! Integration tests for Layer 0: Foundation
//!
//! Tests for diagnostics, emitted functions, the private function
//! registry, and the data pack aggregate.

mod datapack;
mod errors;
mod registry;
