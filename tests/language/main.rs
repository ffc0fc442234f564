//! Integration tests for Layer 1: Language
//!
//! Tests for the tokenizer, argument lists, score references, and
//! condition rendering.

mod arguments;
mod conditions;
mod tokenizer;
