//! # survey-core
//!
//! Core types, schema payloads, and error types for Survey.
//!
//! This crate provides the foundational types shared across all Survey crates:
//! - Entity structs for research projects, entities, and extractions
//! - Schema type, extraction status, and priority enums
//! - ID prefix constants
//! - Typed schema payloads parsed with defaults from opaque extraction data
//! - The `ExtractionStore` contract consumed by the analysis engine, plus an
//!   in-memory implementation
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod payload;
pub mod store;
