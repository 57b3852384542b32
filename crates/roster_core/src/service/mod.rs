//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation and repository calls into operation-level APIs.
//! - Keep the console layer decoupled from storage details.

pub mod student_service;
