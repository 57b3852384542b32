//! Domain model for student records.
//!
//! # Responsibility
//! - Define the canonical record persisted in the `students` table.
//! - Own the field-format validators applied to raw console input.
//!
//! # Invariants
//! - `id` uniquely identifies a record and never changes after creation.
//! - Raw input models keep absent fields distinguishable from blank ones.

pub mod student;
