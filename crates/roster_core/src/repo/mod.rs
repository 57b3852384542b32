//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract for student records.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Check-then-act sequences (duplicate id, email conflict, missing row)
//!   run inside a single immediate transaction.
//! - Repository APIs return semantic errors (`DuplicateId`, `EmailInUse`,
//!   `NotFound`) in addition to DB transport errors.

pub mod student_repo;
