//! # Grade Statistics Core Types
//!
//! The shared vocabulary of the workspace: the filters a statistics request is
//! scoped by, the fixed grading rules, and the records every query returns.
//!
//! ## Architectural Principles
//!
//! - **Layer 0:** This crate has no knowledge of HTTP or of the connection pool.
//!   The `database` and `web-server` crates both depend on it.
//! - **Validated Filters:** `AcademicYear` and `Semester` can only be built from
//!   valid values, so a query never receives a malformed filter.
//!
//! ## Public API
//!
//! - `AcademicYear`, `Semester`: request filters.
//! - `GradeBin`, `PASSING_GRADE`: grading rules shared by the queries.
//! - `CourseStats`, `SemesterStats`, ... : one record type per statistics endpoint.

pub mod academic;
pub mod enums;
pub mod error;
pub mod stats;

// Re-export the core types to provide a clean public API.
pub use academic::{AcademicYear, Semester};
pub use enums::{GradeBin, PASSING_GRADE};
pub use error::CoreError;
pub use stats::{
    CourseStats, GlobalStats, GradeDistribution, ProgressStats, SemesterComparison, SemesterStats,
    TeacherCourseStats,
};
