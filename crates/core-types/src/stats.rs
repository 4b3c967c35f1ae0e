//! Records returned by the statistics queries.
//!
//! Each struct maps one row of its query (`FromRow`, snake_case column aliases)
//! and serializes to the camelCase JSON the API exposes. Decimal values are
//! written as JSON numbers.

use crate::enums::GradeBin;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Aggregates for a single course over one academic year.
///
/// A course without grades reports zero for every metric. An unknown course id
/// is reported the same way, with a null code and name.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseStats {
    pub course_code: Option<String>,
    pub course_name: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_grade: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub min_grade: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub max_grade: Decimal,
    pub total_students: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub success_rate: Decimal,
}

/// Credit-weighted results of one student for one semester.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SemesterStats {
    pub semester: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_grade: Decimal,
    pub total_credits: i64,
    /// Credits of the courses graded at or above the passing grade.
    pub validated_credits: i64,
    pub courses_count: i64,
}

/// Year-wide aggregates across every course.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    #[serde(with = "rust_decimal::serde::float")]
    pub global_average: Decimal,
    pub total_students: i64,
    /// Distinct courses graded that year. Earlier releases reported the distinct
    /// student count under this name; the new meaning awaits product owner sign-off.
    pub total_courses: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_success_rate: Decimal,
}

/// A student's average for one (year, semester) period and its change from the
/// period before.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStats {
    pub academic_year: String,
    pub semester: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub semester_average: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub previous_semester_average: Option<Decimal>,
    /// Zero for the first period.
    #[serde(with = "rust_decimal::serde::float")]
    pub progression: Decimal,
}

/// One non-empty bin of a course's grade histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GradeDistribution {
    pub range: GradeBin,
    pub count: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub percentage: Decimal,
}

/// Results of one course taught by a teacher.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherCourseStats {
    pub course_id: i32,
    pub course_name: String,
    pub student_count: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_grade: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub success_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub median_grade: Decimal,
}

/// A course's results for a semester compared with the same semester of the
/// previous academic year. Previous values and differences are null when the
/// course has no grades that year.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SemesterComparison {
    pub course_id: i32,
    pub course_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_average: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub previous_average: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub average_difference: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_success_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub previous_success_rate: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub success_rate_difference: Option<Decimal>,
}
