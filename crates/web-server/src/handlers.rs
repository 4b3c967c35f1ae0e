use crate::error::{AppError, ErrorBody, StatsOperation};
use crate::AppState;
use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use core_types::{
    AcademicYear, CourseStats, GlobalStats, GradeDistribution, ProgressStats, Semester,
    SemesterComparison, SemesterStats, TeacherCourseStats,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

// Extractors are taken as `Result`s so that a malformed identifier or filter is
// reported like any other statistics failure instead of axum's plain-text 400.

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct YearFilter {
    /// Academic year, e.g. 2024.
    #[param(value_type = String, example = "2024")]
    pub academic_year: AcademicYear,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ComparisonFilter {
    /// Academic year compared with the one before it.
    #[param(value_type = String, example = "2024")]
    pub academic_year: AcademicYear,
    #[param(value_type = i32, example = 1, minimum = 1)]
    pub semester: Semester,
}

fn path_id(
    operation: StatsOperation,
    path: Result<Path<i32>, PathRejection>,
) -> Result<i32, AppError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| AppError::malformed(operation, rejection))
}

fn year_filter(
    operation: StatsOperation,
    query: Result<Query<YearFilter>, QueryRejection>,
) -> Result<AcademicYear, AppError> {
    query
        .map(|Query(filter)| filter.academic_year)
        .map_err(|rejection| AppError::malformed(operation, rejection))
}

/// # GET /stats/courses/:course_id
/// Average, extremes, grade count and success rate of a course. Unknown course
/// ids answer with zeroes and a null code and name.
#[utoipa::path(
    get,
    path = "/stats/courses/{courseId}",
    tag = "Statistics",
    params(("courseId" = i32, Path, description = "Course identifier"), YearFilter),
    responses(
        (status = 200, description = "Course statistics", body = CourseStats),
        (status = 500, description = "Statistics failure", body = ErrorBody)
    )
)]
pub async fn get_course_stats(
    State(state): State<Arc<AppState>>,
    course_id: Result<Path<i32>, PathRejection>,
    filter: Result<Query<YearFilter>, QueryRejection>,
) -> Result<Json<CourseStats>, AppError> {
    let operation = StatsOperation::CourseStats;
    let course_id = path_id(operation, course_id)?;
    let academic_year = year_filter(operation, filter)?;

    let stats = state
        .stats
        .course_stats(course_id, academic_year)
        .await
        .map_err(|e| AppError::stats(operation, e))?;
    Ok(Json(stats))
}

/// # GET /stats/students/:student_id/semesters
#[utoipa::path(
    get,
    path = "/stats/students/{studentId}/semesters",
    tag = "Statistics",
    params(("studentId" = i32, Path, description = "Student identifier"), YearFilter),
    responses(
        (status = 200, description = "Credit-weighted results per semester", body = Vec<SemesterStats>),
        (status = 500, description = "Statistics failure", body = ErrorBody)
    )
)]
pub async fn get_student_semester_stats(
    State(state): State<Arc<AppState>>,
    student_id: Result<Path<i32>, PathRejection>,
    filter: Result<Query<YearFilter>, QueryRejection>,
) -> Result<Json<Vec<SemesterStats>>, AppError> {
    let operation = StatsOperation::StudentSemesters;
    let student_id = path_id(operation, student_id)?;
    let academic_year = year_filter(operation, filter)?;

    let semesters = state
        .stats
        .student_semester_stats(student_id, academic_year)
        .await
        .map_err(|e| AppError::stats(operation, e))?;
    Ok(Json(semesters))
}

/// # GET /stats/global
#[utoipa::path(
    get,
    path = "/stats/global",
    tag = "Statistics",
    params(YearFilter),
    responses(
        (status = 200, description = "Year-wide statistics", body = GlobalStats),
        (status = 500, description = "Statistics failure", body = ErrorBody)
    )
)]
pub async fn get_global_stats(
    State(state): State<Arc<AppState>>,
    filter: Result<Query<YearFilter>, QueryRejection>,
) -> Result<Json<GlobalStats>, AppError> {
    let operation = StatsOperation::Global;
    let academic_year = year_filter(operation, filter)?;

    let stats = state
        .stats
        .global_stats(academic_year)
        .await
        .map_err(|e| AppError::stats(operation, e))?;
    Ok(Json(stats))
}

/// # GET /stats/students/:student_id/progress
/// Semester averages across all years, with the change from the previous semester.
#[utoipa::path(
    get,
    path = "/stats/students/{studentId}/progress",
    tag = "Statistics",
    params(("studentId" = i32, Path, description = "Student identifier")),
    responses(
        (status = 200, description = "Progression per academic year and semester", body = Vec<ProgressStats>),
        (status = 500, description = "Statistics failure", body = ErrorBody)
    )
)]
pub async fn get_student_progress(
    State(state): State<Arc<AppState>>,
    student_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Vec<ProgressStats>>, AppError> {
    let operation = StatsOperation::StudentProgress;
    let student_id = path_id(operation, student_id)?;

    let periods = state
        .stats
        .student_progress(student_id)
        .await
        .map_err(|e| AppError::stats(operation, e))?;
    Ok(Json(periods))
}

/// # GET /stats/courses/:course_id/distribution
#[utoipa::path(
    get,
    path = "/stats/courses/{courseId}/distribution",
    tag = "Statistics",
    params(("courseId" = i32, Path, description = "Course identifier"), YearFilter),
    responses(
        (status = 200, description = "Non-empty grade bins", body = Vec<GradeDistribution>),
        (status = 500, description = "Statistics failure", body = ErrorBody)
    )
)]
pub async fn get_course_distribution(
    State(state): State<Arc<AppState>>,
    course_id: Result<Path<i32>, PathRejection>,
    filter: Result<Query<YearFilter>, QueryRejection>,
) -> Result<Json<Vec<GradeDistribution>>, AppError> {
    let operation = StatsOperation::CourseDistribution;
    let course_id = path_id(operation, course_id)?;
    let academic_year = year_filter(operation, filter)?;

    let bins = state
        .stats
        .course_distribution(course_id, academic_year)
        .await
        .map_err(|e| AppError::stats(operation, e))?;
    Ok(Json(bins))
}

/// # GET /stats/teachers/:teacher_id
#[utoipa::path(
    get,
    path = "/stats/teachers/{teacherId}",
    tag = "Statistics",
    params(("teacherId" = i32, Path, description = "Teacher identifier"), YearFilter),
    responses(
        (status = 200, description = "Statistics of each course taught", body = Vec<TeacherCourseStats>),
        (status = 500, description = "Statistics failure", body = ErrorBody)
    )
)]
pub async fn get_teacher_stats(
    State(state): State<Arc<AppState>>,
    teacher_id: Result<Path<i32>, PathRejection>,
    filter: Result<Query<YearFilter>, QueryRejection>,
) -> Result<Json<Vec<TeacherCourseStats>>, AppError> {
    let operation = StatsOperation::Teacher;
    let teacher_id = path_id(operation, teacher_id)?;
    let academic_year = year_filter(operation, filter)?;

    let courses = state
        .stats
        .teacher_stats(teacher_id, academic_year)
        .await
        .map_err(|e| AppError::stats(operation, e))?;
    Ok(Json(courses))
}

/// # GET /stats/comparison
/// Compares each course of a semester with the same semester one year earlier.
#[utoipa::path(
    get,
    path = "/stats/comparison",
    tag = "Statistics",
    params(ComparisonFilter),
    responses(
        (status = 200, description = "Year-over-year comparison per course", body = Vec<SemesterComparison>),
        (status = 500, description = "Statistics failure", body = ErrorBody)
    )
)]
pub async fn get_semester_comparison(
    State(state): State<Arc<AppState>>,
    filter: Result<Query<ComparisonFilter>, QueryRejection>,
) -> Result<Json<Vec<SemesterComparison>>, AppError> {
    let operation = StatsOperation::SemesterComparison;
    let Query(filter) = filter.map_err(|rejection| AppError::malformed(operation, rejection))?;

    let courses = state
        .stats
        .semester_comparison(filter.academic_year, filter.semester)
        .await
        .map_err(|e| AppError::stats(operation, e))?;
    Ok(Json(courses))
}
