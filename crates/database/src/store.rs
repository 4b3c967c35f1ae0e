use crate::DbError;
use async_trait::async_trait;
use core_types::{
    AcademicYear, CourseStats, GlobalStats, GradeDistribution, ProgressStats, Semester,
    SemesterComparison, SemesterStats, TeacherCourseStats,
};

/// The statistics operations offered to the HTTP layer.
///
/// Every method issues exactly one read-only query. "No data" is never an
/// error: lists come back empty and single records come back zeroed, including
/// `course_stats` for a course id that does not exist.
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Average, min, max, grade count and success rate of a course for one year.
    async fn course_stats(
        &self,
        course_id: i32,
        academic_year: AcademicYear,
    ) -> Result<CourseStats, DbError>;

    /// Credit-weighted results of a student, one record per semester of the year.
    async fn student_semester_stats(
        &self,
        student_id: i32,
        academic_year: AcademicYear,
    ) -> Result<Vec<SemesterStats>, DbError>;

    async fn global_stats(&self, academic_year: AcademicYear) -> Result<GlobalStats, DbError>;

    /// Semester averages of a student across all years, with the change from
    /// the preceding period.
    async fn student_progress(&self, student_id: i32) -> Result<Vec<ProgressStats>, DbError>;

    /// Non-empty grade bins of a course for one year.
    async fn course_distribution(
        &self,
        course_id: i32,
        academic_year: AcademicYear,
    ) -> Result<Vec<GradeDistribution>, DbError>;

    async fn teacher_stats(
        &self,
        teacher_id: i32,
        academic_year: AcademicYear,
    ) -> Result<Vec<TeacherCourseStats>, DbError>;

    /// Per-course results of a semester against the same semester one year earlier.
    async fn semester_comparison(
        &self,
        academic_year: AcademicYear,
        semester: Semester,
    ) -> Result<Vec<SemesterComparison>, DbError>;
}
