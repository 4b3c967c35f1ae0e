use crate::{DbError, StatsStore};
use async_trait::async_trait;
use core_types::{
    AcademicYear, CourseStats, GlobalStats, GradeBin, GradeDistribution, PASSING_GRADE,
    ProgressStats, Semester, SemesterComparison, SemesterStats, TeacherCourseStats,
};
use rust_decimal::Decimal;
use sqlx::FromRow;
use sqlx::postgres::PgPool;
use std::future::Future;
use std::sync::LazyLock;
use std::time::Duration;

/// The `DbRepository` provides the statistics queries over the grades database.
/// It encapsulates all SQL and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
    query_timeout: Duration,
}

// Success rates divide the passing grade count by the number of grades in the
// group. The last parameter of every query that computes one is `PASSING_GRADE`.

// The requested id is the driving row, so an unknown course still yields one
// zeroed record with a null code and name.
const COURSE_STATS_SQL: &str = r#"
    SELECT
        c.code AS course_code,
        c.name AS course_name,
        COALESCE(ROUND(AVG(g.grade), 2), 0) AS average_grade,
        COALESCE(MIN(g.grade), 0) AS min_grade,
        COALESCE(MAX(g.grade), 0) AS max_grade,
        COUNT(g.id) AS total_students,
        COALESCE(
            ROUND(COUNT(g.id) FILTER (WHERE g.grade >= $3)::numeric * 100 / NULLIF(COUNT(g.id), 0), 2),
            0
        ) AS success_rate
    FROM (VALUES ($1::integer)) AS requested (course_id)
    LEFT JOIN courses c ON c.id = requested.course_id
    LEFT JOIN grades g ON g.course_id = c.id AND g.academic_year = $2
    GROUP BY requested.course_id, c.id, c.code, c.name
"#;

const STUDENT_SEMESTER_STATS_SQL: &str = r#"
    SELECT
        g.semester AS semester,
        SUM(g.grade * c.credits) / SUM(c.credits) AS average_grade,
        SUM(c.credits) AS total_credits,
        COALESCE(SUM(c.credits) FILTER (WHERE g.grade >= $3), 0) AS validated_credits,
        COUNT(DISTINCT c.id) AS courses_count
    FROM grades g
    JOIN courses c ON c.id = g.course_id
    WHERE g.student_id = $1 AND g.academic_year = $2
    GROUP BY g.semester
    ORDER BY g.semester
"#;

// The success rate is computed per (grade, credits, student) group and then
// averaged over the groups.
const GLOBAL_STATS_SQL: &str = r#"
    WITH year_grades AS (
        SELECT g.student_id, g.course_id, g.grade, c.credits
        FROM grades g
        JOIN courses c ON c.id = g.course_id
        WHERE g.academic_year = $1
    ),
    group_success AS (
        SELECT COUNT(*) FILTER (WHERE grade >= $2)::numeric * 100 / COUNT(*) AS success_rate
        FROM year_grades
        GROUP BY grade, credits, student_id
    )
    SELECT
        COALESCE((SELECT SUM(grade * credits) / NULLIF(SUM(credits), 0) FROM year_grades), 0) AS global_average,
        (SELECT COUNT(DISTINCT student_id) FROM year_grades) AS total_students,
        (SELECT COUNT(DISTINCT course_id) FROM year_grades) AS total_courses,
        COALESCE((SELECT ROUND(AVG(success_rate), 2) FROM group_success), 0) AS average_success_rate
"#;

// Years are fixed-width text, so ordering them as text is chronological.
const STUDENT_PROGRESS_SQL: &str = r#"
    WITH semester_averages AS (
        SELECT
            g.academic_year,
            g.semester,
            AVG(g.grade) AS semester_average,
            LAG(AVG(g.grade)) OVER (ORDER BY g.academic_year, g.semester) AS previous_semester_average
        FROM grades g
        WHERE g.student_id = $1
        GROUP BY g.academic_year, g.semester
    )
    SELECT
        academic_year,
        semester,
        semester_average,
        previous_semester_average,
        COALESCE(semester_average - previous_semester_average, 0) AS progression
    FROM semester_averages
    ORDER BY academic_year, semester
"#;

static COURSE_DISTRIBUTION_SQL: LazyLock<String> = LazyLock::new(|| {
    format!(
        r#"
    WITH binned AS (
        SELECT {} AS bin
        FROM grades
        WHERE course_id = $1 AND academic_year = $2
    )
    SELECT
        bin,
        COUNT(*) AS count,
        ROUND(COUNT(*)::numeric * 100 / SUM(COUNT(*)) OVER (), 2) AS percentage
    FROM binned
    GROUP BY bin
    ORDER BY bin
"#,
        grade_bin_case("grade")
    )
});

const TEACHER_STATS_SQL: &str = r#"
    SELECT
        c.id AS course_id,
        c.name AS course_name,
        COUNT(DISTINCT g.student_id) AS student_count,
        AVG(g.grade) AS average_grade,
        COUNT(*) FILTER (WHERE g.grade >= $3)::numeric * 100 / COUNT(*) AS success_rate,
        ROUND((PERCENTILE_CONT(0.5) WITHIN GROUP (ORDER BY g.grade::float8))::numeric, 2) AS median_grade
    FROM courses c
    JOIN grades g ON g.course_id = c.id
    WHERE c.teacher_id = $1 AND g.academic_year = $2
    GROUP BY c.id, c.name
    ORDER BY c.name
"#;

// $1 current year and $2 previous year, both in the store's text form. A NULL
// previous year matches no grades, so every previous value comes back null.
const SEMESTER_COMPARISON_SQL: &str = r#"
    WITH current_stats AS (
        SELECT
            c.id,
            c.name,
            AVG(g.grade) AS average,
            COUNT(*) FILTER (WHERE g.grade >= $4)::numeric * 100 / COUNT(*) AS success_rate
        FROM courses c
        JOIN grades g ON g.course_id = c.id
        WHERE g.academic_year = $1 AND g.semester = $3
        GROUP BY c.id, c.name
    ),
    previous_stats AS (
        SELECT
            c.id,
            AVG(g.grade) AS average,
            COUNT(*) FILTER (WHERE g.grade >= $4)::numeric * 100 / COUNT(*) AS success_rate
        FROM courses c
        JOIN grades g ON g.course_id = c.id
        WHERE g.academic_year = $2 AND g.semester = $3
        GROUP BY c.id
    )
    SELECT
        cs.id AS course_id,
        cs.name AS course_name,
        ROUND(cs.average, 2) AS current_average,
        ROUND(ps.average, 2) AS previous_average,
        ROUND(cs.average - ps.average, 2) AS average_difference,
        ROUND(cs.success_rate, 2) AS current_success_rate,
        ROUND(ps.success_rate, 2) AS previous_success_rate,
        ROUND(cs.success_rate - ps.success_rate, 2) AS success_rate_difference
    FROM current_stats cs
    LEFT JOIN previous_stats ps ON ps.id = cs.id
    ORDER BY cs.name
"#;

/// Builds a `CASE` expression mapping a grade column to its `GradeBin::index`.
fn grade_bin_case(column: &str) -> String {
    let branches: String = GradeBin::ALL
        .iter()
        .map(|bin| match bin.upper_bound() {
            Some(upper) => format!(" WHEN {column} < {upper} THEN {}", bin.index()),
            None => format!(" ELSE {}", bin.index()),
        })
        .collect();
    format!("CASE{branches} END")
}

/// The stored key of the year before `academic_year`, or `None` when that year
/// cannot exist (no prior data rather than an error).
fn previous_year_key(academic_year: AcademicYear) -> Option<String> {
    academic_year.previous().ok().map(|year| year.to_string())
}

#[derive(Debug, FromRow)]
struct DistributionRow {
    bin: i32,
    count: i64,
    percentage: Decimal,
}

impl TryFrom<DistributionRow> for GradeDistribution {
    type Error = DbError;

    fn try_from(row: DistributionRow) -> Result<Self, Self::Error> {
        let range = GradeBin::from_index(row.bin).ok_or_else(|| {
            DbError::QueryError(sqlx::Error::Protocol(format!(
                "unexpected grade bin index {}",
                row.bin
            )))
        })?;
        Ok(GradeDistribution {
            range,
            count: row.count,
            percentage: row.percentage,
        })
    }
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Runs a query under the configured timeout.
    async fn timed<T, F>(&self, query: F) -> Result<T, DbError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(DbError::Timeout(self.query_timeout)),
        }
    }
}

#[async_trait]
impl StatsStore for DbRepository {
    #[tracing::instrument(skip(self))]
    async fn course_stats(
        &self,
        course_id: i32,
        academic_year: AcademicYear,
    ) -> Result<CourseStats, DbError> {
        let stats = self
            .timed(
                sqlx::query_as::<_, CourseStats>(COURSE_STATS_SQL)
                    .bind(course_id)
                    .bind(academic_year.to_string())
                    .bind(PASSING_GRADE)
                    .fetch_one(&self.pool),
            )
            .await?;
        Ok(stats)
    }

    #[tracing::instrument(skip(self))]
    async fn student_semester_stats(
        &self,
        student_id: i32,
        academic_year: AcademicYear,
    ) -> Result<Vec<SemesterStats>, DbError> {
        let semesters = self
            .timed(
                sqlx::query_as::<_, SemesterStats>(STUDENT_SEMESTER_STATS_SQL)
                    .bind(student_id)
                    .bind(academic_year.to_string())
                    .bind(PASSING_GRADE)
                    .fetch_all(&self.pool),
            )
            .await?;
        tracing::debug!(semesters = semesters.len(), "Fetched semester stats.");
        Ok(semesters)
    }

    #[tracing::instrument(skip(self))]
    async fn global_stats(&self, academic_year: AcademicYear) -> Result<GlobalStats, DbError> {
        let stats = self
            .timed(
                sqlx::query_as::<_, GlobalStats>(GLOBAL_STATS_SQL)
                    .bind(academic_year.to_string())
                    .bind(PASSING_GRADE)
                    .fetch_one(&self.pool),
            )
            .await?;
        Ok(stats)
    }

    #[tracing::instrument(skip(self))]
    async fn student_progress(&self, student_id: i32) -> Result<Vec<ProgressStats>, DbError> {
        let periods = self
            .timed(
                sqlx::query_as::<_, ProgressStats>(STUDENT_PROGRESS_SQL)
                    .bind(student_id)
                    .fetch_all(&self.pool),
            )
            .await?;
        tracing::debug!(periods = periods.len(), "Fetched progression.");
        Ok(periods)
    }

    #[tracing::instrument(skip(self))]
    async fn course_distribution(
        &self,
        course_id: i32,
        academic_year: AcademicYear,
    ) -> Result<Vec<GradeDistribution>, DbError> {
        let rows = self
            .timed(
                sqlx::query_as::<_, DistributionRow>(COURSE_DISTRIBUTION_SQL.as_str())
                    .bind(course_id)
                    .bind(academic_year.to_string())
                    .fetch_all(&self.pool),
            )
            .await?;
        rows.into_iter().map(GradeDistribution::try_from).collect()
    }

    #[tracing::instrument(skip(self))]
    async fn teacher_stats(
        &self,
        teacher_id: i32,
        academic_year: AcademicYear,
    ) -> Result<Vec<TeacherCourseStats>, DbError> {
        let courses = self
            .timed(
                sqlx::query_as::<_, TeacherCourseStats>(TEACHER_STATS_SQL)
                    .bind(teacher_id)
                    .bind(academic_year.to_string())
                    .bind(PASSING_GRADE)
                    .fetch_all(&self.pool),
            )
            .await?;
        tracing::debug!(courses = courses.len(), "Fetched teacher stats.");
        Ok(courses)
    }

    #[tracing::instrument(skip(self))]
    async fn semester_comparison(
        &self,
        academic_year: AcademicYear,
        semester: Semester,
    ) -> Result<Vec<SemesterComparison>, DbError> {
        let previous_year = previous_year_key(academic_year);
        let courses = self
            .timed(
                sqlx::query_as::<_, SemesterComparison>(SEMESTER_COMPARISON_SQL)
                    .bind(academic_year.to_string())
                    .bind(previous_year.as_deref())
                    .bind(semester.value())
                    .bind(PASSING_GRADE)
                    .fetch_all(&self.pool),
            )
            .await?;
        tracing::debug!(courses = courses.len(), ?previous_year, "Fetched semester comparison.");
        Ok(courses)
    }
}
