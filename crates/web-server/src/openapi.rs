//! OpenAPI description of the statistics API and the static documentation page
//! generated from it.

use crate::error::ErrorBody;
use crate::handlers;
use core_types::{
    CourseStats, GlobalStats, GradeBin, GradeDistribution, ProgressStats, SemesterComparison,
    SemesterStats, TeacherCourseStats,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use utoipa::OpenApi;

/// Title of the generated documentation page.
pub const DOCS_TITLE: &str = "API Documentation - IUT Laval Grades";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "IUT Laval Grades - Statistics API",
        description = "Read-only statistics over course grades: averages, success rates, distributions, progression and year-over-year comparisons."
    ),
    paths(
        handlers::get_course_stats,
        handlers::get_student_semester_stats,
        handlers::get_global_stats,
        handlers::get_student_progress,
        handlers::get_course_distribution,
        handlers::get_teacher_stats,
        handlers::get_semester_comparison,
    ),
    components(schemas(
        CourseStats,
        SemesterStats,
        GlobalStats,
        ProgressStats,
        GradeBin,
        GradeDistribution,
        TeacherCourseStats,
        SemesterComparison,
        ErrorBody,
    )),
    tags((name = "Statistics", description = "Aggregated grade statistics"))
)]
pub struct ApiDoc;

/// Renders a standalone HTML page that loads Swagger UI from a CDN and embeds
/// the OpenAPI description.
pub fn render_docs_page(openapi: &utoipa::openapi::OpenApi) -> Result<String, serde_json::Error> {
    let spec = serde_json::to_string_pretty(openapi)?;
    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{DOCS_TITLE}</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@latest/swagger-ui.css">
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@latest/swagger-ui-bundle.js"></script>
    <script>
        window.onload = function() {{
            SwaggerUIBundle({{
                spec: {spec},
                dom_id: '#swagger-ui',
            }});
        }}
    </script>
</body>
</html>
"#
    ))
}

/// Writes `index.html` into `output_dir`, creating the directory if needed.
/// Returns the path of the written file.
pub fn write_docs(output_dir: &Path) -> io::Result<PathBuf> {
    let page = render_docs_page(&ApiDoc::openapi()).map_err(io::Error::other)?;
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join("index.html");
    fs::write(&path, page)?;
    tracing::info!(path = %path.display(), "API documentation written.");
    Ok(path)
}
