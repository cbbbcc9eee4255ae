//! Persistence for analyzed resumes and job-description matches.
//!
//! The engine returns plain values; everything about storing them (ids,
//! timestamps, foreign keys) lives here. The engine never sees the pool.

use sqlx::PgPool;
use uuid::Uuid;

use crate::engine::classify::CategoryPrediction;
use crate::engine::skills::ExtractedSkillSet;
use crate::engine::MatchAnalysis;
use crate::models::resume::{CategoryCount, JdMatchRow, ResumeRow, ResumeSkillRow};

pub async fn insert_resume(
    pool: &PgPool,
    filename: &str,
    raw_text: &str,
    prediction: &CategoryPrediction,
) -> Result<ResumeRow, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        "INSERT INTO resumes (id, filename, raw_text, category, category_confidence, created_at)
         VALUES ($1, $2, $3, $4, $5, NOW())
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(filename)
    .bind(raw_text)
    .bind(&prediction.category)
    .bind(prediction.confidence)
    .fetch_one(pool)
    .await
}

pub async fn insert_resume_skills(
    pool: &PgPool,
    resume_id: Uuid,
    skills: &ExtractedSkillSet,
) -> Result<(), sqlx::Error> {
    for (name, method) in &skills.skills {
        sqlx::query(
            "INSERT INTO resume_skills (id, resume_id, skill_name, method, created_at)
             VALUES ($1, $2, $3, $4, NOW())",
        )
        .bind(Uuid::new_v4())
        .bind(resume_id)
        .bind(name)
        .bind(method.as_str())
        .execute(pool)
        .await?;
    }
    Ok(())
}

pub async fn insert_jd_match(
    pool: &PgPool,
    resume_id: Uuid,
    jd_text: &str,
    analysis: &MatchAnalysis,
) -> Result<JdMatchRow, sqlx::Error> {
    let matched: Vec<String> = analysis.result.matched_skills.iter().cloned().collect();
    let missing: Vec<String> = analysis.result.missing_skills.iter().cloned().collect();

    sqlx::query_as::<_, JdMatchRow>(
        "INSERT INTO jd_matches
             (id, resume_id, jd_text, match_score, matched_skills, missing_skills, degraded, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(resume_id)
    .bind(jd_text)
    .bind(analysis.result.match_score)
    .bind(&matched)
    .bind(&missing)
    .bind(analysis.degraded)
    .fetch_one(pool)
    .await
}

pub async fn list_resumes(pool: &PgPool, limit: i64) -> Result<Vec<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes ORDER BY created_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn get_resumes_by_category(
    pool: &PgPool,
    category: &str,
    limit: i64,
) -> Result<Vec<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE category = $1 ORDER BY created_at DESC LIMIT $2",
    )
    .bind(category)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn search_resumes(
    pool: &PgPool,
    query: &str,
    limit: i64,
) -> Result<Vec<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes
         WHERE filename ILIKE $1 OR raw_text ILIKE $1
         ORDER BY created_at DESC LIMIT $2",
    )
    .bind(like_pattern(query))
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Escapes LIKE metacharacters so search terms match literally.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

pub async fn get_resume(pool: &PgPool, id: Uuid) -> Result<Option<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get_resume_skills(
    pool: &PgPool,
    resume_id: Uuid,
) -> Result<Vec<ResumeSkillRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeSkillRow>(
        "SELECT * FROM resume_skills WHERE resume_id = $1 ORDER BY skill_name",
    )
    .bind(resume_id)
    .fetch_all(pool)
    .await
}

pub async fn count_resumes(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM resumes")
        .fetch_one(pool)
        .await
}

pub async fn category_stats(pool: &PgPool) -> Result<Vec<CategoryCount>, sqlx::Error> {
    sqlx::query_as::<_, CategoryCount>(
        "SELECT category, COUNT(*) AS count FROM resumes GROUP BY category ORDER BY count DESC",
    )
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_wraps_in_wildcards() {
        assert_eq!(like_pattern("python"), "%python%");
    }

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("100%_done"), "%100\\%\\_done%");
        assert_eq!(like_pattern(r"back\slash"), "%back\\\\slash%");
    }
}
