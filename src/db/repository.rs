use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::models::Course;

pub async fn fetch_courses(db: &SqlitePool) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        r#"
        SELECT id, name, course_state, owner_id, creation_time,
            section, description, description_heading
        FROM courses
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn fetch_course(db: &SqlitePool, id: &str) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        r#"
        SELECT id, name, course_state, owner_id, creation_time,
            section, description, description_heading
        FROM courses
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn fetch_course_ids(db: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT id FROM courses ORDER BY id")
        .fetch_all(db)
        .await
}

pub async fn upsert_course(db: &SqlitePool, course: &Course) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO courses
            (id, name, course_state, owner_id, creation_time,
            section, description, description_heading)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            course_state = excluded.course_state,
            owner_id = excluded.owner_id,
            creation_time = excluded.creation_time,
            section = excluded.section,
            description = excluded.description,
            description_heading = excluded.description_heading
        "#,
    )
    .bind(&course.id)
    .bind(&course.name)
    .bind(&course.course_state)
    .bind(&course.owner_id)
    .bind(&course.creation_time)
    .bind(&course.section)
    .bind(&course.description)
    .bind(&course.description_heading)
    .execute(db)
    .await?;

    Ok(())
}

pub async fn upsert_course_alias(
    tx: &mut Transaction<'_, Sqlite>,
    alias: &str,
    course_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO course_aliases (alias, course_id)
        VALUES (?1, ?2)
        ON CONFLICT(alias) DO UPDATE SET course_id = excluded.course_id
        "#,
    )
    .bind(alias)
    .bind(course_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

pub async fn upsert_course_id(
    tx: &mut Transaction<'_, Sqlite>,
    course_id: &str,
    alias: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO course_ids (course_id, alias)
        VALUES (?1, ?2)
        ON CONFLICT(course_id) DO UPDATE SET alias = excluded.alias
        "#,
    )
    .bind(course_id)
    .bind(alias)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

pub async fn fetch_course_for_alias(
    db: &SqlitePool,
    alias: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT course_id FROM course_aliases WHERE alias = ?1")
        .bind(alias)
        .fetch_optional(db)
        .await
}

pub async fn fetch_alias_for_course(
    db: &SqlitePool,
    course_id: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT alias FROM course_ids WHERE course_id = ?1")
        .bind(course_id)
        .fetch_optional(db)
        .await
}

pub async fn fetch_aliases(db: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT alias FROM course_aliases ORDER BY alias")
        .fetch_all(db)
        .await
}
