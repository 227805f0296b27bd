//! Job posts and the applications made to them.

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};

use crate::core::error::AppResult;
use crate::core::types::{Job, JobStatus};

const JOB_COLUMNS: &str = "id, employer, title, description, job_type, sector, education_level, experience, \
                           gender, contact_type, contact_info, link, status, post_type";

fn parse_job(row: &rusqlite::Row<'_>) -> rusqlite::Result<Job> {
    let status: String = row.get(12)?;
    let post_type: String = row.get(13)?;
    Ok(Job {
        id: row.get(0)?,
        employer: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        job_type: row.get(4)?,
        sector: row.get(5)?,
        education_level: row.get(6)?,
        experience: row.get(7)?,
        gender: row.get(8)?,
        contact_type: row.get(9)?,
        contact_info: row.get(10)?,
        link: row.get(11)?,
        status: status
            .parse()
            .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(12, Type::Text, e.into()))?,
        post_type: post_type
            .parse()
            .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(13, Type::Text, e.into()))?,
    })
}

pub fn add_job(conn: &Connection, job: &Job) -> AppResult<()> {
    conn.execute(
        &format!(
            "INSERT INTO jobs ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            JOB_COLUMNS
        ),
        params![
            job.id,
            job.employer,
            job.title,
            job.description,
            job.job_type,
            job.sector,
            job.education_level,
            job.experience,
            job.gender,
            job.contact_type,
            job.contact_info,
            job.link,
            job.status.as_str(),
            job.post_type.as_str()
        ],
    )?;
    Ok(())
}

pub fn find_job(conn: &Connection, id: &str) -> AppResult<Option<Job>> {
    let job = conn
        .query_row(
            &format!("SELECT {} FROM jobs WHERE id = ?1", JOB_COLUMNS),
            params![id],
            parse_job,
        )
        .optional()?;
    Ok(job)
}

/// All jobs posted by an employer, oldest first.
pub fn find_jobs_by_employer(conn: &Connection, employer: &str) -> AppResult<Vec<Job>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM jobs WHERE employer = ?1 ORDER BY created_at, rowid",
        JOB_COLUMNS
    ))?;
    let jobs = stmt
        .query_map(params![employer], parse_job)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(jobs)
}

pub fn update_job_status(conn: &Connection, id: &str, status: JobStatus) -> AppResult<()> {
    conn.execute(
        "UPDATE jobs SET status = ?2 WHERE id = ?1",
        params![id, status.as_str()],
    )?;
    Ok(())
}

pub fn add_application(conn: &Connection, job_id: &str, job_seeker_id: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO job_applications (job_id, job_seeker_id) VALUES (?1, ?2)",
        params![job_id, job_seeker_id],
    )?;
    Ok(())
}

pub fn application_exists(conn: &Connection, job_id: &str, job_seeker_id: &str) -> AppResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM job_applications WHERE job_id = ?1 AND job_seeker_id = ?2",
        params![job_id, job_seeker_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn delete_application(conn: &Connection, job_id: &str, job_seeker_id: &str) -> AppResult<()> {
    conn.execute(
        "DELETE FROM job_applications WHERE job_id = ?1 AND job_seeker_id = ?2",
        params![job_id, job_seeker_id],
    )?;
    Ok(())
}
