//! Job management for employers and CV applications for job seekers.

use crate::core::error::AppResult;
use crate::core::types::{Job, JobStatus};
use crate::storage::{clients, feedback, jobs};
use crate::telegram::handlers::types::{ChatContext, HandlerDeps};
use crate::telegram::keyboards::{self, InlineButton, Markup};
use crate::telegram::notifications::{banner, job_summary, with_banner};
use crate::telegram::state::CallbackAction;
use crate::telegram::types::Update;

const UNABLE_TO_APPLY: &str = "🙁 Unable to apply for the job";
const UNABLE_TO_CLOSE: &str = "🙁 Oops! unable to close the job";

/// Why an application did not go through
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplyError {
    /// The job cannot take applications from this user; the chat goes back to the main menu
    #[error("unable to apply for the job")]
    Unable,
    /// Anything but a PDF was sent; the chat stays in the application flow
    #[error("invalid format")]
    InvalidFormat,
    /// The CV could not be forwarded and the application was rolled back
    #[error("application not completed")]
    Incomplete,
}

pub async fn show_status_menu(deps: &HandlerDeps, ctx: &ChatContext) {
    deps.reply_with(ctx.chat_id, "Choose status", &keyboards::job_status_menu())
        .await;
}

fn close_button(job_id: &str) -> Markup {
    Markup::inline_button(InlineButton::callback(
        "❌ Close",
        CallbackAction::CloseJob(job_id.to_string()).data(),
    ))
}

fn empty_listing_text(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Pending => "You don't have any pending job waiting for approval.",
        JobStatus::Opened => "You don't have any opened job waiting for an applier.",
        JobStatus::Closed => "You don't have any closed job.",
        JobStatus::Declined => "You don't have any declined job.",
    }
}

/// Lists the user's own jobs with the given status, one message each.
pub async fn list_jobs(deps: &HandlerDeps, ctx: &ChatContext, status: JobStatus) {
    let own_jobs = match deps
        .connection()
        .and_then(|conn| jobs::find_jobs_by_employer(&conn, &ctx.user.id))
    {
        Ok(own_jobs) => own_jobs,
        Err(e) => {
            log::error!("Failed to list jobs of {}: {}", ctx.user.id, e);
            Vec::new()
        }
    };

    let matching: Vec<Job> = own_jobs.into_iter().filter(|job| job.status == status).collect();
    if matching.is_empty() {
        deps.reply(ctx.chat_id, empty_listing_text(status)).await;
        return;
    }

    for job in &matching {
        match status {
            JobStatus::Pending => {
                deps.reply(ctx.chat_id, &job_summary(job)).await;
            }
            JobStatus::Opened => {
                deps.reply_with(ctx.chat_id, &job_summary(job), &close_button(&job.id)).await;
            }
            JobStatus::Closed => {
                deps.reply(ctx.chat_id, &with_banner("Closed", &job_summary(job))).await;
            }
            JobStatus::Declined => {
                deps.reply(ctx.chat_id, &with_banner("Declined", &job_summary(job))).await;
            }
        }
    }
}

/// Closes one of the sender's opened jobs. Returns the closed banner, or the toast text on failure.
pub fn close_job(deps: &HandlerDeps, ctx: &ChatContext, job_id: &str) -> Result<String, String> {
    let closed = deps.connection().and_then(|conn| -> AppResult<Option<Job>> {
        let Some(mut job) = jobs::find_job(&conn, job_id)? else {
            return Ok(None);
        };
        if job.employer != ctx.user.id {
            log::warn!("User {} tried to close job {} of {}", ctx.user.id, job_id, job.employer);
            return Ok(None);
        }
        if job.status != JobStatus::Opened {
            log::warn!("Refusing to close job {} with status {}", job_id, job.status.as_str());
            return Ok(None);
        }
        jobs::update_job_status(&conn, job_id, JobStatus::Closed)?;
        job.status = JobStatus::Closed;
        Ok(Some(job))
    });

    match closed {
        Ok(Some(job)) => Ok(with_banner("Closed", &job_summary(&job))),
        Ok(None) => Err(UNABLE_TO_CLOSE.to_string()),
        Err(e) => {
            log::error!("Failed to close job {}: {}", job_id, e);
            Err(UNABLE_TO_CLOSE.to_string())
        }
    }
}

/// Sends a job's details. Returns the toast text, empty when the job was shown.
pub async fn view_job(deps: &HandlerDeps, job_id: &str, chat_id: i64) -> String {
    let job = match deps.connection().and_then(|conn| jobs::find_job(&conn, job_id)) {
        Ok(Some(job)) => job,
        Ok(None) => return "😳 Oops! unable to view job detail.".to_string(),
        Err(e) => {
            log::error!("Failed to load job {}: {}", job_id, e);
            return "😳 Oops! unable to view job detail.".to_string();
        }
    };

    if job.status == JobStatus::Opened {
        deps.reply_with(chat_id, &job_summary(&job), &close_button(&job.id)).await;
    } else {
        deps.reply(chat_id, &job_summary(&job)).await;
    }
    String::new()
}

/// Hands an employer a one-time link to the job posting form.
pub async fn post_job(deps: &HandlerDeps, ctx: &ChatContext) {
    if ctx.user.is_job_seeker() {
        deps.reply(ctx.chat_id, "🙁 Oops! Can't perform operation for job seeker.").await;
        return;
    }

    let access_token = uuid::Uuid::new_v4().to_string();
    if let Err(e) = deps
        .connection()
        .and_then(|conn| feedback::add_post_token(&conn, &access_token, &ctx.user.id))
    {
        log::error!("Failed to store post token for {}: {}", ctx.user.id, e);
    }

    deps.reply(
        ctx.chat_id,
        &format!(
            "please follow the following link to post a job. \n {}?employer_id={}&access_token={}",
            deps.config.post_job_url, ctx.user.id, access_token
        ),
    )
    .await;
}

/// Returns the job when the user may apply for it, otherwise the message to show.
fn applicable_job(deps: &HandlerDeps, ctx: &ChatContext, job_id: &str) -> Result<Job, &'static str> {
    let job = match deps.connection().and_then(|conn| jobs::find_job(&conn, job_id)) {
        Ok(Some(job)) => job,
        Ok(None) => return Err(UNABLE_TO_APPLY),
        Err(e) => {
            log::error!("Failed to load job {}: {}", job_id, e);
            return Err(UNABLE_TO_APPLY);
        }
    };

    match job.status {
        JobStatus::Closed => Err("🙁 Sorry the job has been closed"),
        JobStatus::Opened if job.employer == ctx.user.id => Err("❌ You can't apply for your own job"),
        JobStatus::Opened => Ok(job),
        _ => Err(UNABLE_TO_APPLY),
    }
}

/// `/start apply_<job>`: checks the job and asks for a CV.
pub async fn init_apply(deps: &HandlerDeps, ctx: &ChatContext, job_id: &str) -> bool {
    if let Err(message) = applicable_job(deps, ctx, job_id) {
        deps.reply(ctx.chat_id, message).await;
        return false;
    }

    let already_applied = deps
        .connection()
        .and_then(|conn| jobs::application_exists(&conn, job_id, &ctx.user.id))
        .unwrap_or_else(|e| {
            log::error!("Failed to check application of {} for {}: {}", ctx.user.id, job_id, e);
            false
        });
    if already_applied {
        deps.reply(ctx.chat_id, "❌ You have already applied for the job").await;
        return false;
    }

    deps.reply_with(ctx.chat_id, "Send CV (*PDF format only)", &keyboards::cancel_application_menu())
        .await;
    true
}

/// Records the application and forwards the CV to the employer.
pub async fn apply(deps: &HandlerDeps, ctx: &ChatContext, update: &Update, job_id: &str) -> Result<(), ApplyError> {
    let job = match applicable_job(deps, ctx, job_id) {
        Ok(job) => job,
        Err(message) => {
            deps.reply(ctx.chat_id, message).await;
            return Err(ApplyError::Unable);
        }
    };

    let Some(document) = update.message.document.as_ref().filter(|document| document.is_pdf()) else {
        deps.reply(ctx.chat_id, "Please send *.pdf file only").await;
        return Err(ApplyError::InvalidFormat);
    };

    let recorded = deps.connection().and_then(|conn| -> AppResult<Option<i64>> {
        let Some(employer) = clients::find_client_by_user_id(&conn, &job.employer)? else {
            return Ok(None);
        };
        jobs::add_application(&conn, job_id, &ctx.user.id)?;
        Ok(Some(employer.telegram_id))
    });

    let employer_chat = match recorded {
        Ok(Some(chat_id)) => chat_id,
        Ok(None) => {
            log::warn!("Employer {} of job {} has no chat", job.employer, job_id);
            deps.reply(ctx.chat_id, UNABLE_TO_APPLY).await;
            return Err(ApplyError::Unable);
        }
        Err(e) => {
            log::error!("Failed to record application of {} for {}: {}", ctx.user.id, job_id, e);
            deps.reply(ctx.chat_id, UNABLE_TO_APPLY).await;
            return Err(ApplyError::Unable);
        }
    };

    let caption = format!(
        "{}<b>Job Title</b>:  {}\n\n<b>Description</b>:  {}\n\n",
        banner("Application"),
        job.title,
        job.description
    );
    let details = Markup::inline_button(InlineButton::callback(
        "👀 Job Details",
        CallbackAction::ViewJob(job.id.clone()).data(),
    ));

    let delivery = deps
        .messenger
        .send_document(employer_chat, &document.file_id, &caption, Some(&details))
        .await;
    if !delivery.is_delivered() {
        if let Err(e) = deps
            .connection()
            .and_then(|conn| jobs::delete_application(&conn, job_id, &ctx.user.id))
        {
            log::error!("Failed to roll back application of {} for {}: {}", ctx.user.id, job_id, e);
        }
        deps.reply(ctx.chat_id, "😳 Oops! something went wrong, re-apply again.").await;
        return Err(ApplyError::Incomplete);
    }

    log::info!("User {} applied for job {}", ctx.user.id, job_id);
    deps.reply(ctx.chat_id, "🎉 Your application has been sent to the employer. Good Luck!")
        .await;
    Ok(())
}
