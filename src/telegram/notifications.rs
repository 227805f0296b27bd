//! Job notifications: approval results, channel posts and subscriber alerts
//!
//! Rendering is pure; the three delivery entry points are triggered by the
//! back office over HTTP (see `core::web_server`).

use crate::core::error::AppError;
use crate::core::subscription::find_subscription_match;
use crate::core::types::{gender_label, ContactType, Job, JobStatus, PostType, OTHER};
use crate::core::validation::local_phone_format;
use crate::push::PushRequest;
use crate::storage::{clients, jobs, users};
use crate::telegram::api::Delivery;
use crate::telegram::handlers::HandlerDeps;
use crate::telegram::keyboards::{InlineButton, Markup};

const SIGNATURE: &str = "@asseri_bot         @asseri_bot\n\n";
const EXTERNAL_LINK_TEXT: &str = "Tap to view details / ዝርዝሩን ለማየት ይሄንን ይጫኑ";

/// Failure reported back to the HTTP caller as `{"error": ...}`
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("{0}")]
    Store(#[from] AppError),
    #[error("unable to perform operation")]
    UnsupportedStatus,
    /// Telegram answered 429, the caller should try again later
    #[error("retry")]
    Throttled,
    #[error("{0}")]
    Delivery(String),
}

/// `------------- <b>Label</b> -------------` followed by a blank line
pub fn banner(label: &str) -> String {
    format!("------------- <b>{}</b> -------------\n\n", label)
}

/// Wraps a job summary between two banners.
pub fn with_banner(label: &str, summary: &str) -> String {
    let banner = banner(label);
    format!("{}{}\n\n{}", banner, summary, banner)
}

/// `Tech Jobs,Health` -> `Tech_Jobs,Health`
fn underscore_spaces(text: &str) -> String {
    text.replace(' ', "_")
}

/// The detail block shown to the owner of a job.
pub fn job_summary(job: &Job) -> String {
    format!(
        "<b>Job Title</b>:  {}\n\n\
         <b>Job Type</b>:  {}\n\
         <b>Gender</b>:  {}\n\
         <b>Education level</b>:  {}\n\
         <b>Experience</b>:  {}\n\
         <b>Contact Type</b>:  {}\n\n\
         <b>Description</b>:  {}\n\n#{}",
        job.title,
        job.job_type,
        gender_label(&job.gender),
        job.education_level,
        job.experience,
        job.contact_type,
        job.description,
        underscore_spaces(&job.sector)
    )
}

/// `#Tech    #Health    ` for a comma separated sector list.
fn sector_hashtags(sector: &str) -> String {
    sector
        .trim()
        .split(',')
        .map(|sector| format!("#{}    ", underscore_spaces(sector.trim())))
        .collect()
}

fn type_line(job: &Job) -> String {
    let types: Vec<&str> = job
        .job_type
        .trim()
        .split(',')
        .map(str::trim)
        .filter(|job_type| !job_type.is_empty() && !job_type.eq_ignore_ascii_case(OTHER))
        .collect();
    if types.is_empty() {
        String::new()
    } else {
        format!("<b>Job Type</b>:  {}\n", types.join(", "))
    }
}

fn education_line(job: &Job) -> String {
    let level = job.education_level.trim();
    if level.is_empty() || level.eq_ignore_ascii_case(OTHER) {
        String::new()
    } else {
        format!("<b>Education level</b>:  {}\n", level)
    }
}

/// `<b>Contact</b>: value` followed by a blank line
pub fn contact_line(value: &str) -> String {
    format!("<b>Contact</b>: {}\n\n", value)
}

/// Public post for a job. `contact` is a full [`contact_line`] or empty.
pub fn build_notification(job: &Job, employer: &str, contact: &str) -> String {
    let head = format!(
        "<b>Job Title</b>:  {}\n\n<b>አሰሪ</b>:  {}\n\n{}",
        job.title,
        employer,
        type_line(job)
    );
    let hashtags = sector_hashtags(&job.sector);

    match job.post_type {
        PostType::User | PostType::Internal => format!(
            "{}<b>Gender</b>:  {}\n{}<b>Experience</b>:  {}\n\n<b>Description</b>:  {}\n\n{}{}\n\n{}",
            head,
            gender_label(&job.gender),
            education_line(job),
            job.experience,
            job.description,
            contact,
            hashtags,
            SIGNATURE
        ),
        PostType::External => format!(
            "{}{}<b>Experience</b>:  {}\n\n<b>Description</b>:  {}\n\n{}\n\n{}",
            head,
            education_line(job),
            job.experience,
            job.description,
            hashtags,
            SIGNATURE
        ),
    }
}

/// Employer name, contact line and button of a public post
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostParts {
    pub employer: String,
    pub contact: String,
    pub markup: Option<Markup>,
}

fn apply_button(deps: &HandlerDeps, job: &Job) -> Markup {
    Markup::inline_button(InlineButton::url(
        "🔗 Apply",
        format!("{}?start=apply_{}", deps.config.bot_url, job.id),
    ))
}

/// Works out who to credit and how applicants get in touch.
pub async fn resolve_post_parts(deps: &HandlerDeps, job: &Job) -> Result<PostParts, NotifyError> {
    match job.post_type {
        PostType::User => {
            let (user, client) = {
                let conn = deps.connection()?;
                let user = users::find_user(&conn, &job.employer)?
                    .ok_or_else(|| AppError::NotFound(format!("no user found for employer {}", job.employer)))?;
                let client = clients::find_client_by_user_id(&conn, &user.id)?;
                (user, client)
            };

            let mut parts = PostParts {
                employer: user.user_name.clone(),
                ..PostParts::default()
            };
            match ContactType::parse(&job.contact_type) {
                Some(ContactType::ViaTelegramAccount) => {
                    let handle = match &client {
                        Some(client) => deps.messenger.public_username(client.telegram_id).await,
                        None => None,
                    };
                    parts.contact = match handle {
                        Some(handle) => contact_line(&format!("@{}", handle)),
                        None => contact_line(&local_phone_format(&user.phone_number, &deps.config.country_code)),
                    };
                }
                Some(ContactType::SendCv) => parts.markup = Some(apply_button(deps, job)),
                None => {}
            }
            Ok(parts)
        }
        PostType::Internal => Ok(PostParts {
            employer: job.employer.clone(),
            contact: contact_line(&job.contact_info),
            markup: None,
        }),
        PostType::External => Ok(PostParts {
            employer: job.employer.clone(),
            contact: String::new(),
            markup: (!job.link.trim().is_empty())
                .then(|| Markup::inline_button(InlineButton::url(EXTERNAL_LINK_TEXT, job.link.clone()))),
        }),
    }
}

fn find_job(deps: &HandlerDeps, job_id: &str) -> Result<Job, NotifyError> {
    let conn = deps.connection()?;
    jobs::find_job(&conn, job_id)?
        .ok_or_else(|| NotifyError::Store(AppError::NotFound(format!("no job found for id {}", job_id))))
}

fn delivery_result(delivery: Delivery) -> Result<(), NotifyError> {
    match delivery {
        Delivery::Delivered => Ok(()),
        Delivery::Throttled => Err(NotifyError::Throttled),
        Delivery::Failed(reason) => Err(NotifyError::Delivery(reason)),
    }
}

/// Tells the employer their job was approved, declined or closed.
///
/// Jobs not owned by a registered user with a chat are silently skipped.
pub async fn send_approval_result(deps: &HandlerDeps, job_id: &str) -> Result<(), NotifyError> {
    let job = find_job(deps, job_id)?;

    let client = {
        let conn = deps.connection()?;
        match users::find_user(&conn, &job.employer)? {
            Some(user) => clients::find_client_by_user_id(&conn, &user.id)?,
            None => None,
        }
    };
    let Some(client) = client else {
        log::debug!("Job {} has no registered employer chat, skipping approval result", job_id);
        return Ok(());
    };

    let label = match job.status {
        JobStatus::Opened => "Approved",
        JobStatus::Declined => "Declined",
        JobStatus::Closed => "Closed",
        JobStatus::Pending => return Err(NotifyError::UnsupportedStatus),
    };

    let text = with_banner(label, &job_summary(&job));
    delivery_result(deps.messenger.send_text(client.telegram_id, &text, None).await)
}

/// Posts an opened job (or the closing of one) to the public channel.
pub async fn push_to_channel(deps: &HandlerDeps, job_id: &str) -> Result<(), NotifyError> {
    let job = find_job(deps, job_id)?;
    if !matches!(job.status, JobStatus::Opened | JobStatus::Closed) {
        return Ok(());
    }

    let parts = resolve_post_parts(deps, &job).await?;
    let mut post = build_notification(&job, &parts.employer, &parts.contact);
    let mut markup = parts.markup;
    if job.status == JobStatus::Closed {
        let closed = banner("Closed");
        post = format!("{}{}{}", closed, post, closed);
        markup = None;
    }

    delivery_result(deps.messenger.post_to_channel(&post, markup.as_ref()).await)
}

/// Queues an alert for every matching subscriber of an opened job.
///
/// Returns how many requests were queued.
pub async fn push_to_subscribers(deps: &HandlerDeps, job_id: &str) -> Result<usize, NotifyError> {
    let job = find_job(deps, job_id)?;
    if job.status != JobStatus::Opened {
        return Ok(0);
    }

    let parts = resolve_post_parts(deps, &job).await?;
    let body = format!(
        "{}{}",
        banner("Subscription"),
        build_notification(&job, &parts.employer, &parts.contact)
    );

    let requests: Vec<PushRequest> = {
        let conn = deps.connection()?;
        let mut requests = Vec::new();
        for subscription in find_subscription_match(&conn, &job)? {
            if subscription.user_id == job.employer {
                continue;
            }
            if let Some(client) = clients::find_client_by_user_id(&conn, &subscription.user_id)? {
                requests.push(PushRequest::new(client.telegram_id, body.clone(), parts.markup.clone()));
            }
        }
        requests
    };

    let queued = requests.len();
    log::info!("Job {} matched {} subscriber(s)", job_id, queued);
    deps.push_queue.enqueue(requests).await;
    deps.push_queue.signal();
    Ok(queued)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn job() -> Job {
        let mut job = Job::new("JB-1", "UR-1", "Backend developer");
        job.job_type = "FullTime,Other".into();
        job.sector = "Information Technology,Health".into();
        job.education_level = "BA".into();
        job.experience = "2 years".into();
        job.gender = "F".into();
        job.description = "Rust services".into();
        job.contact_type = "Send CV".into();
        job
    }

    #[test]
    fn test_job_summary_layout() {
        assert_eq!(
            job_summary(&job()),
            "<b>Job Title</b>:  Backend developer\n\n\
             <b>Job Type</b>:  FullTime,Other\n\
             <b>Gender</b>:  Female\n\
             <b>Education level</b>:  BA\n\
             <b>Experience</b>:  2 years\n\
             <b>Contact Type</b>:  Send CV\n\n\
             <b>Description</b>:  Rust services\n\n\
             #Information_Technology,Health"
        );
    }

    #[test]
    fn test_with_banner() {
        assert_eq!(
            with_banner("Closed", "body"),
            "------------- <b>Closed</b> -------------\n\nbody\n\n------------- <b>Closed</b> -------------\n\n"
        );
    }

    #[test]
    fn test_user_post_notification() {
        let text = build_notification(&job(), "Acme", &contact_line("@acme"));
        assert_eq!(
            text,
            "<b>Job Title</b>:  Backend developer\n\n\
             <b>አሰሪ</b>:  Acme\n\n\
             <b>Job Type</b>:  FullTime\n\
             <b>Gender</b>:  Female\n\
             <b>Education level</b>:  BA\n\
             <b>Experience</b>:  2 years\n\n\
             <b>Description</b>:  Rust services\n\n\
             <b>Contact</b>: @acme\n\n\
             #Information_Technology    #Health    \n\n\
             @asseri_bot         @asseri_bot\n\n"
        );
    }

    #[test]
    fn test_external_post_omits_gender_and_contact() {
        let mut job = job();
        job.post_type = PostType::External;
        let text = build_notification(&job, "Acme", &contact_line("ignored"));
        assert!(!text.contains("Gender"));
        assert!(!text.contains("Contact"));
        assert!(text.contains("<b>Experience</b>:  2 years\n\n"));
    }

    #[test]
    fn test_other_values_are_hidden() {
        let mut job = job();
        job.job_type = "Other".into();
        job.education_level = "other".into();
        let text = build_notification(&job, "Acme", "");
        assert!(!text.contains("Job Type"));
        assert!(!text.contains("Education level"));
    }

    #[test]
    fn test_sector_hashtags() {
        assert_eq!(sector_hashtags("Tech"), "#Tech    ");
        assert_eq!(sector_hashtags(" Civil Engineering,Health "), "#Civil_Engineering    #Health    ");
    }

    #[test]
    fn test_notify_error_messages() {
        assert_eq!(NotifyError::Throttled.to_string(), "retry");
        assert_eq!(NotifyError::UnsupportedStatus.to_string(), "unable to perform operation");
        assert_eq!(
            NotifyError::Store(AppError::NotFound("no job found for id JB-9".into())).to_string(),
            "no job found for id JB-9"
        );
    }
}
