//! Job alert subscriptions: catalog validation, matching against jobs and the
//! summary message shown to users.

use rusqlite::Connection;

use crate::core::error::AppResult;
use crate::core::types::{AttributeKind, CatalogEntry, Job, Preference, Subscription, ANY, WORK_EXPERIENCES};
use crate::core::validation::FieldErrors;
use crate::storage::{catalog, subscriptions};

/// Snapshot of the attribute catalogs
#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    pub job_types: Vec<CatalogEntry>,
    pub sectors: Vec<CatalogEntry>,
    pub education_levels: Vec<CatalogEntry>,
}

impl Catalogs {
    pub fn load(conn: &Connection) -> AppResult<Self> {
        Ok(Self {
            job_types: catalog::list_attributes(conn, AttributeKind::JobType)?,
            sectors: catalog::list_attributes(conn, AttributeKind::Sector)?,
            education_levels: catalog::list_attributes(conn, AttributeKind::EducationLevel)?,
        })
    }

    /// Sectors offered to subscribers. A subscription always pins a real sector, so no "Any".
    pub fn subscription_sectors(&self) -> Vec<CatalogEntry> {
        self.sectors.clone()
    }

    pub fn subscription_job_types(&self) -> Vec<CatalogEntry> {
        with_any(&self.job_types)
    }

    pub fn subscription_education_levels(&self) -> Vec<CatalogEntry> {
        with_any(&self.education_levels)
    }
}

fn with_any(entries: &[CatalogEntry]) -> Vec<CatalogEntry> {
    let mut entries = entries.to_vec();
    entries.push(CatalogEntry::any());
    entries
}

/// Experience bands offered to subscribers, "Any" last.
pub fn subscription_experiences() -> Vec<&'static str> {
    let mut bands = WORK_EXPERIENCES.to_vec();
    bands.push(ANY);
    bands
}

/// Finds the catalog name for a value given either as id or as name.
fn resolve_name(entries: &[CatalogEntry], value: &str) -> Option<String> {
    entries
        .iter()
        .find(|entry| entry.id == value || entry.name == value)
        .map(|entry| entry.name.clone())
}

fn resolve_preference(entries: &[CatalogEntry], preference: &Preference) -> Option<Preference> {
    match preference {
        Preference::Unset => None,
        Preference::Any => Some(Preference::Any),
        Preference::Named(value) => resolve_name(entries, value).map(|name| Preference::from_stored(&name)),
    }
}

/// Validates a subscription against the catalogs and the user's other subscriptions.
///
/// Values given as catalog ids are rewritten to their display names. Errors
/// are keyed `sector`, `type`, `education_level`, `experience`, and `error`
/// for a duplicate of another complete subscription of the same user.
pub fn validate_subscription(
    subscription: &mut Subscription,
    catalogs: &Catalogs,
    existing: &[Subscription],
) -> FieldErrors {
    let mut errors = FieldErrors::new();

    match resolve_name(&catalogs.subscription_sectors(), subscription.sector.trim()) {
        Some(name) => subscription.sector = name,
        None => errors.insert("sector", "invalid job sector used"),
    }

    match resolve_preference(&catalogs.subscription_job_types(), &subscription.job_type) {
        Some(preference) => subscription.job_type = preference,
        None => errors.insert("type", "invalid job type used"),
    }

    match resolve_preference(&catalogs.subscription_education_levels(), &subscription.education_level) {
        Some(preference) => subscription.education_level = preference,
        None => errors.insert("education_level", "invalid education level used"),
    }

    let experience_valid = match &subscription.experience {
        Preference::Unset => false,
        Preference::Any => true,
        Preference::Named(band) => WORK_EXPERIENCES.contains(&band.as_str()),
    };
    if !experience_valid {
        errors.insert("experience", "invalid work experience used");
    }

    if errors.is_empty()
        && existing
            .iter()
            .any(|other| other.id != subscription.id && other.user_id == subscription.user_id && other.same_criteria(subscription))
    {
        errors.insert("error", "subscription already exists");
    }

    errors
}

/// Deletes every subscription of `user_id` that no longer validates.
///
/// Catalog entries may have been removed since a subscription was made, and
/// abandoned wizard drafts never validate. Returns how many were removed.
pub fn sweep_invalid_subscriptions(conn: &Connection, user_id: &str, catalogs: &Catalogs) -> AppResult<usize> {
    let all = subscriptions::find_subscriptions_by_user(conn, user_id)?;
    // Rows deleted earlier in the pass no longer count as duplicates.
    let mut remaining = all.clone();
    let mut removed = 0;
    for subscription in &all {
        let mut candidate = subscription.clone();
        if !validate_subscription(&mut candidate, catalogs, &remaining).is_empty() {
            subscriptions::delete_subscription(conn, &subscription.id)?;
            remaining.retain(|other| other.id != subscription.id);
            removed += 1;
        }
    }
    if removed > 0 {
        log::info!("Removed {} stale subscription(s) of user {}", removed, user_id);
    }
    Ok(removed)
}

/// Candidate values a job offers in each dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCriteria {
    pub sectors: Vec<String>,
    pub job_types: Vec<String>,
    pub education_levels: Vec<String>,
    pub experiences: Vec<String>,
}

impl MatchCriteria {
    /// Builds the criteria for a job; `None` when the job has no sector.
    ///
    /// A blank type, education level or experience is unspecified and only
    /// reaches subscribers who chose "Any" for that dimension.
    pub fn for_job(job: &Job) -> Option<Self> {
        if job.sector.trim().is_empty() {
            return None;
        }

        let sectors = split_list(&job.sector);

        let mut job_types = split_list(&job.job_type);
        job_types.push(ANY.to_string());

        Some(Self {
            sectors,
            job_types,
            education_levels: with_any_value(&job.education_level),
            experiences: with_any_value(&job.experience),
        })
    }

    pub fn matches(&self, subscription: &Subscription) -> bool {
        self.sectors.iter().any(|sector| sector == &subscription.sector)
            && subscription.job_type.accepts(&self.job_types)
            && subscription.education_level.accepts(&self.education_levels)
            && subscription.experience.accepts(&self.experiences)
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn with_any_value(value: &str) -> Vec<String> {
    let value = value.trim();
    if value.is_empty() {
        vec![ANY.to_string()]
    } else {
        vec![value.to_string(), ANY.to_string()]
    }
}

/// Subscriptions that should be alerted about `job`, at most one per user.
pub fn find_subscription_match(conn: &Connection, job: &Job) -> AppResult<Vec<Subscription>> {
    let Some(criteria) = MatchCriteria::for_job(job) else {
        return Ok(Vec::new());
    };

    let candidates = subscriptions::find_subscriptions_in_sectors(conn, &criteria.sectors)?;
    Ok(dedup_by_user(
        candidates.into_iter().filter(|subscription| criteria.matches(subscription)),
    ))
}

fn dedup_by_user(subscriptions: impl IntoIterator<Item = Subscription>) -> Vec<Subscription> {
    let mut unique: Vec<Subscription> = Vec::new();
    for subscription in subscriptions {
        if !unique.iter().any(|seen| seen.user_id == subscription.user_id) {
            unique.push(subscription);
        }
    }
    unique
}

/// Display values recovered from a summary message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryFields {
    pub job_type: String,
    pub sector: String,
    pub education_level: String,
    pub experience: String,
}

/// The message shown after a subscription is completed and in "Edit Subscriptions".
pub fn render_summary(subscription: &Subscription) -> String {
    format!(
        "<b>Job Subscription</b>\n\n\
         <b>Job Type</b>:  {}\n\
         <b>Sector</b>:  {}\n\
         <b>Education Level</b>:  {}\n\
         <b>Experience</b>:  {}\n\n",
        subscription.job_type, subscription.sector, subscription.education_level, subscription.experience
    )
}

/// Banner reply sent after a subscription is removed.
pub fn render_removed(subscription: &Subscription) -> String {
    format!(
        "------------- <b>Removed</b> -------------\n\n\
         <b>Job Subscription</b>\n\n\
         <b>Job Type</b>:  {}\n\
         <b>Sector</b>:  {}\n\n\
         ------------- <b>Removed</b> -------------\n\n",
        subscription.job_type, subscription.sector
    )
}

/// Reads the four values back out of [`render_summary`] output.
pub fn parse_summary(text: &str) -> Option<SummaryFields> {
    let field = |label: &str| {
        let prefix = format!("<b>{}</b>:  ", label);
        text.lines()
            .find_map(|line| line.strip_prefix(prefix.as_str()))
            .map(str::to_string)
    };

    Some(SummaryFields {
        job_type: field("Job Type")?,
        sector: field("Sector")?,
        education_level: field("Education Level")?,
        experience: field("Experience")?,
    })
}
