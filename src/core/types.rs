//! Domain entities shared by storage, the conversation handlers and the dispatcher.

use std::fmt;
use std::str::FromStr;

/// Sentinel value a subscriber picks to match anything in a dimension
pub const ANY: &str = "Any";

/// Catalog entry that means "not one of the listed values"; hidden in job posts
pub const OTHER: &str = "Other";

/// Work experience bands offered to employers and subscribers
pub const WORK_EXPERIENCES: [&str; 11] = [
    "0 year", "1 year", "2 years", "3 years", "4 years", "5 years", "6 years", "7 years", "8 years", "9 years",
    "10+ years",
];

/// Who a registered user is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserCategory {
    /// Hiring party. Shown to users by its Amharic label "አሰሪ"
    Employer,
    JobSeeker,
    Agent,
}

impl UserCategory {
    /// Value stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            UserCategory::Employer => "asseri",
            UserCategory::JobSeeker => "JobSeeker",
            UserCategory::Agent => "Agent",
        }
    }

    /// Label shown on buttons and in the profile
    pub fn display_name(&self) -> &'static str {
        match self {
            UserCategory::Employer => "አሰሪ",
            UserCategory::JobSeeker => "Job Seeker",
            UserCategory::Agent => "Agent",
        }
    }

    /// Maps what a user typed (or tapped) to a category.
    ///
    /// The Amharic label must match exactly; the latin ones ignore case.
    pub fn from_user_input(text: &str) -> Option<Self> {
        let text = text.trim();
        if text == "አሰሪ" {
            return Some(UserCategory::Employer);
        }
        match text.to_lowercase().as_str() {
            "job seeker" => Some(UserCategory::JobSeeker),
            "agent" => Some(UserCategory::Agent),
            _ => None,
        }
    }
}

impl fmt::Display for UserCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asseri" => Ok(UserCategory::Employer),
            "JobSeeker" => Ok(UserCategory::JobSeeker),
            "Agent" => Ok(UserCategory::Agent),
            other => Err(format!("unknown user category: {}", other)),
        }
    }
}

/// Lifecycle of a job post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Pending,
    Opened,
    Closed,
    Declined,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "P",
            JobStatus::Opened => "O",
            JobStatus::Closed => "C",
            JobStatus::Declined => "D",
        }
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "P" => Ok(JobStatus::Pending),
            "O" => Ok(JobStatus::Opened),
            "C" => Ok(JobStatus::Closed),
            "D" => Ok(JobStatus::Declined),
            other => Err(format!("unknown job status: {}", other)),
        }
    }
}

/// Who published the job, which decides the notification template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostType {
    /// Posted by a registered bot user through the web form
    User,
    /// Entered by staff on behalf of an employer
    Internal,
    /// Relayed from a third-party source with a link
    External,
}

impl PostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::User => "User",
            PostType::Internal => "Internal",
            PostType::External => "External",
        }
    }
}

impl FromStr for PostType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "User" => Ok(PostType::User),
            "Internal" => Ok(PostType::Internal),
            "External" => Ok(PostType::External),
            other => Err(format!("unknown post type: {}", other)),
        }
    }
}

/// How applicants reach a user-posted job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactType {
    ViaTelegramAccount,
    SendCv,
}

impl ContactType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactType::ViaTelegramAccount => "Via Telegram Account",
            ContactType::SendCv => "Send CV",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Via Telegram Account" => Some(ContactType::ViaTelegramAccount),
            "Send CV" => Some(ContactType::SendCv),
            _ => None,
        }
    }
}

/// Human readable gender requirement for the `M`/`F`/`B` codes; anything else means both.
pub fn gender_label(code: &str) -> &'static str {
    match code {
        "M" => "Male",
        "F" => "Female",
        _ => "Both",
    }
}

/// Registration progress of a temporary registrant.
///
/// The stage names the last field that was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum RegistrationStage {
    #[default]
    Init = 0,
    UserName = 1,
    PhoneNumber = 2,
    Category = 3,
}

impl RegistrationStage {
    pub fn as_i64(&self) -> i64 {
        *self as i64
    }

    pub fn from_i64(value: i64) -> Self {
        match value {
            1 => RegistrationStage::UserName,
            2 => RegistrationStage::PhoneNumber,
            3 => RegistrationStage::Category,
            _ => RegistrationStage::Init,
        }
    }
}

/// One dimension of a subscription (type, education level, experience).
///
/// Stored as text: `""` while a draft has not reached the step, `"Any"` for
/// the wildcard, otherwise the catalog name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Preference {
    #[default]
    Unset,
    Any,
    Named(String),
}

impl Preference {
    pub fn from_stored(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            Preference::Unset
        } else if value.eq_ignore_ascii_case(ANY) {
            Preference::Any
        } else {
            Preference::Named(value.to_string())
        }
    }

    pub fn as_stored(&self) -> &str {
        match self {
            Preference::Unset => "",
            Preference::Any => ANY,
            Preference::Named(name) => name,
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, Preference::Unset)
    }

    /// Whether this preference accepts one of the candidate values a job offers.
    ///
    /// `Unset` never matches so an unfinished draft receives nothing.
    pub fn accepts(&self, candidates: &[String]) -> bool {
        match self {
            Preference::Unset => false,
            Preference::Any => true,
            Preference::Named(name) => candidates.iter().any(|c| c == name),
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_stored())
    }
}

/// Registered user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub user_name: String,
    pub phone_number: String,
    pub category: UserCategory,
}

impl User {
    pub fn is_job_seeker(&self) -> bool {
        self.category == UserCategory::JobSeeker
    }
}

/// Registration in progress, keyed by the telegram identity
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TempUser {
    pub telegram_id: i64,
    pub user_name: String,
    pub phone_number: String,
    /// Raw category text until validation maps it
    pub category: String,
    pub stage: RegistrationStage,
}

/// Binding between a user and a chat plus the stored conversation cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub user_id: String,
    pub telegram_id: i64,
    pub prev_command: String,
}

/// Job post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: String,
    /// User id for `PostType::User`, employer display name otherwise
    pub employer: String,
    pub title: String,
    pub description: String,
    /// Comma separated job types
    pub job_type: String,
    /// Comma separated sectors
    pub sector: String,
    pub education_level: String,
    pub experience: String,
    pub gender: String,
    pub contact_type: String,
    pub contact_info: String,
    pub link: String,
    pub status: JobStatus,
    pub post_type: PostType,
}

impl Job {
    /// A minimal opened job, mostly useful when seeding data.
    pub fn new(id: impl Into<String>, employer: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            employer: employer.into(),
            title: title.into(),
            description: String::new(),
            job_type: String::new(),
            sector: String::new(),
            education_level: String::new(),
            experience: String::new(),
            gender: "B".to_string(),
            contact_type: String::new(),
            contact_info: String::new(),
            link: String::new(),
            status: JobStatus::Opened,
            post_type: PostType::User,
        }
    }
}

/// Job alert subscription (or a draft of one)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub id: String,
    pub user_id: String,
    pub sector: String,
    pub job_type: Preference,
    pub education_level: Preference,
    pub experience: Preference,
}

impl Subscription {
    pub fn draft(id: impl Into<String>, user_id: impl Into<String>, sector: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            sector: sector.into(),
            job_type: Preference::Unset,
            education_level: Preference::Unset,
            experience: Preference::Unset,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.sector.trim().is_empty()
            && self.job_type.is_set()
            && self.education_level.is_set()
            && self.experience.is_set()
    }

    /// Same four values, compared case-insensitively
    pub fn same_criteria(&self, other: &Subscription) -> bool {
        fn eq(a: &str, b: &str) -> bool {
            a.trim().to_lowercase() == b.trim().to_lowercase()
        }
        eq(&self.sector, &other.sector)
            && eq(self.job_type.as_stored(), other.job_type.as_stored())
            && eq(self.education_level.as_stored(), other.education_level.as_stored())
            && eq(self.experience.as_stored(), other.experience.as_stored())
    }
}

/// Row of an attribute catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// The synthetic "Any" row appended to subscription catalogs
    pub fn any() -> Self {
        Self::new("any", ANY)
    }
}

/// Attribute catalogs backed by a table each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    JobType,
    Sector,
    EducationLevel,
}

impl AttributeKind {
    pub fn table(&self) -> &'static str {
        match self {
            AttributeKind::JobType => "job_types",
            AttributeKind::Sector => "job_sectors",
            AttributeKind::EducationLevel => "education_levels",
        }
    }

    /// Prefix of generated ids
    pub fn id_prefix(&self) -> &'static str {
        match self {
            AttributeKind::JobType => "JT",
            AttributeKind::Sector => "JS",
            AttributeKind::EducationLevel => "EL",
        }
    }
}

impl FromStr for AttributeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "type" | "job_type" | "job_types" => Ok(AttributeKind::JobType),
            "sector" | "job_sector" | "job_sectors" => Ok(AttributeKind::Sector),
            "education" | "education_level" | "education_levels" => Ok(AttributeKind::EducationLevel),
            other => Err(format!("unknown attribute kind: {}", other)),
        }
    }
}
