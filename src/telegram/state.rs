//! Conversation cursor and the routing tables.
//!
//! Every registered chat stores the label of the last completed command. An
//! incoming update is classified (callback action or command), looked up
//! against that cursor, and resolved to a [`Route`]: what to run and which
//! cursor to store afterwards. The lookups are pure so the tables can be
//! tested without Telegram or a database.

use std::fmt;

use crate::core::types::JobStatus;
use crate::core::validation::strip_emoji;

/// Where a chat is in the menu tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cursor {
    Start,
    MainMenu,
    PostJob,
    ManageJobs,
    Jobs(JobStatus),
    JobSubscriptions,
    AddSubscription,
    AddSubscriptionSector,
    AddSubscriptionType,
    AddSubscriptionEducationLevel,
    Settings,
    Profile,
    Feedback,
    UpdateProfile,
    UpdateName,
    UpdatePhonenumber,
    /// Waiting for a CV for the job
    Applying(String),
    CancelApplication,
    /// Any other stored label, including the empty cursor of a fresh client
    Other(String),
}

impl Cursor {
    /// The label persisted in `clients.prev_command`
    pub fn label(&self) -> String {
        match self {
            Cursor::Start => "/start".to_string(),
            Cursor::MainMenu => "Main Menu".to_string(),
            Cursor::PostJob => "Post Job".to_string(),
            Cursor::ManageJobs => "Manage Jobs".to_string(),
            Cursor::Jobs(status) => status_label(*status).to_string(),
            Cursor::JobSubscriptions => "Job Subscriptions".to_string(),
            Cursor::AddSubscription => "Add Subscription".to_string(),
            Cursor::AddSubscriptionSector => "Add Subscription Sector".to_string(),
            Cursor::AddSubscriptionType => "Add Subscription Type".to_string(),
            Cursor::AddSubscriptionEducationLevel => "Add Subscription Education Level".to_string(),
            Cursor::Settings => "Settings".to_string(),
            Cursor::Profile => "Profile".to_string(),
            Cursor::Feedback => "Feedback".to_string(),
            Cursor::UpdateProfile => "Update Profile".to_string(),
            Cursor::UpdateName => "Update Name".to_string(),
            Cursor::UpdatePhonenumber => "Update Phonenumber".to_string(),
            Cursor::Applying(job_id) => format!("Apply {}", job_id),
            Cursor::CancelApplication => "Cancel Application".to_string(),
            Cursor::Other(label) => label.clone(),
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "/start" => Cursor::Start,
            "Main Menu" => Cursor::MainMenu,
            "Post Job" => Cursor::PostJob,
            "Manage Jobs" => Cursor::ManageJobs,
            "Pending" => Cursor::Jobs(JobStatus::Pending),
            "Opened" => Cursor::Jobs(JobStatus::Opened),
            "Closed" => Cursor::Jobs(JobStatus::Closed),
            "Declined" => Cursor::Jobs(JobStatus::Declined),
            "Job Subscriptions" => Cursor::JobSubscriptions,
            "Add Subscription" => Cursor::AddSubscription,
            "Add Subscription Sector" => Cursor::AddSubscriptionSector,
            "Add Subscription Type" => Cursor::AddSubscriptionType,
            "Add Subscription Education Level" => Cursor::AddSubscriptionEducationLevel,
            "Settings" => Cursor::Settings,
            "Profile" => Cursor::Profile,
            "Feedback" => Cursor::Feedback,
            "Update Profile" => Cursor::UpdateProfile,
            "Update Name" => Cursor::UpdateName,
            "Update Phonenumber" => Cursor::UpdatePhonenumber,
            "Cancel Application" => Cursor::CancelApplication,
            other => match other.strip_prefix("Apply ") {
                Some(job_id) if !job_id.is_empty() => Cursor::Applying(job_id.to_string()),
                _ => Cursor::Other(other.to_string()),
            },
        }
    }

    fn is_job_listing(&self) -> bool {
        matches!(self, Cursor::ManageJobs | Cursor::Jobs(_))
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

fn status_label(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Pending => "Pending",
        JobStatus::Opened => "Opened",
        JobStatus::Closed => "Closed",
        JobStatus::Declined => "Declined",
    }
}

/// A text message after emoji stripping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MainMenu,
    PostJob,
    ManageJobs,
    JobSubscriptions,
    Settings,
    ListJobs(JobStatus),
    AddSubscription,
    EditSubscriptions,
    Profile,
    Feedback,
    UpdateProfile,
    Skip,
    CancelApplication,
    Start,
    StartApply(String),
    Text(String),
}

impl Command {
    pub fn parse(raw: &str) -> Self {
        let text = strip_emoji(raw);
        match text.as_str() {
            "Main Menu" => Command::MainMenu,
            "Post Job" => Command::PostJob,
            "Manage Jobs" => Command::ManageJobs,
            "Job Subscriptions" => Command::JobSubscriptions,
            "Settings" => Command::Settings,
            "Pending" => Command::ListJobs(JobStatus::Pending),
            "Opened" => Command::ListJobs(JobStatus::Opened),
            "Closed" => Command::ListJobs(JobStatus::Closed),
            "Declined" => Command::ListJobs(JobStatus::Declined),
            "Add Subscription" => Command::AddSubscription,
            "Edit Subscriptions" => Command::EditSubscriptions,
            "Profile" => Command::Profile,
            "Feedback" => Command::Feedback,
            "Update Profile" => Command::UpdateProfile,
            "Skip" => Command::Skip,
            "Cancel Application" => Command::CancelApplication,
            "/start" => Command::Start,
            _ => match text.strip_prefix("/start apply_") {
                Some(job_id) => Command::StartApply(job_id.to_string()),
                None => Command::Text(text),
            },
        }
    }

    /// The command text as typed, without emoji
    pub fn label(&self) -> String {
        match self {
            Command::MainMenu => "Main Menu".to_string(),
            Command::PostJob => "Post Job".to_string(),
            Command::ManageJobs => "Manage Jobs".to_string(),
            Command::JobSubscriptions => "Job Subscriptions".to_string(),
            Command::Settings => "Settings".to_string(),
            Command::ListJobs(status) => status_label(*status).to_string(),
            Command::AddSubscription => "Add Subscription".to_string(),
            Command::EditSubscriptions => "Edit Subscriptions".to_string(),
            Command::Profile => "Profile".to_string(),
            Command::Feedback => "Feedback".to_string(),
            Command::UpdateProfile => "Update Profile".to_string(),
            Command::Skip => "Skip".to_string(),
            Command::CancelApplication => "Cancel Application".to_string(),
            Command::Start => "/start".to_string(),
            Command::StartApply(job_id) => format!("/start apply_{}", job_id),
            Command::Text(text) => text.clone(),
        }
    }
}

/// Inline button payloads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    CloseJob(String),
    ViewJob(String),
    RemoveSubscription(String),
    AddSector(String),
    AddType { subscription_id: String, value: String },
    AddEducationLevel { subscription_id: String, value: String },
    AddExperience { subscription_id: String, value: String },
}

impl CallbackAction {
    pub fn parse(raw: &str) -> Option<Self> {
        let data = strip_emoji(raw);
        if let Some(id) = data.strip_prefix("job/close/") {
            return Some(CallbackAction::CloseJob(id.to_string()));
        }
        if let Some(id) = data.strip_prefix("job/view/") {
            return Some(CallbackAction::ViewJob(id.to_string()));
        }
        if let Some(id) = data.strip_prefix("subscription/remove/") {
            return Some(CallbackAction::RemoveSubscription(id.to_string()));
        }
        if let Some(id) = data.strip_prefix("subscription/add/sector/") {
            return Some(CallbackAction::AddSector(id.to_string()));
        }

        let rest = data.strip_prefix("subscription/")?;
        if let Some((subscription_id, value)) = wizard_step(rest, "/add/type/") {
            return Some(CallbackAction::AddType { subscription_id, value });
        }
        if let Some((subscription_id, value)) = wizard_step(rest, "/add/education_level/") {
            return Some(CallbackAction::AddEducationLevel { subscription_id, value });
        }
        if let Some((subscription_id, value)) = wizard_step(rest, "/add/experience/") {
            return Some(CallbackAction::AddExperience { subscription_id, value });
        }
        None
    }

    pub fn data(&self) -> String {
        match self {
            CallbackAction::CloseJob(id) => format!("job/close/{}", id),
            CallbackAction::ViewJob(id) => format!("job/view/{}", id),
            CallbackAction::RemoveSubscription(id) => format!("subscription/remove/{}", id),
            CallbackAction::AddSector(id) => format!("subscription/add/sector/{}", id),
            CallbackAction::AddType { subscription_id, value } => {
                format!("subscription/{}/add/type/{}", subscription_id, value)
            }
            CallbackAction::AddEducationLevel { subscription_id, value } => {
                format!("subscription/{}/add/education_level/{}", subscription_id, value)
            }
            CallbackAction::AddExperience { subscription_id, value } => {
                format!("subscription/{}/add/experience/{}", subscription_id, value)
            }
        }
    }
}

/// `<sub>/add/<field>/<value>` split at the first marker; both halves non-empty.
fn wizard_step(rest: &str, marker: &str) -> Option<(String, String)> {
    let (subscription_id, value) = rest.split_once(marker)?;
    if subscription_id.is_empty() || value.is_empty() {
        return None;
    }
    Some((subscription_id.to_string(), value.to_string()))
}

/// Result of one subscription wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StepOutcome {
    Modified = 1,
    NotFound = 2,
    Error = 3,
}

/// Cursor stored after a callback action, given the step outcome.
///
/// `None` keeps the current cursor.
pub fn callback_next_cursor(action: &CallbackAction, outcome: StepOutcome) -> Option<Cursor> {
    match (action, outcome) {
        (CallbackAction::AddSector(_), _) => Some(Cursor::AddSubscriptionSector),
        (CallbackAction::AddType { .. }, StepOutcome::NotFound) => Some(Cursor::JobSubscriptions),
        (CallbackAction::AddType { .. }, StepOutcome::Modified) => Some(Cursor::AddSubscriptionType),
        (CallbackAction::AddEducationLevel { .. }, StepOutcome::NotFound) => Some(Cursor::JobSubscriptions),
        (CallbackAction::AddEducationLevel { .. }, StepOutcome::Modified) => {
            Some(Cursor::AddSubscriptionEducationLevel)
        }
        (CallbackAction::AddExperience { .. }, StepOutcome::NotFound | StepOutcome::Modified) => {
            Some(Cursor::JobSubscriptions)
        }
        _ => None,
    }
}

/// Whether a callback action is accepted with the given cursor.
///
/// Job details can be opened from anywhere; everything else only from the
/// menu that produced the button.
pub fn callback_allowed(cursor: &Cursor, action: &CallbackAction) -> bool {
    match action {
        CallbackAction::ViewJob(_) => true,
        CallbackAction::CloseJob(_) => *cursor == Cursor::Jobs(JobStatus::Opened),
        CallbackAction::RemoveSubscription(_) => *cursor == Cursor::JobSubscriptions,
        CallbackAction::AddSector(_) => *cursor == Cursor::AddSubscription,
        CallbackAction::AddType { .. } => *cursor == Cursor::AddSubscriptionSector,
        CallbackAction::AddEducationLevel { .. } => *cursor == Cursor::AddSubscriptionType,
        CallbackAction::AddExperience { .. } => *cursor == Cursor::AddSubscriptionEducationLevel,
    }
}

/// What a plain command resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    MainMenu,
    PostJob,
    ManageJobs,
    ListJobs(JobStatus),
    JobSubscriptions,
    ShowSectors,
    EditSubscriptions,
    Settings,
    ShowProfile,
    PromptFeedback,
    ReceiveFeedback,
    PromptName,
    UpdateName,
    PromptPhone,
    UpdatePhone,
    PromptCategory,
    UpdateCategory,
    FinishProfileUpdate,
    InitApply(String),
}

/// An action plus the cursor to store when it succeeds or fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub action: Action,
    pub on_success: Option<Cursor>,
    pub on_failure: Option<Cursor>,
}

impl Route {
    /// Cursor is stored whatever the outcome
    pub fn always(action: Action, cursor: Cursor) -> Self {
        Self {
            action,
            on_success: Some(cursor.clone()),
            on_failure: Some(cursor),
        }
    }

    /// Cursor is stored only when the handler reports success
    pub fn on_success(action: Action, cursor: Cursor) -> Self {
        Self {
            action,
            on_success: Some(cursor),
            on_failure: None,
        }
    }

    pub fn keep(action: Action) -> Self {
        Self {
            action,
            on_success: None,
            on_failure: None,
        }
    }

    pub fn next_cursor(&self, succeeded: bool) -> Option<&Cursor> {
        if succeeded {
            self.on_success.as_ref()
        } else {
            self.on_failure.as_ref()
        }
    }
}

/// Commands that only mean something inside a sub menu.
pub fn scoped_route(cursor: &Cursor, command: &Command) -> Option<Route> {
    if cursor.is_job_listing() {
        if let Command::ListJobs(status) = command {
            return Some(Route::always(Action::ListJobs(*status), Cursor::Jobs(*status)));
        }
        return None;
    }

    match (cursor, command) {
        (Cursor::JobSubscriptions, Command::AddSubscription) => {
            Some(Route::always(Action::ShowSectors, Cursor::AddSubscription))
        }
        (Cursor::JobSubscriptions, Command::EditSubscriptions) => Some(Route::keep(Action::EditSubscriptions)),

        (Cursor::Settings, Command::Profile) => Some(Route::always(Action::ShowProfile, Cursor::Profile)),
        (Cursor::Settings, Command::Feedback) => Some(Route::always(Action::PromptFeedback, Cursor::Feedback)),

        (Cursor::Feedback, Command::MainMenu) => Some(Route::always(Action::MainMenu, Cursor::MainMenu)),
        (Cursor::Feedback, _) => Some(Route::on_success(Action::ReceiveFeedback, Cursor::MainMenu)),

        (Cursor::Profile, Command::UpdateProfile) => Some(Route::always(Action::PromptName, Cursor::UpdateProfile)),

        (Cursor::UpdateProfile, Command::Skip) => Some(Route::always(Action::PromptPhone, Cursor::UpdateName)),
        (Cursor::UpdateProfile, Command::MainMenu) => Some(Route::always(Action::MainMenu, Cursor::MainMenu)),
        (Cursor::UpdateProfile, _) => Some(Route::on_success(Action::UpdateName, Cursor::UpdateName)),

        (Cursor::UpdateName, Command::Skip) => {
            Some(Route::always(Action::PromptCategory, Cursor::UpdatePhonenumber))
        }
        (Cursor::UpdateName, Command::MainMenu) => Some(Route::always(Action::MainMenu, Cursor::MainMenu)),
        (Cursor::UpdateName, _) => Some(Route::on_success(Action::UpdatePhone, Cursor::UpdatePhonenumber)),

        (Cursor::UpdatePhonenumber, Command::Skip) => {
            Some(Route::always(Action::FinishProfileUpdate, Cursor::Profile))
        }
        (Cursor::UpdatePhonenumber, Command::MainMenu) => Some(Route::always(Action::MainMenu, Cursor::MainMenu)),
        (Cursor::UpdatePhonenumber, _) => Some(Route::on_success(Action::UpdateCategory, Cursor::Profile)),

        _ => None,
    }
}

/// Commands available from anywhere.
pub fn global_route(command: &Command) -> Option<Route> {
    match command {
        Command::MainMenu => Some(Route::always(Action::MainMenu, Cursor::MainMenu)),
        Command::PostJob => Some(Route::always(Action::PostJob, Cursor::PostJob)),
        Command::ManageJobs => Some(Route::always(Action::ManageJobs, Cursor::ManageJobs)),
        Command::JobSubscriptions => Some(Route::always(Action::JobSubscriptions, Cursor::JobSubscriptions)),
        Command::Settings => Some(Route::always(Action::Settings, Cursor::Settings)),
        Command::StartApply(job_id) => Some(Route {
            action: Action::InitApply(job_id.clone()),
            on_success: Some(Cursor::Applying(job_id.clone())),
            on_failure: Some(Cursor::Other(command.label())),
        }),
        Command::Start => Some(Route::always(Action::MainMenu, Cursor::Start)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cursor_label_roundtrip() {
        let cursors = vec![
            Cursor::Start,
            Cursor::MainMenu,
            Cursor::PostJob,
            Cursor::ManageJobs,
            Cursor::Jobs(JobStatus::Pending),
            Cursor::Jobs(JobStatus::Opened),
            Cursor::Jobs(JobStatus::Closed),
            Cursor::Jobs(JobStatus::Declined),
            Cursor::JobSubscriptions,
            Cursor::AddSubscription,
            Cursor::AddSubscriptionSector,
            Cursor::AddSubscriptionType,
            Cursor::AddSubscriptionEducationLevel,
            Cursor::Settings,
            Cursor::Profile,
            Cursor::Feedback,
            Cursor::UpdateProfile,
            Cursor::UpdateName,
            Cursor::UpdatePhonenumber,
            Cursor::Applying("JB-42".into()),
            Cursor::CancelApplication,
            Cursor::Other("/start apply_JB-9".into()),
            Cursor::Other(String::new()),
        ];
        for cursor in cursors {
            assert_eq!(Cursor::from_label(&cursor.label()), cursor);
        }
    }

    #[test]
    fn test_apply_prefix_needs_an_id() {
        assert_eq!(Cursor::from_label("Apply "), Cursor::Other("Apply ".into()));
    }

    #[test]
    fn test_command_parse_strips_emoji() {
        assert_eq!(Command::parse("🔙 Main Menu"), Command::MainMenu);
        assert_eq!(Command::parse("⌛ Pending"), Command::ListJobs(JobStatus::Pending));
        assert_eq!(Command::parse("↖️ Skip"), Command::Skip);
        assert_eq!(Command::parse("📝 Edit Subscriptions"), Command::EditSubscriptions);
        assert_eq!(Command::parse("/start apply_JB-1"), Command::StartApply("JB-1".into()));
        assert_eq!(Command::parse("/start"), Command::Start);
        assert_eq!(Command::parse("  hello  "), Command::Text("hello".into()));
        assert_eq!(Command::parse(""), Command::Text(String::new()));
    }

    #[test]
    fn test_callback_parse() {
        assert_eq!(CallbackAction::parse("job/close/JB-1"), Some(CallbackAction::CloseJob("JB-1".into())));
        assert_eq!(CallbackAction::parse("job/view/JB-1"), Some(CallbackAction::ViewJob("JB-1".into())));
        assert_eq!(
            CallbackAction::parse("subscription/remove/SB-1"),
            Some(CallbackAction::RemoveSubscription("SB-1".into()))
        );
        assert_eq!(
            CallbackAction::parse("subscription/add/sector/JS-1"),
            Some(CallbackAction::AddSector("JS-1".into()))
        );
        assert_eq!(
            CallbackAction::parse("subscription/SB-1/add/type/any"),
            Some(CallbackAction::AddType {
                subscription_id: "SB-1".into(),
                value: "any".into()
            })
        );
        assert_eq!(
            CallbackAction::parse("subscription/SB-1/add/experience/10+ years"),
            Some(CallbackAction::AddExperience {
                subscription_id: "SB-1".into(),
                value: "10+ years".into()
            })
        );
        assert_eq!(CallbackAction::parse("subscription//add/type/x"), None);
        assert_eq!(CallbackAction::parse(""), None);
        assert_eq!(CallbackAction::parse("something/else"), None);
    }

    #[test]
    fn test_callback_data_roundtrip() {
        let action = CallbackAction::AddEducationLevel {
            subscription_id: "SB-1".into(),
            value: "EL-2".into(),
        };
        assert_eq!(CallbackAction::parse(&action.data()), Some(action));
    }

    #[test]
    fn test_callbacks_are_scoped_to_their_menu() {
        let close = CallbackAction::CloseJob("JB-1".into());
        assert!(callback_allowed(&Cursor::Jobs(JobStatus::Opened), &close));
        assert!(!callback_allowed(&Cursor::Jobs(JobStatus::Closed), &close));

        let view = CallbackAction::ViewJob("JB-1".into());
        assert!(callback_allowed(&Cursor::Jobs(JobStatus::Opened), &view));
        assert!(callback_allowed(&Cursor::Other(String::new()), &view));

        let experience = CallbackAction::AddExperience {
            subscription_id: "SB-1".into(),
            value: "Any".into(),
        };
        assert!(callback_allowed(&Cursor::AddSubscriptionEducationLevel, &experience));
        assert!(!callback_allowed(&Cursor::AddSubscriptionType, &experience));
    }

    #[test]
    fn test_wizard_cursor_transitions() {
        let sector = CallbackAction::AddSector("JS-1".into());
        let job_type = CallbackAction::AddType {
            subscription_id: "SB".into(),
            value: "JT".into(),
        };
        let education = CallbackAction::AddEducationLevel {
            subscription_id: "SB".into(),
            value: "EL".into(),
        };
        let experience = CallbackAction::AddExperience {
            subscription_id: "SB".into(),
            value: "Any".into(),
        };

        assert_eq!(callback_next_cursor(&sector, StepOutcome::Error), Some(Cursor::AddSubscriptionSector));
        assert_eq!(callback_next_cursor(&job_type, StepOutcome::Modified), Some(Cursor::AddSubscriptionType));
        assert_eq!(callback_next_cursor(&job_type, StepOutcome::NotFound), Some(Cursor::JobSubscriptions));
        assert_eq!(callback_next_cursor(&job_type, StepOutcome::Error), None);
        assert_eq!(
            callback_next_cursor(&education, StepOutcome::Modified),
            Some(Cursor::AddSubscriptionEducationLevel)
        );
        assert_eq!(callback_next_cursor(&education, StepOutcome::Error), None);
        assert_eq!(callback_next_cursor(&experience, StepOutcome::Modified), Some(Cursor::JobSubscriptions));
        assert_eq!(callback_next_cursor(&experience, StepOutcome::NotFound), Some(Cursor::JobSubscriptions));
        assert_eq!(callback_next_cursor(&experience, StepOutcome::Error), None);
        assert_eq!(
            callback_next_cursor(&CallbackAction::CloseJob("JB".into()), StepOutcome::Modified),
            None
        );
    }

    #[test]
    fn test_step_outcome_codes() {
        assert_eq!(StepOutcome::Modified as u8, 1);
        assert_eq!(StepOutcome::NotFound as u8, 2);
        assert_eq!(StepOutcome::Error as u8, 3);
    }

    #[test]
    fn test_job_listing_routes() {
        for cursor in [Cursor::ManageJobs, Cursor::Jobs(JobStatus::Closed)] {
            let route = scoped_route(&cursor, &Command::ListJobs(JobStatus::Opened)).unwrap();
            assert_eq!(route, Route::always(Action::ListJobs(JobStatus::Opened), Cursor::Jobs(JobStatus::Opened)));
        }
        assert_eq!(scoped_route(&Cursor::ManageJobs, &Command::MainMenu), None);
        assert_eq!(scoped_route(&Cursor::MainMenu, &Command::ListJobs(JobStatus::Opened)), None);
    }

    #[test]
    fn test_free_text_routes() {
        let text = Command::Text("Great bot".into());
        assert_eq!(
            scoped_route(&Cursor::Feedback, &text),
            Some(Route::on_success(Action::ReceiveFeedback, Cursor::MainMenu))
        );
        assert_eq!(
            scoped_route(&Cursor::UpdateProfile, &text),
            Some(Route::on_success(Action::UpdateName, Cursor::UpdateName))
        );
        assert_eq!(
            scoped_route(&Cursor::UpdateName, &text),
            Some(Route::on_success(Action::UpdatePhone, Cursor::UpdatePhonenumber))
        );
        assert_eq!(
            scoped_route(&Cursor::UpdatePhonenumber, &text),
            Some(Route::on_success(Action::UpdateCategory, Cursor::Profile))
        );
        assert_eq!(scoped_route(&Cursor::Profile, &text), None);
    }

    #[test]
    fn test_profile_skip_chain() {
        assert_eq!(
            scoped_route(&Cursor::UpdateProfile, &Command::Skip).unwrap().on_success,
            Some(Cursor::UpdateName)
        );
        assert_eq!(
            scoped_route(&Cursor::UpdateName, &Command::Skip).unwrap().on_success,
            Some(Cursor::UpdatePhonenumber)
        );
        assert_eq!(
            scoped_route(&Cursor::UpdatePhonenumber, &Command::Skip).unwrap().on_success,
            Some(Cursor::Profile)
        );
    }

    #[test]
    fn test_edit_subscriptions_keeps_cursor() {
        let route = scoped_route(&Cursor::JobSubscriptions, &Command::EditSubscriptions).unwrap();
        assert_eq!(route.next_cursor(true), None);
        assert_eq!(route.next_cursor(false), None);
    }

    #[test]
    fn test_global_routes() {
        assert_eq!(
            global_route(&Command::Settings),
            Some(Route::always(Action::Settings, Cursor::Settings))
        );
        assert_eq!(global_route(&Command::Start), Some(Route::always(Action::MainMenu, Cursor::Start)));

        let apply = global_route(&Command::StartApply("JB-7".into())).unwrap();
        assert_eq!(apply.next_cursor(true), Some(&Cursor::Applying("JB-7".into())));
        assert_eq!(apply.next_cursor(false), Some(&Cursor::Other("/start apply_JB-7".into())));

        assert_eq!(global_route(&Command::Text("hi".into())), None);
        assert_eq!(global_route(&Command::Skip), None);
    }
}
