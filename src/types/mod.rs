mod dev_summary;
mod issue;
mod link;
mod remote_link;
mod sprint;
mod transition;
mod user;

pub use dev_summary::{DevSummary, InstanceType, PullRequest};
pub use issue::{FixVersion, Ticket};
pub use link::IssueLink;
pub use remote_link::{RemoteLink, WikiPage};
pub use sprint::{earliest_start, Sprint};
pub use transition::Transition;
pub use user::UserAccount;
