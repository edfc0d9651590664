//! Summaries for the repository, pull request and workflow dashboards

mod pulls;
mod repositories;
mod workflows;

pub use pulls::{PullRequestState, PullRequestStats, PullRequestSummary};
pub use repositories::{
    categorize_repository, summarize_repositories, tech_stack, Repository, RepositorySummary,
};
pub use workflows::{
    badge_url, latest_runs_by_branch, RepositoryRef, Workflow, WorkflowRun, WorkflowStatus,
};

use chrono::{DateTime, Utc};

use crate::view::parse_timestamp;

/// Relative age such as `5m ago`; older than a week prints the date
///
/// Unparseable input is returned unchanged.
pub fn format_time_ago(timestamp: &str, now: DateTime<Utc>) -> String {
    let Some(then) = parse_timestamp(timestamp) else {
        return timestamp.to_string();
    };
    let seconds = (now - then).num_seconds();

    match seconds {
        s if s < 60 => "just now".to_string(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s if s < 604_800 => format!("{}d ago", s / 86_400),
        _ => then.format("%Y-%m-%d").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_time_ago() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        assert_eq!(format_time_ago("2024-06-10T11:59:30Z", now), "just now");
        assert_eq!(format_time_ago("2024-06-10T11:55:00Z", now), "5m ago");
        assert_eq!(format_time_ago("2024-06-10T09:00:00Z", now), "3h ago");
        assert_eq!(format_time_ago("2024-06-08T12:00:00Z", now), "2d ago");
        assert_eq!(format_time_ago("2024-05-01T00:00:00Z", now), "2024-05-01");
        assert_eq!(format_time_ago("someday", now), "someday");
    }
}
