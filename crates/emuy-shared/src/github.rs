//! The subset of the GitHub REST API responses the DevOps page uses, plus the
//! client side summaries built from them

use std::fmt::Display;

use anyhow::bail;
use chrono::{DateTime, Utc};

/// `owner/name` of a repository
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct RepoRef {
    owner: String,
    name: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct Commit {
    pub sha: String,
    pub commit: CommitDetails,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub author: Option<GitHubUser>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct CommitDetails {
    pub message: String,
    #[serde(default)]
    pub author: Option<CommitAuthor>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct CommitAuthor {
    pub name: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct GitHubUser {
    pub login: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct WorkflowRuns {
    pub total_count: u64,
    pub workflow_runs: Vec<WorkflowRun>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct WorkflowRun {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub head_branch: Option<String>,
    #[serde(default)]
    pub run_number: u64,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub conclusion: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct Workflows {
    pub total_count: u64,
    pub workflows: Vec<Workflow>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct Workflow {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub status: CompareStatus,
    pub ahead_by: u64,
    pub behind_by: u64,
    #[serde(default)]
    pub total_commits: u64,
    #[serde(default)]
    pub commits: Vec<Commit>,
    #[serde(default)]
    pub files: Vec<ChangedFile>,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CompareStatus {
    Ahead,
    Behind,
    Identical,
    Diverged,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    pub filename: String,
    pub status: String,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
}

/// What the branch compare view shows above the file list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffSummary {
    pub status: CompareStatus,
    pub ahead_by: u64,
    pub behind_by: u64,
    pub files_changed: usize,
    pub additions: u64,
    pub deletions: u64,
}

/// Result of asking GitHub to merge one branch into another
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    Merged { sha: String },
    /// Base already contains head
    NothingToMerge,
}

/// Collapsed view of a run's `status` and `conclusion` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Queued,
    InProgress,
    Success,
    Failure,
    Cancelled,
    Skipped,
    Unknown,
}

impl RepoRef {
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl TryFrom<String> for RepoRef {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let Some((owner, name)) = value.trim().split_once('/') else {
            bail!("expected a repository in the form owner/name but got {value:?}");
        };
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            bail!("expected a repository in the form owner/name but got {value:?}");
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl From<RepoRef> for String {
    fn from(value: RepoRef) -> Self {
        value.full_name()
    }
}

impl Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl Commit {
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }

    /// First line of the commit message
    pub fn title(&self) -> &str {
        self.commit.message.lines().next().unwrap_or_default()
    }

    pub fn author_name(&self) -> &str {
        if let Some(user) = &self.author {
            return &user.login;
        }
        self.commit
            .author
            .as_ref()
            .map(|a| a.name.as_str())
            .unwrap_or("unknown")
    }
}

impl Comparison {
    pub fn summary(&self) -> DiffSummary {
        DiffSummary {
            status: self.status,
            ahead_by: self.ahead_by,
            behind_by: self.behind_by,
            files_changed: self.files.len(),
            additions: self.files.iter().map(|f| f.additions).sum(),
            deletions: self.files.iter().map(|f| f.deletions).sum(),
        }
    }
}

impl DiffSummary {
    /// Merging only makes sense if head has something base does not
    pub fn can_merge(&self) -> bool {
        self.ahead_by > 0 && self.status != CompareStatus::Identical
    }
}

impl Display for CompareStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            CompareStatus::Ahead => "ahead",
            CompareStatus::Behind => "behind",
            CompareStatus::Identical => "identical",
            CompareStatus::Diverged => "diverged",
        };
        write!(f, "{text}")
    }
}

impl WorkflowRun {
    pub fn state(&self) -> RunState {
        match (self.status.as_deref(), self.conclusion.as_deref()) {
            (Some("completed"), Some("success")) => RunState::Success,
            (Some("completed"), Some("failure" | "timed_out" | "startup_failure")) => {
                RunState::Failure
            }
            (Some("completed"), Some("cancelled")) => RunState::Cancelled,
            (Some("completed"), Some("skipped" | "neutral")) => RunState::Skipped,
            (Some("queued" | "waiting" | "pending" | "requested"), _) => RunState::Queued,
            (Some("in_progress"), _) => RunState::InProgress,
            _ => RunState::Unknown,
        }
    }
}

impl Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            RunState::Queued => "Queued",
            RunState::InProgress => "In Progress",
            RunState::Success => "Success",
            RunState::Failure => "Failure",
            RunState::Cancelled => "Cancelled",
            RunState::Skipped => "Skipped",
            RunState::Unknown => "Unknown",
        };
        write!(f, "{text}")
    }
}
