//! Contract with the distributed execution engine: the command shipped to
//! members and the per-member report that comes back.

pub mod http_executor;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{general::region::RegionConfig, result::MgmtResult};

pub const CREATE_REGION_FUNCTION_PATH: &str = "/functions/create-region";

/// What every member of `target_group` is asked to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationCommand {
    pub target_path: String,
    pub config: RegionConfig,
    pub skip_if_exists: bool,
    pub target_group: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusResult {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub result: StatusResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Status {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            result: StatusResult::Success,
            message: Some(message.into()),
        }
    }
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            result: StatusResult::Failure,
            message: Some(message.into()),
        }
    }
    pub fn is_success(&self) -> bool {
        self.result == StatusResult::Success
    }
}

/// Reply of one member to a function call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberFunctionResult {
    pub member: String,
    pub status: Status,
}

/// Outcome of one command across the members of a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterManagementResult {
    member_statuses: BTreeMap<String, Status>,
}

impl ClusterManagementResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// A second report for the same member never hides a failure.
    pub fn add_member_status(&mut self, member: impl Into<String>, status: Status) {
        let member = member.into();
        match self.member_statuses.get_mut(&member) {
            None => {
                let _ = self.member_statuses.insert(member, status);
            }
            Some(old) => {
                tracing::warn!(
                    "member {} reported twice, had {:?}, got {:?}",
                    member,
                    old,
                    status
                );
                if old.is_success() {
                    *old = status;
                }
            }
        }
    }

    pub fn member_statuses(&self) -> &BTreeMap<String, Status> {
        &self.member_statuses
    }

    /// True when every member that reported succeeded.
    pub fn is_successful(&self) -> bool {
        self.member_statuses.values().all(Status::is_success)
    }

    pub fn failed_members(&self) -> impl Iterator<Item = (&str, &Status)> {
        self.member_statuses
            .iter()
            .filter(|(_, s)| !s.is_success())
            .map(|(m, s)| (m.as_str(), s))
    }

    pub fn succeeded_members(&self) -> impl Iterator<Item = &str> {
        self.member_statuses
            .iter()
            .filter(|(_, s)| s.is_success())
            .map(|(m, _)| m.as_str())
    }

    /// One `member -> message` line per failed member.
    pub fn combined_error_message(&self) -> String {
        self.failed_members()
            .map(|(member, status)| {
                format!("{} -> {}", member, status.message.as_deref().unwrap_or(""))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Submission point of the execution engine. Implementations find the live
/// members of `group`, run `cmd` on each and report one status per member.
/// Retries and partial-failure policy stay inside the engine.
#[async_trait]
pub trait FunctionExecutor: Send + Sync + 'static {
    async fn execute_on_group(
        &self,
        group: &str,
        cmd: &CreationCommand,
    ) -> MgmtResult<ClusterManagementResult>;
}
