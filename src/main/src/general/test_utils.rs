use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{
    general::function::{ClusterManagementResult, CreationCommand, FunctionExecutor, Status},
    result::{MgmtDispatchErr, MgmtResult},
    worker::{m_region_cache::RegionCache, region_create_function},
};

#[derive(Debug, Clone)]
pub enum MemberBehavior {
    Healthy,
    Failing(String),
    /// Answers like a healthy member after the delay.
    Slow(Duration),
}

/// In-process execution engine, every member owns its own region cache.
pub struct TestExecutor {
    members: Vec<(Arc<RegionCache>, MemberBehavior)>,
    sent: Mutex<Vec<(String, CreationCommand)>>,
}

impl TestExecutor {
    pub fn new(members: Vec<(&str, MemberBehavior)>) -> Self {
        Self {
            members: members
                .into_iter()
                .map(|(name, behavior)| (Arc::new(RegionCache::new(name)), behavior))
                .collect(),
            sent: Mutex::new(vec![]),
        }
    }

    /// Every `(group, command)` pair submitted so far.
    pub fn sent_commands(&self) -> Vec<(String, CreationCommand)> {
        self.sent.lock().clone()
    }

    pub fn member_cache(&self, name: &str) -> Option<Arc<RegionCache>> {
        self.members
            .iter()
            .find(|(cache, _)| cache.member_name() == name)
            .map(|(cache, _)| cache.clone())
    }
}

#[async_trait]
impl FunctionExecutor for TestExecutor {
    async fn execute_on_group(
        &self,
        group: &str,
        cmd: &CreationCommand,
    ) -> MgmtResult<ClusterManagementResult> {
        self.sent.lock().push((group.to_owned(), cmd.clone()));
        if self.members.is_empty() {
            return Err(MgmtDispatchErr::NoMembers {
                target_group: group.to_owned(),
            }
            .into());
        }

        let mut result = ClusterManagementResult::new();
        for (cache, behavior) in &self.members {
            let status = match behavior {
                MemberBehavior::Healthy => region_create_function::execute(cache, cmd.clone()).status,
                MemberBehavior::Failing(msg) => Status::failure(msg.clone()),
                MemberBehavior::Slow(delay) => {
                    tokio::time::sleep(*delay).await;
                    region_create_function::execute(cache, cmd.clone()).status
                }
            };
            result.add_member_status(cache.member_name(), status);
        }
        Ok(result)
    }
}
