use std::{sync::Arc, time::Duration};

use crate::{
    general::{
        function::{ClusterManagementResult, CreationCommand, FunctionExecutor},
        region::{CreateRegionRequest, RegionConfig},
    },
    result::{MgmtDispatchErr, MgmtResult},
};

/// Whatever the execution engine reported, untouched.
pub type DispatchOutcome = ClusterManagementResult;

/// Single submission point for region creation commands.
pub struct RegionCreateDispatcher {
    executor: Arc<dyn FunctionExecutor>,
    target_group: String,
    timeout: Duration,
}

impl RegionCreateDispatcher {
    pub fn new(
        executor: Arc<dyn FunctionExecutor>,
        target_group: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            executor,
            target_group: target_group.into(),
            timeout,
        }
    }

    pub fn target_group(&self) -> &str {
        &self.target_group
    }

    /// The command carries the full requested path, not the short name.
    pub fn command_for(&self, request: &CreateRegionRequest, config: RegionConfig) -> CreationCommand {
        CreationCommand {
            target_path: request.full_name.clone(),
            config,
            skip_if_exists: true,
            target_group: self.target_group.clone(),
        }
    }

    pub async fn dispatch(
        &self,
        request: &CreateRegionRequest,
        config: RegionConfig,
    ) -> MgmtResult<DispatchOutcome> {
        let cmd = self.command_for(request, config);
        tracing::debug!(
            "dispatch create region {} to group {}",
            cmd.target_path,
            cmd.target_group
        );

        match tokio::time::timeout(self.timeout, self.executor.execute_on_group(&self.target_group, &cmd))
            .await
        {
            Ok(res) => res,
            Err(_) => {
                tracing::error!(
                    "create region {} on group {} timed out after {:?}",
                    cmd.target_path,
                    self.target_group,
                    self.timeout
                );
                Err(MgmtDispatchErr::Timeout {
                    target_group: self.target_group.clone(),
                    after: self.timeout,
                }
                .into())
            }
        }
    }
}
