use std::sync::Arc;

use async_trait::async_trait;

use super::dispatcher::RegionCreateDispatcher;
use crate::{
    config::ManagementConfig,
    general::{
        function::{http_executor::HttpFunctionExecutor, ClusterManagementResult, FunctionExecutor},
        region::{build, check_type_policy, CreateRegionRequest, RegionConfig},
    },
    result::{MgmtDispatchErr, MgmtResult},
    sys::{LogicalModule, LogicalModuleNewArgs},
    util::JoinHandleWrapper,
};

/// Locator side of region management: validates requests and fans them out.
pub struct RegionMaster {
    dispatcher: RegionCreateDispatcher,
    reject_unknown_type: bool,
}

#[async_trait]
impl LogicalModule for RegionMaster {
    fn inner_new(args: LogicalModuleNewArgs) -> Self
    where
        Self: Sized,
    {
        let management = args.nodes_config.management.clone();
        Self::with_executor(
            &management,
            Arc::new(HttpFunctionExecutor::new(args.nodes_config)),
        )
    }
    async fn start(&self) -> MgmtResult<Vec<JoinHandleWrapper>> {
        tracing::info!(
            "start as locator, region commands go to group {}",
            self.dispatcher.target_group()
        );
        Ok(vec![])
    }
}

impl RegionMaster {
    pub fn with_executor(management: &ManagementConfig, executor: Arc<dyn FunctionExecutor>) -> Self {
        Self {
            dispatcher: RegionCreateDispatcher::new(
                executor,
                management.admin_group.clone(),
                management.dispatch_timeout(),
            ),
            reject_unknown_type: management.reject_unknown_type,
        }
    }

    /// Checks the request without contacting anyone.
    pub fn validate(&self, request: &CreateRegionRequest) -> MgmtResult<RegionConfig> {
        let config = build(request)?;
        check_type_policy(request, &config, self.reject_unknown_type)?;
        Ok(config)
    }

    /// Succeeds only when every member of the admin group created (or already
    /// had) the region. Any member failure comes back as `MemberExecution`
    /// carrying the whole report.
    pub async fn create_region(
        &self,
        request: &CreateRegionRequest,
    ) -> MgmtResult<ClusterManagementResult> {
        let config = self.validate(request).map_err(|err| {
            tracing::info!("reject create region {:?}: {:?}", request, err);
            err
        })?;

        let result = self.dispatcher.dispatch(request, config).await?;
        if !result.is_successful() {
            tracing::warn!(
                "create region {} failed on members:\n{}",
                request.full_name,
                result.combined_error_message()
            );
            return Err(MgmtDispatchErr::MemberExecution {
                target_path: request.full_name.clone(),
                result,
            }
            .into());
        }
        tracing::info!(
            "region {} created on members {:?}",
            request.full_name,
            result.succeeded_members().collect::<Vec<_>>()
        );
        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use super::*;
    use crate::{
        general::test_utils::{MemberBehavior, TestExecutor},
        result::MgmtValidationErr,
    };

    fn master(executor: Arc<TestExecutor>, management: ManagementConfig) -> RegionMaster {
        RegionMaster::with_executor(&management, executor)
    }

    #[tokio::test]
    async fn created_on_every_member() {
        let executor = Arc::new(TestExecutor::new(vec![
            ("server-1", MemberBehavior::Healthy),
            ("server-2", MemberBehavior::Healthy),
        ]));
        let master = master(executor.clone(), ManagementConfig::default());
        let result = master
            .create_region(&CreateRegionRequest::new("sales", "PARTITION"))
            .await
            .unwrap();
        assert_eq!(
            result.succeeded_members().collect::<Vec<_>>(),
            vec!["server-1", "server-2"]
        );
        for member in ["server-1", "server-2"] {
            let cache = executor.member_cache(member).unwrap();
            assert_eq!(cache.get_region("/sales").unwrap().short_name(), "sales");
        }

        // second request is skipped by members but still reported as success
        let result = master
            .create_region(&CreateRegionRequest::new("sales", "PARTITION"))
            .await
            .unwrap();
        assert!(result.is_successful());
        assert_eq!(executor.sent_commands().len(), 2);
    }

    #[tokio::test]
    async fn invalid_name_never_dispatched() {
        let executor = Arc::new(TestExecutor::new(vec![("server-1", MemberBehavior::Healthy)]));
        let master = master(executor.clone(), ManagementConfig::default());
        for name in ["/", ""] {
            let err = master
                .create_region(&CreateRegionRequest::new(name, "PARTITION"))
                .await
                .unwrap_err();
            assert!(!err.was_attempted());
            assert!(matches!(
                err.as_mgmt_validation_err(),
                Some(MgmtValidationErr::InvalidName { .. })
            ));
        }
        assert!(executor.sent_commands().is_empty());
    }

    #[tokio::test]
    async fn unknown_type_follows_config() {
        let executor = Arc::new(TestExecutor::new(vec![("server-1", MemberBehavior::Healthy)]));
        let lenient = master(executor.clone(), ManagementConfig::default());
        let _ = lenient
            .create_region(&CreateRegionRequest::new("loose", "LOCAL"))
            .await
            .unwrap();
        assert_eq!(executor.sent_commands().len(), 1);

        let strict = master(
            executor.clone(),
            ManagementConfig {
                reject_unknown_type: true,
                ..Default::default()
            },
        );
        let err = strict
            .create_region(&CreateRegionRequest::new("strict", "LOCAL"))
            .await
            .unwrap_err();
        assert!(!err.was_attempted());
        assert_eq!(executor.sent_commands().len(), 1);
    }

    #[tokio::test]
    async fn partial_failure_lists_failed_members() {
        let executor = Arc::new(TestExecutor::new(vec![
            ("server-1", MemberBehavior::Healthy),
            ("server-2", MemberBehavior::Failing("disk full".to_owned())),
        ]));
        let master = master(executor, ManagementConfig::default());
        let err = master
            .create_region(&CreateRegionRequest::new("sales", "REPLICATE"))
            .await
            .unwrap_err();
        assert!(err.was_attempted());
        match err.as_mgmt_dispatch_err() {
            Some(MgmtDispatchErr::MemberExecution {
                target_path,
                result,
            }) => {
                assert_eq!(target_path, "sales");
                assert_eq!(result.succeeded_members().collect::<Vec<_>>(), vec!["server-1"]);
                assert_eq!(result.combined_error_message(), "server-2 -> disk full");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn timeout_from_config() {
        let executor = Arc::new(TestExecutor::new(vec![(
            "server-1",
            MemberBehavior::Slow(Duration::from_secs(30)),
        )]));
        let master = master(
            executor,
            ManagementConfig {
                dispatch_timeout_ms: 20,
                ..Default::default()
            },
        );
        let err = master
            .create_region(&CreateRegionRequest::new("sales", "REPLICATE"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_mgmt_dispatch_err(),
            Some(MgmtDispatchErr::Timeout { .. })
        ));
    }
}
