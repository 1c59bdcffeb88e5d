use async_trait::async_trait;
use futures::future::join_all;

use super::{
    ClusterManagementResult, CreationCommand, FunctionExecutor, MemberFunctionResult, Status,
    CREATE_REGION_FUNCTION_PATH,
};
use crate::{
    config::NodesConfig,
    result::{MgmtDispatchErr, MgmtResult},
};

/// Runs commands on members by posting them to each member's http endpoint.
pub struct HttpFunctionExecutor {
    nodes_config: NodesConfig,
    client: reqwest::Client,
}

impl HttpFunctionExecutor {
    pub fn new(nodes_config: NodesConfig) -> Self {
        Self {
            nodes_config,
            client: reqwest::Client::new(),
        }
    }

    async fn call_member(&self, member: &str, url: String, cmd: &CreationCommand) -> Status {
        #[cfg(feature = "rpc-log")]
        tracing::debug!("call {} on member {} with {:?}", url, member, cmd);

        let resp = match self.client.post(&url).json(cmd).send().await {
            Ok(resp) => resp,
            Err(err) => {
                tracing::warn!("member {} unreachable at {}: {}", member, url, err);
                return Status::failure(format!("request to {} failed: {}", url, err));
            }
        };
        let http_status = resp.status();
        if !http_status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!("member {} replied {}: {}", member, http_status, body);
            return Status::failure(format!("member replied {}: {}", http_status, body));
        }
        match resp.json::<MemberFunctionResult>().await {
            Ok(res) => res.status,
            Err(err) => Status::failure(format!("invalid member reply: {}", err)),
        }
    }
}

#[async_trait]
impl FunctionExecutor for HttpFunctionExecutor {
    async fn execute_on_group(
        &self,
        group: &str,
        cmd: &CreationCommand,
    ) -> MgmtResult<ClusterManagementResult> {
        let members = self.nodes_config.group_members(group);
        if members.is_empty() {
            return Err(MgmtDispatchErr::NoMembers {
                target_group: group.to_owned(),
            }
            .into());
        }

        let calls = members.iter().map(|(id, node)| {
            let member = node.member_name(*id);
            let url = format!("{}{}", node.http_url(), CREATE_REGION_FUNCTION_PATH);
            async move {
                let status = self.call_member(&member, url, cmd).await;
                (member, status)
            }
        });

        let mut result = ClusterManagementResult::new();
        for (member, status) in join_all(calls).await {
            result.add_member_status(member, status);
        }
        Ok(result)
    }
}
