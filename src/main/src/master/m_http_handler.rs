use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::m_region_master::RegionMaster;
use crate::{
    general::region::{short_name_of, CreateRegionRequest},
    result::{MgmtDispatchErr, MgmtError},
};

pub const MANAGEMENT_API_VERSION: &str = "/v2";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedMember {
    pub member: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagementResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_members: Vec<FailedMember>,
}

impl ManagementResponse {
    fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Default::default()
        }
    }
}

/// Locator side management endpoints.
pub fn add_routers(router: Router, master: Arc<RegionMaster>) -> Router {
    let management_routes = Router::new()
        .route(
            &format!("{}/regions", MANAGEMENT_API_VERSION),
            post(handle_create_region),
        )
        .with_state(master);
    router.merge(management_routes)
}

/// Created regions are reported under `/v2/regions/<short_name>`, without the
/// `/geode` context prefix older management servers put in front of it.
async fn handle_create_region(
    State(master): State<Arc<RegionMaster>>,
    request: Result<Json<CreateRegionRequest>, JsonRejection>,
) -> (StatusCode, Json<ManagementResponse>) {
    let Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => {
            tracing::info!("reject malformed create region body: {}", rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(ManagementResponse::message(rejection.body_text())),
            );
        }
    };
    tracing::debug!("handle create region {:?}", request);
    match master.create_region(&request).await {
        Ok(_result) => {
            // validated before dispatch, so the short name is there
            let short_name = short_name_of(&request.full_name).unwrap_or(&request.full_name);
            (
                StatusCode::CREATED,
                Json(ManagementResponse {
                    metadata: Some(Metadata {
                        url: format!("{}/regions/{}", MANAGEMENT_API_VERSION, short_name),
                    }),
                    ..Default::default()
                }),
            )
        }
        Err(err) => error_response(err),
    }
}

fn error_response(err: MgmtError) -> (StatusCode, Json<ManagementResponse>) {
    let (status, resp) = match err {
        MgmtError::MgmtValidationErr(err) => (
            StatusCode::BAD_REQUEST,
            ManagementResponse::message(format!("{:?}", err)),
        ),
        MgmtError::MgmtDispatchErr(MgmtDispatchErr::Timeout {
            target_group,
            after,
        }) => (
            StatusCode::GATEWAY_TIMEOUT,
            ManagementResponse::message(format!(
                "members of group {} did not answer within {:?}",
                target_group, after
            )),
        ),
        MgmtError::MgmtDispatchErr(MgmtDispatchErr::NoMembers { .. }) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ManagementResponse::message("no members found to create cache element"),
        ),
        MgmtError::MgmtDispatchErr(MgmtDispatchErr::MemberExecution { result, .. }) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ManagementResponse {
                metadata: None,
                message: Some(result.combined_error_message()),
                failed_members: result
                    .failed_members()
                    .map(|(member, status)| FailedMember {
                        member: member.to_owned(),
                        message: status.message.clone().unwrap_or_default(),
                    })
                    .collect(),
            },
        ),
        err => {
            tracing::error!("create region failed: {:?}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ManagementResponse::message(err.to_string()),
            )
        }
    };
    (status, Json(resp))
}
