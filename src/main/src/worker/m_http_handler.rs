use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use super::{m_region_cache::RegionCache, region_create_function};
use crate::general::function::{CreationCommand, MemberFunctionResult, CREATE_REGION_FUNCTION_PATH};

pub const REGION_LIST_PATH: &str = "/functions/regions";

/// Member side function endpoints.
pub fn add_routers(router: Router, cache: Arc<RegionCache>) -> Router {
    let member_routes = Router::new()
        .route(CREATE_REGION_FUNCTION_PATH, post(handle_create_region))
        .route(REGION_LIST_PATH, get(handle_list_regions))
        .with_state(cache);
    router.merge(member_routes)
}

async fn handle_create_region(
    State(cache): State<Arc<RegionCache>>,
    Json(cmd): Json<CreationCommand>,
) -> Json<MemberFunctionResult> {
    tracing::debug!(
        "member {} handle create region {} from group {}",
        cache.member_name(),
        cmd.target_path,
        cmd.target_group
    );
    Json(region_create_function::execute(&cache, cmd))
}

async fn handle_list_regions(State(cache): State<Arc<RegionCache>>) -> Json<Vec<String>> {
    Json(cache.region_paths())
}
