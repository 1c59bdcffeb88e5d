use std::{
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
};

use async_trait::async_trait;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::{
    config::NodesConfig,
    master::{self, m_region_master::RegionMaster},
    result::{ErrCvt, MgmtResult},
    sys::{LogicalModule, LogicalModuleNewArgs, LogicalModulesRef},
    util::JoinHandleWrapper,
    worker::{self, m_region_cache::RegionCache},
};

/// Serves the routes of whichever roles this node plays on `port + 1`.
pub struct HttpHandler {
    modules_ref: LogicalModulesRef,
    nodes_config: NodesConfig,
}

#[async_trait]
impl LogicalModule for HttpHandler {
    fn inner_new(args: LogicalModuleNewArgs) -> Self
    where
        Self: Sized,
    {
        Self {
            modules_ref: args.logical_modules_ref,
            nodes_config: args.nodes_config,
        }
    }

    async fn start(&self) -> MgmtResult<Vec<JoinHandleWrapper>> {
        let app = {
            let modules = self.modules_ref.upgrade()?;
            build_router(modules.region_master.clone(), modules.region_cache.clone())
        };

        let addr = SocketAddr::new(
            Ipv4Addr::UNSPECIFIED.into(),
            self.nodes_config.this.1.http_addr().port(),
        );
        let server = axum::Server::try_bind(&addr)
            .map_err(|err| ErrCvt(err).to_mgmt_network_err())?
            .serve(app.into_make_service());
        tracing::info!("http start on {}", addr);

        let handle = tokio::spawn(async move {
            if let Err(err) = server.await {
                tracing::error!("http server on {} stopped: {:?}", addr, err);
                return;
            }
            tracing::info!("http end on {}", addr);
        });
        Ok(vec![JoinHandleWrapper::new("http handler", handle)])
    }
}

pub fn build_router(
    region_master: Option<Arc<RegionMaster>>,
    region_cache: Option<Arc<RegionCache>>,
) -> Router {
    let mut app = Router::new();
    if let Some(region_master) = region_master {
        app = master::m_http_handler::add_routers(app, region_master);
    }
    if let Some(region_cache) = region_cache {
        app = worker::m_http_handler::add_routers(app, region_cache);
    }
    app.layer(CorsLayer::permissive())
}
