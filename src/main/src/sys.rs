use crate::{
    config::NodesConfig,
    general::network::http_handler::HttpHandler,
    master::m_region_master::RegionMaster,
    result::{MgmtResult, MgmtResultExt, MgmtRuntimeErr},
    util::JoinHandleWrapper,
    worker::m_region_cache::RegionCache,
};
use async_trait::async_trait;
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;

pub struct Sys {
    logical_modules: Arc<LogicalModules>,
    sub_tasks: Mutex<Vec<JoinHandleWrapper>>,
}

impl Drop for Sys {
    fn drop(&mut self) {
        tracing::info!("drop sys");
    }
}

impl Sys {
    pub fn new(config: NodesConfig) -> Sys {
        tracing::info!("Running at dir: {:?}", config.file_dir);

        Sys {
            logical_modules: LogicalModules::new(config),
            sub_tasks: Vec::new().into(),
        }
    }

    pub async fn wait_for_end(&mut self) {
        if let Err(err) = self.logical_modules.start(self).await {
            panic!("start logical modules error: {:?}", err);
        }
        tracing::info!("modules all started, waiting for end");
        for task in self.sub_tasks.lock().await.iter_mut() {
            task.join().await.todo_handle();
        }
    }
}

pub type NodeID = u32;

#[derive(Clone)]
pub struct LogicalModuleNewArgs {
    pub logical_modules_ref: LogicalModulesRef,
    pub nodes_config: NodesConfig,
}

#[async_trait]
pub trait LogicalModule: Send + Sync + 'static {
    fn inner_new(args: LogicalModuleNewArgs) -> Self
    where
        Self: Sized;
    async fn start(&self) -> MgmtResult<Vec<JoinHandleWrapper>>;

    async fn init(&self) -> MgmtResult<()> {
        Ok(())
    }
}

#[derive(Clone)]
pub struct LogicalModulesRef {
    inner: Weak<LogicalModules>,
}

impl LogicalModulesRef {
    pub fn upgrade(&self) -> MgmtResult<Arc<LogicalModules>> {
        self.inner
            .upgrade()
            .ok_or_else(|| MgmtRuntimeErr::ModulesDropped.into())
    }
}

macro_rules! init_module {
    ($self:ident,$opt:ident) => {
        $self.$opt.init().await?;
    };
}

macro_rules! init_module_opt {
    ($self:ident,$opt:ident) => {
        if let Some($opt) = $self.$opt.as_ref() {
            $opt.init().await?;
        }
    };
}

macro_rules! start_module {
    ($self:ident,$sys:ident,$opt:ident) => {
        $sys.sub_tasks
            .lock()
            .await
            .append(&mut $self.$opt.start().await?);
    };
}

macro_rules! start_module_opt {
    ($self:ident,$sys:ident,$opt:ident) => {
        if let Some($opt) = $self.$opt.as_ref() {
            $sys.sub_tasks.lock().await.append(&mut $opt.start().await?);
        }
    };
}

macro_rules! start_modules {
    ([$( $module:ident,$modulety:ty ),*], [$( $locator_module:ident,$locator_modulety:ty ),*], [$( $member_module:ident,$member_modulety:ty ),*]) => {
        pub struct LogicalModules {
            $( pub $module : Arc<$modulety>, )*
            $( pub $locator_module : Option<Arc<$locator_modulety>>, )*
            $( pub $member_module : Option<Arc<$member_modulety>>, )*
        }

        impl LogicalModules {
            pub fn new(config: NodesConfig) -> Arc<LogicalModules> {
                Arc::new_cyclic(|weak| {
                    let args = LogicalModuleNewArgs {
                        nodes_config: config.clone(),
                        logical_modules_ref: LogicalModulesRef {
                            inner: weak.clone(),
                        },
                    };
                    let is_locator = config.this.1.is_locator();
                    let is_member = config.this.1.is_member();
                    assert!(is_locator || is_member);

                    LogicalModules {
                        $( $module : Arc::new(<$modulety>::inner_new(args.clone())), )*
                        $( $locator_module : is_locator.then(|| Arc::new(<$locator_modulety>::inner_new(args.clone()))), )*
                        $( $member_module : is_member.then(|| Arc::new(<$member_modulety>::inner_new(args.clone()))), )*
                    }
                })
            }

            pub async fn start(&self, sys: &Sys) -> MgmtResult<()> {
                $( init_module_opt!(self, $locator_module); )*
                $( init_module_opt!(self, $member_module); )*
                $( init_module!(self, $module); )*

                $( start_module_opt!(self, sys, $locator_module); )*
                $( start_module_opt!(self, sys, $member_module); )*
                $( start_module!(self, sys, $module); )*
                Ok(())
            }
        }
    };
}

// http_handler comes last in start order, it serves routes of the role modules
start_modules!(
    [http_handler, HttpHandler],
    [region_master, RegionMaster],
    [region_cache, RegionCache]
);
