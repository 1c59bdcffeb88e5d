use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::{
    general::region::{RegionConfig, REGION_SEPARATOR},
    result::MgmtResult,
    sys::{LogicalModule, LogicalModuleNewArgs},
    util::JoinHandleWrapper,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionCreated {
    Inserted,
    /// The path was taken and the caller asked to skip existing regions.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionCreateErr {
    AlreadyExists,
    ParentMissing { parent: String },
}

/// Regions hosted by this member, keyed by full path.
pub struct RegionCache {
    member_name: String,
    regions: RwLock<BTreeMap<String, RegionConfig>>,
}

#[async_trait]
impl LogicalModule for RegionCache {
    fn inner_new(args: LogicalModuleNewArgs) -> Self
    where
        Self: Sized,
    {
        let (id, this) = &args.nodes_config.this;
        Self::new(this.member_name(*id))
    }
    async fn start(&self) -> MgmtResult<Vec<JoinHandleWrapper>> {
        tracing::info!("start as member {}", self.member_name);
        Ok(vec![])
    }
}

/// `"a/b"` and `"/a/b"` name the same region.
pub fn normalize_path(path: &str) -> String {
    if path.starts_with(REGION_SEPARATOR) {
        path.to_owned()
    } else {
        format!("{}{}", REGION_SEPARATOR, path)
    }
}

fn parent_path(path: &str) -> Option<&str> {
    match path.rfind(REGION_SEPARATOR) {
        Some(0) | None => None,
        Some(idx) => Some(&path[..idx]),
    }
}

impl RegionCache {
    pub fn new(member_name: impl Into<String>) -> Self {
        Self {
            member_name: member_name.into(),
            regions: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn member_name(&self) -> &str {
        &self.member_name
    }

    pub fn get_region(&self, path: &str) -> Option<RegionConfig> {
        self.regions.read().get(&normalize_path(path)).cloned()
    }

    pub fn region_paths(&self) -> Vec<String> {
        self.regions.read().keys().cloned().collect()
    }

    /// Inserts the region under `path`. Subregions need their parent to exist.
    /// The existence check and the insert happen under one write guard.
    pub fn create_region(
        &self,
        path: &str,
        config: RegionConfig,
        skip_if_exists: bool,
    ) -> Result<RegionCreated, RegionCreateErr> {
        let path = normalize_path(path);
        let mut regions = self.regions.write();
        if regions.contains_key(&path) {
            if skip_if_exists {
                return Ok(RegionCreated::Skipped);
            }
            return Err(RegionCreateErr::AlreadyExists);
        }
        if let Some(parent) = parent_path(&path) {
            if !regions.contains_key(parent) {
                return Err(RegionCreateErr::ParentMissing {
                    parent: parent.to_owned(),
                });
            }
        }
        tracing::debug!("member {} creates region {}", self.member_name, path);
        let _ = regions.insert(path, config);
        Ok(RegionCreated::Inserted)
    }
}
