use crate::{
    result::{MgmtConfigErr, MgmtResult},
    sys::NodeID,
};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap, HashSet},
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_ADMIN_GROUP: &str = "cluster";

#[derive(Debug, Clone)]
pub struct NodesConfig {
    pub peers: HashMap<NodeID, NodeConfig>,
    pub this: (NodeID, NodeConfig),
    pub file_dir: PathBuf,
    pub management: ManagementConfig,
}

impl NodesConfig {
    pub fn this_node(&self) -> NodeID {
        self.this.0
    }
    pub fn node_cnt(&self) -> usize {
        self.peers.len() + 1
    }
    pub fn get_locator_node(&self) -> Option<NodeID> {
        self.all_nodes_iter()
            .find(|(_, config)| config.is_locator())
            .map(|(id, _)| *id)
    }
    /// Members eligible for management commands sent to `group`, ordered by node id.
    pub fn group_members(&self, group: &str) -> BTreeMap<NodeID, &NodeConfig> {
        self.all_nodes_iter()
            .filter(|(_, config)| config.is_member() && config.groups.contains(group))
            .map(|(id, config)| (*id, config))
            .collect()
    }
    pub fn all_nodes_iter<'a>(&'a self) -> impl Iterator<Item = (&'a NodeID, &'a NodeConfig)> {
        self.peers.iter().chain(Some((&self.this.0, &self.this.1)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    pub addr: SocketAddr,
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    name: Option<String>,
    pub spec: HashSet<String>,
    #[serde(default)]
    pub groups: HashSet<String>,
}

impl NodeConfig {
    pub fn new(addr: SocketAddr, spec: HashSet<String>, groups: HashSet<String>) -> Self {
        Self {
            addr,
            domain: None,
            name: None,
            spec,
            groups,
        }
    }
    pub fn is_locator(&self) -> bool {
        self.spec.contains("locator")
    }
    pub fn is_member(&self) -> bool {
        self.spec.contains("member")
    }
    #[cfg(test)]
    pub fn set_domain(&mut self, domain: Option<String>) {
        self.domain = domain;
    }
    #[cfg(test)]
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }
    pub fn member_name(&self, id: NodeID) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("node-{}", id))
    }
    fn get_http_domain<'a>(&'a self) -> Option<&'a str> {
        self.domain
            .as_ref()
            .filter(|d| {
                let ok = d.starts_with("http://") || d.starts_with("https://");
                if !ok {
                    tracing::warn!(
                        "Current domain is {}, domain should starts with http:// or https://",
                        d
                    );
                }
                ok
            })
            .map(|d| d.trim_end_matches('/'))
    }

    /// `None` when `addr` already uses the last port.
    pub fn http_port(&self) -> Option<u16> {
        self.addr.port().checked_add(1)
    }

    /// `read_config` refuses nodes without an http port.
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.addr.ip(), self.addr.port().saturating_add(1))
    }

    pub fn http_url(&self) -> String {
        self.get_http_domain()
            .map(|d| d.to_string())
            .unwrap_or_else(|| format!("http://{}", self.http_addr()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagementConfig {
    /// Group whose members receive region creation commands.
    pub admin_group: String,
    pub dispatch_timeout_ms: u64,
    /// Refuse type tags that resolve to no data policy instead of creating an UNSET region.
    pub reject_unknown_type: bool,
}

impl Default for ManagementConfig {
    fn default() -> Self {
        Self {
            admin_group: DEFAULT_ADMIN_GROUP.to_owned(),
            dispatch_timeout_ms: 10000,
            reject_unknown_type: false,
        }
    }
}

impl ManagementConfig {
    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_millis(self.dispatch_timeout_ms)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct YamlConfig {
    #[serde(default)]
    pub management: ManagementConfig,
    pub nodes: HashMap<NodeID, NodeConfig>,
}

fn read_yaml_config(file_path: impl AsRef<Path>) -> MgmtResult<YamlConfig> {
    let path = file_path.as_ref().to_owned();
    let file = std::fs::File::open(&path).map_err(|err| MgmtConfigErr::Open {
        path: path.clone(),
        err,
    })?;
    let config = serde_yaml::from_reader(file).map_err(|err| MgmtConfigErr::Decode { path, err })?;
    Ok(config)
}

pub fn read_config(this_id: NodeID, file_path: impl AsRef<Path>) -> MgmtResult<NodesConfig> {
    tracing::info!("Running at dir: {:?}", std::env::current_dir());
    let config_path = file_path.as_ref().join("files/node_config.yaml");
    let mut yaml_config = read_yaml_config(config_path)?;

    let this = yaml_config
        .nodes
        .remove(&this_id)
        .ok_or(MgmtConfigErr::ThisNodeMissing(this_id))?;
    if !this.is_locator() && !this.is_member() {
        return Err(MgmtConfigErr::NoRole(this_id).into());
    }

    let config = NodesConfig {
        this: (this_id, this),
        peers: yaml_config.nodes,
        file_dir: file_path.as_ref().to_path_buf(),
        management: yaml_config.management,
    };
    check_nodes(&config)?;
    Ok(config)
}

fn check_nodes(config: &NodesConfig) -> MgmtResult<()> {
    let mut nodes = config.all_nodes_iter().collect::<Vec<_>>();
    nodes.sort_by_key(|(id, _)| **id);

    let mut member_names: HashMap<String, NodeID> = HashMap::new();
    for (&id, node) in nodes {
        if node.http_port().is_none() {
            return Err(MgmtConfigErr::NoHttpPort(id).into());
        }
        if !node.is_member() {
            continue;
        }
        let name = node.member_name(id);
        if let Some(first) = member_names.get(&name) {
            return Err(MgmtConfigErr::DuplicateMemberName {
                name,
                nodes: (*first, id),
            }
            .into());
        }
        let _ = member_names.insert(name, id);
    }
    Ok(())
}
