//! Region definitions shared by locators and members: the inbound creation
//! request, resolved attributes and the configuration sent to the cluster.

pub mod attributes;
pub mod config_builder;

use serde::{Deserialize, Serialize};

pub use attributes::{resolve, DataPolicy, PartitionSpec, RegionAttributes, RegionType};
pub use config_builder::{build, check_type_policy, short_name_of};

pub const REGION_SEPARATOR: char = '/';

/// Body of `POST /v2/regions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRegionRequest {
    #[serde(rename = "name")]
    pub full_name: String,
    #[serde(rename = "type")]
    pub type_tag: String,
}

impl CreateRegionRequest {
    pub fn new(full_name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            type_tag: type_tag.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionConfig {
    short_name: String,
    attributes: RegionAttributes,
}

impl RegionConfig {
    pub(crate) fn new(short_name: String, attributes: RegionAttributes) -> Self {
        Self {
            short_name,
            attributes,
        }
    }
    pub fn short_name(&self) -> &str {
        &self.short_name
    }
    pub fn attributes(&self) -> &RegionAttributes {
        &self.attributes
    }
}
