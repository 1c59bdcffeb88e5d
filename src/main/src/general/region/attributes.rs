use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataPolicy {
    /// Entries are sharded across members.
    Partition,
    /// Every member holds a full copy.
    Replicate,
    /// No policy was chosen, the member falls back to its own default.
    Unset,
}

/// Partition tuning. Every knob is optional, the default leaves all of them
/// to the member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colocated_with: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_max_memory_mb: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovery_delay_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redundant_copies: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startup_recovery_delay_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_max_memory_mb: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_num_buckets: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition_resolver: Option<String>,
}

/// `partition_spec` is present exactly when `data_policy` is `Partition`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRegionAttributes")]
pub struct RegionAttributes {
    data_policy: DataPolicy,
    #[serde(skip_serializing_if = "Option::is_none")]
    partition_spec: Option<PartitionSpec>,
}

#[derive(Deserialize)]
struct RawRegionAttributes {
    data_policy: DataPolicy,
    #[serde(default)]
    partition_spec: Option<PartitionSpec>,
}

impl TryFrom<RawRegionAttributes> for RegionAttributes {
    type Error = String;

    fn try_from(raw: RawRegionAttributes) -> Result<Self, Self::Error> {
        match (raw.data_policy, raw.partition_spec) {
            (DataPolicy::Partition, Some(spec)) => Ok(Self::partition(spec)),
            (DataPolicy::Partition, None) => Err("PARTITION requires a partition_spec".to_owned()),
            (policy, Some(_)) => Err(format!("{:?} must not carry a partition_spec", policy)),
            (DataPolicy::Replicate, None) => Ok(Self::replicate()),
            (DataPolicy::Unset, None) => Ok(Self::unset()),
        }
    }
}

impl RegionAttributes {
    pub fn partition(spec: PartitionSpec) -> Self {
        Self {
            data_policy: DataPolicy::Partition,
            partition_spec: Some(spec),
        }
    }
    pub fn replicate() -> Self {
        Self {
            data_policy: DataPolicy::Replicate,
            partition_spec: None,
        }
    }
    pub fn unset() -> Self {
        Self {
            data_policy: DataPolicy::Unset,
            partition_spec: None,
        }
    }
    pub fn data_policy(&self) -> DataPolicy {
        self.data_policy
    }
    pub fn partition_spec(&self) -> Option<&PartitionSpec> {
        self.partition_spec.as_ref()
    }
}

/// Type tags accepted by the management API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionType {
    Partition,
    Replicate,
}

impl RegionType {
    pub const ALL: [RegionType; 2] = [RegionType::Partition, RegionType::Replicate];

    pub fn tag(self) -> &'static str {
        match self {
            RegionType::Partition => "PARTITION",
            RegionType::Replicate => "REPLICATE",
        }
    }

    /// Exact, case sensitive match on the tag text.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }

    pub fn attributes(self) -> RegionAttributes {
        match self {
            RegionType::Partition => RegionAttributes::partition(PartitionSpec::default()),
            RegionType::Replicate => RegionAttributes::replicate(),
        }
    }
}

/// Maps a type tag to its attributes. Unknown tags, the empty one included,
/// resolve to `DataPolicy::Unset` instead of failing.
pub fn resolve(type_tag: &str) -> RegionAttributes {
    RegionType::from_tag(type_tag)
        .map(RegionType::attributes)
        .unwrap_or_else(RegionAttributes::unset)
}
