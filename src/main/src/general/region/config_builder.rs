use super::{resolve, CreateRegionRequest, DataPolicy, RegionConfig, REGION_SEPARATOR};
use crate::result::{MgmtResult, MgmtValidationErr};

/// Last segment of a path-like region name, `None` when it is blank.
pub fn short_name_of(full_name: &str) -> Option<&str> {
    let last = full_name.rsplit(REGION_SEPARATOR).next()?;
    if last.trim().is_empty() {
        None
    } else {
        Some(last)
    }
}

/// Turns a creation request into the configuration every member will apply.
/// Pure: the same request always yields an equal config.
pub fn build(request: &CreateRegionRequest) -> MgmtResult<RegionConfig> {
    let short_name =
        short_name_of(&request.full_name).ok_or_else(|| MgmtValidationErr::InvalidName {
            full_name: request.full_name.clone(),
        })?;
    Ok(RegionConfig::new(
        short_name.to_owned(),
        resolve(&request.type_tag),
    ))
}

/// Rejects configs whose type tag resolved to no data policy when the
/// management config asks for it.
pub fn check_type_policy(
    request: &CreateRegionRequest,
    config: &RegionConfig,
    reject_unknown_type: bool,
) -> MgmtResult<()> {
    if reject_unknown_type && config.attributes().data_policy() == DataPolicy::Unset {
        return Err(MgmtValidationErr::UnknownType {
            type_tag: request.type_tag.clone(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::general::region::PartitionSpec;

    fn invalid_name(full_name: &str) -> bool {
        let err = build(&CreateRegionRequest::new(full_name, "REPLICATE")).unwrap_err();
        matches!(
            err.as_mgmt_validation_err(),
            Some(MgmtValidationErr::InvalidName { full_name: name }) if name == full_name
        )
    }

    #[test]
    fn short_name_is_last_segment() {
        let config = build(&CreateRegionRequest::new("/a/b/c", "REPLICATE")).unwrap();
        assert_eq!(config.short_name(), "c");
        let config = build(&CreateRegionRequest::new("/parent/child", "PARTITION")).unwrap();
        assert_eq!(config.short_name(), "child");
        let config = build(&CreateRegionRequest::new("a//b", "PARTITION")).unwrap();
        assert_eq!(config.short_name(), "b");
    }

    #[test]
    fn name_without_separator_is_kept() {
        let config = build(&CreateRegionRequest::new("region1", "PARTITION")).unwrap();
        assert_eq!(config.short_name(), "region1");
        assert_eq!(config.attributes().data_policy(), DataPolicy::Partition);
        assert_eq!(
            config.attributes().partition_spec(),
            Some(&PartitionSpec::default())
        );
    }

    #[test]
    fn blank_last_segment_is_invalid() {
        for name in ["", "/", "//", "/parent/", "   ", "/a/ "] {
            assert!(invalid_name(name), "name {:?}", name);
        }
    }

    #[test]
    fn build_is_repeatable() {
        let request = CreateRegionRequest::new("/orders/eu", "PARTITION");
        assert_eq!(build(&request).unwrap(), build(&request).unwrap());
    }

    #[test]
    fn unknown_type_builds_unset() {
        let request = CreateRegionRequest::new("orders", "LOCAL");
        let config = build(&request).unwrap();
        assert_eq!(config.attributes().data_policy(), DataPolicy::Unset);
        check_type_policy(&request, &config, false).unwrap();

        let err = check_type_policy(&request, &config, true).unwrap_err();
        assert_eq!(
            err.as_mgmt_validation_err(),
            Some(&MgmtValidationErr::UnknownType {
                type_tag: "LOCAL".to_owned()
            })
        );
        assert!(!err.was_attempted());
    }

    #[test]
    fn known_type_passes_strict_policy() {
        let request = CreateRegionRequest::new("orders", "REPLICATE");
        let config = build(&request).unwrap();
        check_type_policy(&request, &config, true).unwrap();
    }
}
