use super::m_region_cache::{normalize_path, RegionCache, RegionCreateErr, RegionCreated};
use crate::general::function::{CreationCommand, MemberFunctionResult, Status};

/// Applies a creation command on this member. Never fails outright: every
/// outcome is reported back as a status for the locator to aggregate.
pub fn execute(cache: &RegionCache, cmd: CreationCommand) -> MemberFunctionResult {
    let member = cache.member_name().to_owned();
    let path = normalize_path(&cmd.target_path);

    let status = match cache.create_region(&path, cmd.config, cmd.skip_if_exists) {
        Ok(RegionCreated::Inserted) => {
            tracing::info!("region {} created on {}", path, member);
            Status::success(format!("Region \"{}\" created on \"{}\"", path, member))
        }
        Ok(RegionCreated::Skipped) => {
            tracing::info!("region {} already exists on {}, skipping", path, member);
            Status::success(format!(
                "Skipping \"{}\". Region \"{}\" already exists.",
                member, path
            ))
        }
        Err(RegionCreateErr::AlreadyExists) => Status::failure(format!(
            "Region with path \"{}\" already exists on \"{}\"",
            path, member
        )),
        Err(RegionCreateErr::ParentMissing { parent }) => {
            tracing::warn!("parent {} of {} missing on {}", parent, path, member);
            Status::failure(format!("Parent region for \"{}\" does not exist.", path))
        }
    };
    MemberFunctionResult { member, status }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::general::region::{build, CreateRegionRequest};

    fn command(path: &str, skip_if_exists: bool) -> CreationCommand {
        CreationCommand {
            target_path: path.to_owned(),
            config: build(&CreateRegionRequest::new(path, "PARTITION")).unwrap(),
            skip_if_exists,
            target_group: "cluster".to_owned(),
        }
    }

    #[test]
    fn creates_then_skips() {
        let cache = RegionCache::new("server-1");
        let res = execute(&cache, command("sales", true));
        assert_eq!(res.member, "server-1");
        assert_eq!(
            res.status,
            Status::success("Region \"/sales\" created on \"server-1\"")
        );

        let res = execute(&cache, command("/sales", true));
        assert_eq!(
            res.status,
            Status::success("Skipping \"server-1\". Region \"/sales\" already exists.")
        );
    }

    #[test]
    fn existing_region_without_skip_fails() {
        let cache = RegionCache::new("server-1");
        assert!(execute(&cache, command("/sales", true)).status.is_success());
        let res = execute(&cache, command("/sales", false));
        assert_eq!(
            res.status,
            Status::failure("Region with path \"/sales\" already exists on \"server-1\"")
        );
    }

    #[test]
    fn sub_region_needs_parent() {
        let cache = RegionCache::new("server-1");
        let res = execute(&cache, command("/a/b", true));
        assert_eq!(
            res.status,
            Status::failure("Parent region for \"/a/b\" does not exist.")
        );
        assert!(execute(&cache, command("/a", true)).status.is_success());
        assert!(execute(&cache, command("/a/b", true)).status.is_success());
        assert_eq!(cache.get_region("/a/b").unwrap().short_name(), "b");
    }

    #[test]
    fn racing_skips_both_succeed() {
        for _ in 0..200 {
            let cache = std::sync::Arc::new(RegionCache::new("server-1"));
            let barrier = std::sync::Arc::new(std::sync::Barrier::new(2));
            let handles = (0..2)
                .map(|_| {
                    let cache = cache.clone();
                    let barrier = barrier.clone();
                    std::thread::spawn(move || {
                        let _ = barrier.wait();
                        execute(&cache, command("/sales", true))
                    })
                })
                .collect::<Vec<_>>();
            for handle in handles {
                assert!(handle.join().unwrap().status.is_success());
            }
        }
    }
}
