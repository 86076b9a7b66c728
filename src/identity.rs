//! Owner and group name resolution.

use uzers::{get_group_by_gid, get_user_by_uid};

/// Maps numeric owner/group ids to display names.
///
/// `None` means the id has no resolvable name; callers fall back to the
/// numeric form and record the lookup failure.
pub trait IdentityResolver {
    fn user_name(&self, uid: u32) -> Option<String>;
    fn group_name(&self, gid: u32) -> Option<String>;
}

/// [`IdentityResolver`] backed by the system user and group databases.
pub struct SystemIdentityResolver;

impl IdentityResolver for SystemIdentityResolver {
    fn user_name(&self, uid: u32) -> Option<String> {
        get_user_by_uid(uid)
            .map(|user| user.name().to_string_lossy().into_owned())
            .filter(|name| !name.is_empty())
    }

    fn group_name(&self, gid: u32) -> Option<String> {
        get_group_by_gid(gid)
            .map(|group| group.name().to_string_lossy().into_owned())
            .filter(|name| !name.is_empty())
    }
}
