//! Access policy: pure decision functions over (principal, resource,
//! operation). No I/O; callers load the target resource first, so a missing
//! resource is reported as not-found before ownership is ever considered.

use crate::{
    auth::claims::{Principal, Role},
    entries::repo::Entry,
    error::ApiError,
};

/// Which rows a list operation may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    All,
    Owner(i32),
}

/// Admins list every entry; regular users only their own.
pub fn entry_list_scope(principal: &Principal) -> ListScope {
    match principal.role {
        Role::Admin => ListScope::All,
        Role::Regular => ListScope::Owner(principal.user_id),
    }
}

/// Admins list every account; regular users see a singleton of themselves.
pub fn account_list_scope(principal: &Principal) -> ListScope {
    match principal.role {
        Role::Admin => ListScope::All,
        Role::Regular => ListScope::Owner(principal.user_id),
    }
}

/// Reading a single entry: admins may read any, owners their own.
pub fn can_read_entry(principal: &Principal, entry: &Entry) -> Result<(), ApiError> {
    match principal.role {
        Role::Admin => Ok(()),
        Role::Regular if entry.user_id == principal.user_id => Ok(()),
        Role::Regular => Err(ApiError::Forbidden),
    }
}

/// Updating or deleting an entry is strictly owner-only. There is no admin
/// override for other people's diary entries.
pub fn can_modify_entry(principal: &Principal, entry: &Entry) -> Result<(), ApiError> {
    if entry.user_id == principal.user_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Reading an account: admins may read any, everyone may read themselves.
pub fn can_read_account(principal: &Principal, target_id: i32) -> Result<(), ApiError> {
    match principal.role {
        Role::Admin => Ok(()),
        Role::Regular if target_id == principal.user_id => Ok(()),
        Role::Regular => Err(ApiError::Forbidden),
    }
}

/// Deleting an account is admin-only.
pub fn can_delete_account(principal: &Principal) -> Result<(), ApiError> {
    match principal.role {
        Role::Admin => Ok(()),
        Role::Regular => Err(ApiError::Forbidden),
    }
}
