//! # Access
//!
//! Capability checks for mutating entry points. A pool has exactly one
//! creator and a fixed set of admins; admins may only change contribution
//! limits. Each check authenticates the caller before comparing identities.

use soroban_sdk::{Address, Env, Vec};

use crate::types::{PoolConfig, Role};
use crate::Error;

pub fn role_of(config: &PoolConfig, address: &Address) -> Option<Role> {
    if *address == config.creator {
        Some(Role::Creator)
    } else if config.admins.contains(address) {
        Some(Role::Admin)
    } else {
        None
    }
}

pub fn require_creator(config: &PoolConfig, caller: &Address) -> Result<(), Error> {
    caller.require_auth();
    match role_of(config, caller) {
        Some(Role::Creator) => Ok(()),
        _ => Err(Error::NotAuthorized),
    }
}

pub fn require_creator_or_admin(config: &PoolConfig, caller: &Address) -> Result<(), Error> {
    caller.require_auth();
    match role_of(config, caller) {
        Some(_) => Ok(()),
        None => Err(Error::NotAuthorized),
    }
}

/// Drop duplicate admins and the creator itself from an admin list.
pub fn normalize_admins(env: &Env, creator: &Address, admins: &Vec<Address>) -> Vec<Address> {
    let mut unique = Vec::new(env);
    for admin in admins.iter() {
        if admin != *creator && !unique.contains(&admin) {
            unique.push_back(admin);
        }
    }
    unique
}
