//! # Fees
//!
//! The pool only knows the fee manager through the narrow interface below.
//! The fee is fixed when the pool pays the presale and parked in
//! `fees_owed` until someone pushes it to the fee manager.

use soroban_sdk::{contractclient, Address, Env, Vec};

use crate::math::ONE_UNIT;
use crate::types::PoolConfig;
use crate::Error;

/// Fee rates must stay strictly below 50%.
pub const MAX_FEE_RATE: i128 = ONE_UNIT / 2;

#[allow(dead_code)]
#[contractclient(name = "FeeManagerClient")]
pub trait FeeManager {
    fn create(env: Env, pool: Address, fees_per_unit: i128, recipients: Vec<Address>);
    fn fee_rate(env: Env, pool: Address) -> i128;
    fn collect_fees(env: Env, pool: Address, amount: i128);
    fn distribute_fees(env: Env, pool: Address) -> i128;
    fn discount_fees(
        env: Env,
        pool: Address,
        team_member: Address,
        team_rate: i128,
        recipients_rate: i128,
    );
}

pub fn client<'a>(env: &Env, config: &PoolConfig) -> FeeManagerClient<'a> {
    FeeManagerClient::new(env, &config.fee_manager)
}

pub fn validate_rate(fees_per_unit: i128) -> Result<(), Error> {
    if fees_per_unit < 0 {
        return Err(Error::InvalidAmount);
    }
    if fees_per_unit >= MAX_FEE_RATE {
        return Err(Error::FeeTooHigh);
    }
    Ok(())
}
