//! Outbound currency movements that a callee pulls from the pool.
//!
//! A contract that calls `transfer(pool, ..)` on the pool's behalf needs the
//! pool's authorisation for that exact sub-invocation; [`authorize_pull`]
//! grants it for the current call only.

use soroban_sdk::{
    auth::{ContractContext, InvokerContractAuthEntry, SubContractInvocation},
    symbol_short, token, vec, Address, Env, IntoVal, Symbol, Val, Vec,
};

pub fn authorize_pull(env: &Env, asset: &Address, to: &Address, amount: i128) {
    let pool = env.current_contract_address();
    env.authorize_as_current_contract(vec![
        env,
        InvokerContractAuthEntry::Contract(SubContractInvocation {
            context: ContractContext {
                contract: asset.clone(),
                fn_name: symbol_short!("transfer"),
                args: (pool, to.clone(), amount).into_val(env),
            },
            sub_invocations: Vec::new(env),
        }),
    ]);
}

/// Send `amount` of currency to `target`.
///
/// With a callback, `target.callback(pool, amount)` is invoked with a
/// pre-authorised pull of `amount`; whatever the target leaves unpulled is
/// pushed afterwards. Another pool's `deposit` fits this shape.
pub fn forward(env: &Env, currency: &Address, target: &Address, amount: i128, callback: &Option<Symbol>) {
    let pool = env.current_contract_address();
    let client = token::Client::new(env, currency);

    match callback {
        None => {
            if amount > 0 {
                client.transfer(&pool, target, &amount);
            }
        }
        Some(function) => {
            let before = client.balance(&pool);
            authorize_pull(env, currency, target, amount);

            let args: Vec<Val> = (pool.clone(), amount).into_val(env);
            env.invoke_contract::<Val>(target, function, args);

            let pulled = before - client.balance(&pool);
            if pulled < amount {
                client.transfer(&pool, target, &(amount - pulled));
            }
        }
    }
}
