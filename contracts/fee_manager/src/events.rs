use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScheduleCreated {
    pub pool: Address,
    pub team_rate: i128,
    pub recipients_rate: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeesCollected {
    pub pool: Address,
    pub amount: i128,
    pub team_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeesClaimed {
    pub recipient: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeesDiscounted {
    pub pool: Address,
    pub signer: Address,
    pub team_rate: i128,
    pub recipients_rate: i128,
}

pub fn publish_created(env: &Env, event: ScheduleCreated) {
    env.events()
        .publish((symbol_short!("created"), event.pool.clone()), event);
}

pub fn publish_collected(env: &Env, event: FeesCollected) {
    env.events()
        .publish((symbol_short!("collected"), event.pool.clone()), event);
}

pub fn publish_claimed(env: &Env, event: FeesClaimed) {
    env.events()
        .publish((symbol_short!("claimed"), event.recipient.clone()), event);
}

pub fn publish_discounted(env: &Env, event: FeesDiscounted) {
    env.events()
        .publish((symbol_short!("discount"), event.pool.clone()), event);
}
