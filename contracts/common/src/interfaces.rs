use soroban_sdk::{contractclient, Env};

use crate::ContractError;

/// Funding hook every staking pool exposes to the reward distributor.
///
/// The distributor transfers reward tokens to the pool first and then calls
/// `notify_funded` with the same amount. The pool authenticates the call
/// against its configured distributor address.
#[contractclient(name = "PoolFundingClient")]
pub trait PoolFundingInterface {
    fn notify_funded(env: Env, amount: i128) -> Result<(), ContractError>;
}
