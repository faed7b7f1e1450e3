use anchor_lang::prelude::*;
use instructions::*;
use state::UpkeepStatus;

pub mod error;
pub mod instructions;
pub mod state;

declare_id!("8omLD5ZQgiYB72N5hEsPVUWGX1V55CbKAYbbRvXFAznc");

#[program]
pub mod vrf_raffle {
    use super::*;

    pub fn initialize(
        ctx: Context<Initialize>,
        entrance_fee: u64,
        interval: i64,
        gas_lane: [u8; 32],
        subscription_id: u64,
        callback_gas_limit: u32,
    ) -> Result<()> {
        instructions::initialize::initialize(
            ctx,
            entrance_fee,
            interval,
            gas_lane,
            subscription_id,
            callback_gas_limit,
        )
    }

    pub fn init_subscription(
        ctx: Context<InitSubscription>,
        subscription_id: u64,
        fee_per_word: u64,
    ) -> Result<()> {
        instructions::init_subscription::init_subscription(ctx, subscription_id, fee_per_word)
    }

    pub fn fund_subscription(ctx: Context<FundSubscription>, amount: u64) -> Result<()> {
        instructions::fund_subscription::fund_subscription(ctx, amount)
    }

    pub fn enter_raffle(ctx: Context<EnterRaffle>, amount: u64) -> Result<()> {
        instructions::enter_raffle::enter_raffle(ctx, amount)
    }

    pub fn check_upkeep(ctx: Context<CheckUpkeep>) -> Result<UpkeepStatus> {
        instructions::check_upkeep::check_upkeep(ctx)
    }

    pub fn request_upkeep(ctx: Context<RequestUpkeep>) -> Result<bool> {
        instructions::request_upkeep::request_upkeep(ctx)
    }

    pub fn fulfill_randomness(
        ctx: Context<FulfillRandomness>,
        request_id: u64,
        randomness: [u8; 32],
    ) -> Result<()> {
        instructions::fulfill_randomness::fulfill_randomness(ctx, request_id, randomness)
    }
}
