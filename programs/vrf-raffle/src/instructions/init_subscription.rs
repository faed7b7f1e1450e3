use anchor_lang::prelude::*;

use crate::state::{Subscription, SUBSCRIPTION_ACCOUNT_SIZE};

/// Instruction to create an oracle subscription
///
/// The subscription is an empty prepaid balance; fund it with
/// `fund_subscription` before the raffle can issue randomness requests
/// against it.
pub fn init_subscription(
    ctx: Context<InitSubscription>,
    subscription_id: u64,
    fee_per_word: u64,
) -> Result<()> {
    ctx.accounts.subscription.id = subscription_id;
    ctx.accounts.subscription.owner = ctx.accounts.owner.key();
    ctx.accounts.subscription.fee_per_word = fee_per_word;
    ctx.accounts.subscription.balance = 0;
    ctx.accounts.subscription.req_count = 0;
    ctx.accounts.subscription.bump = ctx.bumps.subscription;
    Ok(())
}

#[derive(Accounts)]
#[instruction(subscription_id: u64)]
pub struct InitSubscription<'info> {
    #[account(
        init,
        payer = owner,
        space = SUBSCRIPTION_ACCOUNT_SIZE,
        seeds = [
            b"subscription",
            subscription_id.to_le_bytes().as_ref(),
        ],
        bump,
    )]
    pub subscription: Account<'info, Subscription>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub system_program: Program<'info, System>,
}
