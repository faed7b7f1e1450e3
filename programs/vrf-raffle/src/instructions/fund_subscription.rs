use anchor_lang::prelude::*;

use crate::{
    error::RaffleError,
    state::Subscription,
};

/// Event emitted when a subscription is funded
#[event]
pub struct SubscriptionFunded {
    /// The funded subscription id
    pub subscription_id: u64,
    /// Amount added in lamports
    pub amount: u64,
    /// Balance after funding
    pub balance: u64,
}

/// Instruction to top up an oracle subscription. Anyone may fund any
/// subscription; the lamports back the accounting balance that
/// randomness requests are charged against.
pub fn fund_subscription(ctx: Context<FundSubscription>, amount: u64) -> Result<()> {
    // Store pre-transfer balance for verification
    let pre_transfer_balance = ctx.accounts.subscription.to_account_info().lamports();

    anchor_lang::solana_program::program::invoke(
        &anchor_lang::solana_program::system_instruction::transfer(
            &ctx.accounts.funder.key(),
            &ctx.accounts.subscription.key(),
            amount,
        ),
        &[
            ctx.accounts.funder.to_account_info(),
            ctx.accounts.subscription.to_account_info(),
            ctx.accounts.system_program.to_account_info(),
        ],
    )?;

    let post_transfer_balance = ctx.accounts.subscription.to_account_info().lamports();
    require!(
        post_transfer_balance
            == pre_transfer_balance
                .checked_add(amount)
                .ok_or(RaffleError::Overflow)?,
        RaffleError::TransferFailed
    );

    let subscription = &mut ctx.accounts.subscription;
    subscription.balance = subscription
        .balance
        .checked_add(amount)
        .ok_or(RaffleError::Overflow)?;

    emit!(SubscriptionFunded {
        subscription_id: subscription.id,
        amount,
        balance: subscription.balance,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct FundSubscription<'info> {
    #[account(
        mut,
        seeds = [
            b"subscription",
            subscription.id.to_le_bytes().as_ref(),
        ],
        bump = subscription.bump,
    )]
    pub subscription: Account<'info, Subscription>,

    #[account(mut)]
    pub funder: Signer<'info>,

    pub system_program: Program<'info, System>,
}
