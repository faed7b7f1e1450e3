use anchor_lang::prelude::*;

use crate::state::{Raffle, UpkeepStatus};

/// Read-only eligibility probe. Returns `Ready` when a winner-selection
/// cycle may start, otherwise the first blocking condition. Mutates
/// nothing, so callers can poll before paying for a real upkeep
/// transaction.
pub fn check_upkeep(ctx: Context<CheckUpkeep>) -> Result<UpkeepStatus> {
    let now = Clock::get()?.unix_timestamp;
    Ok(ctx.accounts.raffle.upkeep_status(now))
}

#[derive(Accounts)]
pub struct CheckUpkeep<'info> {
    #[account(
        seeds = [b"raffle"],
        bump = raffle.bump,
    )]
    pub raffle: Account<'info, Raffle>,
}
