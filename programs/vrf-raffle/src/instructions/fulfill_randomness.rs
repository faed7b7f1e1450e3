use anchor_lang::prelude::*;

use crate::{
    error::RaffleError,
    state::{Raffle, Vault},
};

/// Event emitted when a winner is paid and the round resets
#[event]
pub struct WinnerPicked {
    /// The pubkey of the raffle
    pub raffle: Pubkey,
    /// The fulfilled request id
    pub request_id: u64,
    /// The winning player
    pub winner: Pubkey,
    /// Amount paid out in lamports
    pub payout: u64,
}

/// Instruction delivering the oracle's random word for a pending request
///
/// # Arguments
/// * `ctx` - The context object containing all required accounts
/// * `request_id` - Correlation id from the matching RandomnessRequested
///   event
/// * `randomness` - The 32-byte random word; the first 8 bytes select
///   the winner
///
/// # Security Considerations
/// The instruction performs several critical checks:
/// 1. Only the vrf_authority recorded at initialization may sign
/// 2. A request id that is not the pending one is rejected with zero
///    effect, which covers replayed, duplicated and out-of-window
///    deliveries
/// 3. The winner account passed in must be the player the random word
///    selects; anything else aborts
/// 4. The payout is verified by balance delta after the lamport move
///
/// # Account Validations
/// * Raffle - Must be in Calculating state with a matching pending
///   request (checked in the handler)
/// * Vrf Authority - Must sign and match the configured oracle key
/// * Vault - Must be the vault PDA linked to this raffle
/// * Winner - Unchecked; validated against the selected player
///
/// # Implementation Notes
/// - Any failure after `settle` unwinds the whole transaction, so the
///   request stays pending and the oracle can retry the same
///   (request_id, randomness) pair; the commit is at-most-once
/// - The vault keeps its rent-exempt minimum; only the pool moves
pub fn fulfill_randomness(
    ctx: Context<FulfillRandomness>,
    request_id: u64,
    randomness: [u8; 32],
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    let (winner, payout) = ctx.accounts.raffle.settle(request_id, &randomness, now)?;

    require_keys_eq!(
        ctx.accounts.winner.key(),
        winner,
        RaffleError::WinnerMismatch
    );

    let vault_account = ctx.accounts.vault.to_account_info();
    let winner_account = ctx.accounts.winner.to_account_info();

    // Store pre-transfer balance for verification
    let pre_transfer_balance = winner_account.lamports();

    // Transfer lamports by directly deducting from the vault and adding
    // to the winner. This only works because the vault is a PDA owned by
    // our program.
    vault_account.sub_lamports(payout)?;
    winner_account.add_lamports(payout)?;

    require!(
        winner_account.lamports()
            == pre_transfer_balance
                .checked_add(payout)
                .ok_or(RaffleError::Overflow)?,
        RaffleError::PayoutFailed
    );

    emit!(WinnerPicked {
        raffle: ctx.accounts.raffle.key(),
        request_id,
        winner,
        payout,
    });

    Ok(())
}

/// Accounts required for the fulfill_randomness instruction
#[derive(Accounts)]
pub struct FulfillRandomness<'info> {
    #[account(
        mut,
        seeds = [b"raffle"],
        bump = raffle.bump,
    )]
    pub raffle: Account<'info, Raffle>,

    /// The oracle key recorded at initialization; must sign
    #[account(
        constraint = vrf_authority.key() == raffle.vrf_authority @ RaffleError::OracleAuthorityMismatch,
    )]
    pub vrf_authority: Signer<'info>,

    /// Vault holding the pooled entry fees
    /// PDA with seeds ["vault", raffle_key]
    #[account(
        mut,
        seeds = [
            b"vault",
            raffle.key().as_ref(),
        ],
        bump = vault.bump,
    )]
    pub vault: Account<'info, Vault>,

    /// The account receiving the pool
    /// CHECK: validated in the handler against the player the random
    /// word selects
    #[account(mut)]
    pub winner: UncheckedAccount<'info>,
}
