use anchor_lang::prelude::*;

use crate::{
    error::RaffleError,
    state::{Raffle, Vault},
};

/// Event emitted when a player enters the raffle
#[event]
pub struct RaffleEntered {
    /// The pubkey of the raffle
    pub raffle: Pubkey,
    /// The entering player
    pub player: Pubkey,
    /// Amount paid in lamports
    pub amount: u64,
    /// Index of this entry in the current round
    pub player_index: u64,
}

/// Instruction to enter the current raffle round
///
/// # Arguments
/// * `ctx` - The context object containing all required accounts
/// * `amount` - Lamports paid for the entry; the full amount joins the
///   pool, so paying above the entrance fee buys no extra weight but
///   grows the prize
///
/// # Security Considerations
/// The instruction performs several critical checks:
/// 1. Rejects entries while a randomness request is outstanding
/// 2. Rejects payments below the entrance fee
/// 3. Rejects entries once the round's player capacity is reached
/// 4. Verifies the vault actually received the payment by balance delta
///
/// # Account Validations
/// * Raffle - The singleton raffle PDA
/// * Vault - Must be the vault PDA linked to this raffle
/// * Player - Must sign and fund the transfer
///
/// # Implementation Notes
/// - The ledger is updated before the transfer; any transfer failure
///   reverts the whole transaction, so no partial entry can persist
/// - The same address may enter multiple times, each entry a distinct
///   weighted slot
pub fn enter_raffle(ctx: Context<EnterRaffle>, amount: u64) -> Result<()> {
    let player = ctx.accounts.player.key();
    let player_index = ctx.accounts.raffle.enter(player, amount)?;

    // Store pre-transfer balance for verification
    let pre_transfer_balance = ctx.accounts.vault.to_account_info().lamports();

    // Transfer lamports from the player to the pool vault
    anchor_lang::solana_program::program::invoke(
        &anchor_lang::solana_program::system_instruction::transfer(
            &player,
            &ctx.accounts.vault.key(),
            amount,
        ),
        &[
            ctx.accounts.player.to_account_info(),
            ctx.accounts.vault.to_account_info(),
            ctx.accounts.system_program.to_account_info(),
        ],
    )?;

    // Verify the transfer was successful by checking the vault balance
    let post_transfer_balance = ctx.accounts.vault.to_account_info().lamports();
    require!(
        post_transfer_balance
            == pre_transfer_balance
                .checked_add(amount)
                .ok_or(RaffleError::Overflow)?,
        RaffleError::TransferFailed
    );

    emit!(RaffleEntered {
        raffle: ctx.accounts.raffle.key(),
        player,
        amount,
        player_index,
    });

    Ok(())
}

/// Accounts required for the enter_raffle instruction
#[derive(Accounts)]
pub struct EnterRaffle<'info> {
    #[account(
        mut,
        seeds = [b"raffle"],
        bump = raffle.bump,
    )]
    pub raffle: Account<'info, Raffle>,

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

    /// The player entering and paying the entrance fee
    #[account(mut)]
    pub player: Signer<'info>,

    /// Required for the lamport transfer into the vault
    pub system_program: Program<'info, System>,
}
