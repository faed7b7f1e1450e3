use anchor_lang::prelude::*;

use crate::state::{Raffle, RaffleState, Vault, RAFFLE_ACCOUNT_SIZE, VAULT_ACCOUNT_SIZE};

/// Event emitted when the raffle is initialized
#[event]
pub struct RaffleInitialized {
    /// The pubkey of the raffle
    pub raffle: Pubkey,
    /// Entrance fee in lamports
    pub entrance_fee: u64,
    /// Seconds between winner selections
    pub interval: i64,
    /// Oracle subscription paying for randomness
    pub subscription_id: u64,
    /// When the raffle was initialized
    pub creation_time: i64,
}

/// Instruction to initialize the raffle and its vault
/// This should be called once during program deployment
///
/// # Arguments
/// * `ctx` - The context object containing all required accounts
/// * `entrance_fee` - Entry fee in lamports (must be > 0)
/// * `interval` - Seconds between winner selections (must be > 0)
/// * `gas_lane` - Randomness lane the oracle serves requests on
/// * `subscription_id` - Oracle subscription charged per request
/// * `callback_gas_limit` - Gas budget for the fulfillment callback
///
/// # Security Considerations
/// - Creates the singleton raffle PDA with seed "raffle"; a second call
///   fails because the account already exists
/// - All configuration is locked in here and never mutated afterwards
/// - Records the vrf_authority key that must sign fulfillments
///
/// # Account Validations
/// * Raffle - New PDA initialized with proper space allocation
/// * Vault - New PDA initialized with seeds ["vault", raffle_key]
/// * Vrf Authority - Account becomes the only key allowed to fulfill
pub fn initialize(
    ctx: Context<Initialize>,
    entrance_fee: u64,
    interval: i64,
    gas_lane: [u8; 32],
    subscription_id: u64,
    callback_gas_limit: u32,
) -> Result<()> {
    Raffle::validate_config(entrance_fee, interval)?;

    let current_time = Clock::get()?.unix_timestamp;

    ctx.accounts.vault.raffle = ctx.accounts.raffle.key();
    ctx.accounts.vault.bump = ctx.bumps.vault;

    // Set inputs from transaction data
    ctx.accounts.raffle.entrance_fee = entrance_fee;
    ctx.accounts.raffle.interval = interval;
    ctx.accounts.raffle.gas_lane = gas_lane;
    ctx.accounts.raffle.subscription_id = subscription_id;
    ctx.accounts.raffle.callback_gas_limit = callback_gas_limit;
    ctx.accounts.raffle.vrf_authority = ctx.accounts.vrf_authority.key();

    // Set default values; round zero measures its interval from the
    // construction time.
    ctx.accounts.raffle.raffle_state = RaffleState::Open;
    ctx.accounts.raffle.players = Vec::new();
    ctx.accounts.raffle.pool_balance = 0;
    ctx.accounts.raffle.last_winner_time = current_time;
    ctx.accounts.raffle.recent_winner = Pubkey::default();
    ctx.accounts.raffle.pending_request = None;
    ctx.accounts.raffle.request_counter = 0;
    ctx.accounts.raffle.bump = ctx.bumps.raffle;

    emit!(RaffleInitialized {
        raffle: ctx.accounts.raffle.key(),
        entrance_fee,
        interval,
        subscription_id,
        creation_time: current_time,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(
        init,
        payer = payer,
        space = RAFFLE_ACCOUNT_SIZE,
        seeds = [b"raffle"],
        bump
    )]
    pub raffle: Account<'info, Raffle>,

    #[account(
        init,
        payer = payer,
        space = VAULT_ACCOUNT_SIZE,
        seeds = [
            b"vault",
            raffle.key().as_ref(),
        ],
        bump,
    )]
    pub vault: Account<'info, Vault>,

    #[account(mut)]
    pub payer: Signer<'info>,

    /// The off-chain oracle key that must sign randomness fulfillments
    pub vrf_authority: SystemAccount<'info>,

    pub system_program: Program<'info, System>,
}
