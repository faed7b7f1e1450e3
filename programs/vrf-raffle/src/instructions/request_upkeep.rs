use anchor_lang::prelude::*;

use crate::{
    error::RaffleError,
    state::{Raffle, Subscription, NUM_WORDS, REQUEST_CONFIRMATIONS},
};

/// Event emitted when a randomness request is issued. The off-chain
/// oracle watches for this event, produces the random word and calls
/// `fulfill_randomness` with the same request id.
#[event]
pub struct RandomnessRequested {
    /// The pubkey of the raffle
    pub raffle: Pubkey,
    /// Correlation id the fulfillment must echo back
    pub request_id: u64,
    /// Randomness lane to serve the request on
    pub gas_lane: [u8; 32],
    /// Subscription charged for the request
    pub subscription_id: u64,
    /// Confirmations the oracle waits for before fulfilling
    pub request_confirmations: u8,
    /// Gas budget for the fulfillment callback
    pub callback_gas_limit: u32,
    /// Number of random words requested
    pub num_words: u32,
    /// Fee debited from the subscription in lamports
    pub fee: u64,
    /// The account that triggered upkeep
    pub invoker: Pubkey,
}

/// Instruction to start a winner-selection cycle once eligible
///
/// Anyone may invoke this; there is no access control beyond the
/// eligibility conditions themselves. Returns `false` without touching
/// any account when upkeep is not needed, so callers can safely race
/// each other — the first transaction to commit flips the raffle to
/// Calculating and every later one is a cheap no-op.
///
/// # Security Considerations
/// The instruction performs several critical checks:
/// 1. Re-evaluates all eligibility conditions on-chain; the caller's
///    opinion is never trusted
/// 2. Debits the oracle subscription before committing the state
///    transition, so an underfunded subscription aborts the whole
///    transaction and the raffle stays Open
/// 3. Records exactly one pending request id; a second cycle cannot
///    start until the pending one is fulfilled
///
/// # Account Validations
/// * Raffle - The singleton raffle PDA
/// * Subscription - Must be the subscription the raffle was configured
///   with at initialization
pub fn request_upkeep(ctx: Context<RequestUpkeep>) -> Result<bool> {
    let now = Clock::get()?.unix_timestamp;

    if !ctx.accounts.raffle.upkeep_needed(now) {
        return Ok(false);
    }

    // Charge the oracle first: a failed request must leave the raffle
    // untouched, and the transition below only commits together with a
    // successfully funded request.
    let fee = ctx.accounts.subscription.debit(NUM_WORDS)?;
    let request_id = ctx.accounts.raffle.begin_request()?;

    emit!(RandomnessRequested {
        raffle: ctx.accounts.raffle.key(),
        request_id,
        gas_lane: ctx.accounts.raffle.gas_lane,
        subscription_id: ctx.accounts.raffle.subscription_id,
        request_confirmations: REQUEST_CONFIRMATIONS,
        callback_gas_limit: ctx.accounts.raffle.callback_gas_limit,
        num_words: NUM_WORDS,
        fee,
        invoker: ctx.accounts.invoker.key(),
    });

    Ok(true)
}

/// Accounts required for the request_upkeep instruction
#[derive(Accounts)]
pub struct RequestUpkeep<'info> {
    #[account(
        mut,
        seeds = [b"raffle"],
        bump = raffle.bump,
    )]
    pub raffle: Account<'info, Raffle>,

    /// Subscription paying for the randomness request
    /// PDA with seeds ["subscription", subscription_id]
    #[account(
        mut,
        seeds = [
            b"subscription",
            raffle.subscription_id.to_le_bytes().as_ref(),
        ],
        bump = subscription.bump,
        constraint = subscription.id == raffle.subscription_id @ RaffleError::SubscriptionMismatch,
    )]
    pub subscription: Account<'info, Subscription>,

    /// Whoever triggers upkeep; pays the transaction fee, nothing else
    pub invoker: Signer<'info>,
}
