use anchor_lang::prelude::*;

use crate::error::RaffleError;

// 8 discriminator + 8 id + 32 owner + 8 fee_per_word + 8 balance + 8 req_count + 1 bump
pub const SUBSCRIPTION_ACCOUNT_SIZE: usize = 8 + 8 + 32 + 8 + 8 + 8 + 1;

/// Prepaid balance for randomness requests. The oracle charges
/// `fee_per_word` per random word; an underfunded subscription makes
/// the request fail before any raffle state is touched.
#[account]
pub struct Subscription {
    /// unique subscription identifier (8)
    pub id: u64,
    /// account that created and manages this subscription (32)
    pub owner: Pubkey,
    /// fee in lamports charged per random word (8)
    pub fee_per_word: u64,
    /// balance in lamports available for requests (8)
    pub balance: u64,
    /// total randomness requests charged to this subscription (8)
    pub req_count: u64,
    /// bump for the subscription PDA (1)
    pub bump: u8,
}

impl Subscription {
    /// Charges the fee for a request of `num_words` random words.
    /// Returns the fee taken.
    pub fn debit(&mut self, num_words: u32) -> Result<u64> {
        let fee = self
            .fee_per_word
            .checked_mul(num_words as u64)
            .ok_or(RaffleError::Overflow)?;
        self.balance = self
            .balance
            .checked_sub(fee)
            .ok_or(RaffleError::InsufficientSubscriptionBalance)?;
        self.req_count = self
            .req_count
            .checked_add(1)
            .ok_or(RaffleError::Overflow)?;
        Ok(fee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn funded_subscription(balance: u64) -> Subscription {
        Subscription {
            id: 1,
            owner: Pubkey::new_unique(),
            fee_per_word: 1_000,
            balance,
            req_count: 0,
            bump: 254,
        }
    }

    #[test]
    fn debit_charges_per_word_and_counts_requests() {
        let mut subscription = funded_subscription(5_000);

        let fee = subscription.debit(2).unwrap();

        assert_eq!(fee, 2_000);
        assert_eq!(subscription.balance, 3_000);
        assert_eq!(subscription.req_count, 1);
    }

    #[test]
    fn debit_fails_without_touching_an_underfunded_balance() {
        let mut subscription = funded_subscription(500);

        let err = subscription.debit(1).unwrap_err();

        assert_eq!(err, RaffleError::InsufficientSubscriptionBalance.into());
        assert_eq!(subscription.balance, 500);
        assert_eq!(subscription.req_count, 0);
    }
}
