use anchor_lang::prelude::*;
use arrayref::array_ref;

use crate::error::RaffleError;

/// Maximum number of entries per round. The player list lives inside the
/// raffle account, so its capacity must be fixed at allocation time.
pub const MAX_PLAYERS: usize = 128;

/// Number of random words requested from the oracle per round.
pub const NUM_WORDS: u32 = 1;

/// Block confirmations the oracle should wait for before fulfilling.
pub const REQUEST_CONFIRMATIONS: u8 = 3;

// Space calculation:
// 8 (discriminator) +
// 8 (entrance_fee) +
// 8 (interval) +
// 32 (gas_lane) +
// 8 (subscription_id) +
// 4 (callback_gas_limit) +
// 32 (vrf_authority) +
// 1 (raffle_state) +
// 4 + 32 * 128 (players vec) +
// 8 (pool_balance) +
// 8 (last_winner_time) +
// 32 (recent_winner) +
// 9 (pending_request: Option<u64>) +
// 8 (request_counter) +
// 1 (bump) =
// 4267 total bytes
pub const RAFFLE_ACCOUNT_SIZE: usize =
    8 + 8 + 8 + 32 + 8 + 4 + 32 + 1 + (4 + 32 * MAX_PLAYERS) + 8 + 8 + 32 + 9 + 8 + 1;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaffleState {
    /// Accepting entries.
    Open = 0,
    /// A randomness request is outstanding; entries and further
    /// requests are rejected until it is fulfilled.
    Calculating = 1,
}

/// Diagnostic result of the upkeep eligibility check. `Ready` means a
/// winner-selection cycle may start; every other variant names the first
/// condition that blocks it.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpkeepStatus {
    Ready,
    RaffleNotOpen,
    IntervalNotElapsed,
    NoPlayers,
    EmptyPool,
}

impl UpkeepStatus {
    pub fn is_ready(&self) -> bool {
        *self == UpkeepStatus::Ready
    }
}

#[account]
pub struct Raffle {
    /// entry fee in lamports, immutable after initialize (8)
    pub entrance_fee: u64,
    /// minimum seconds between winner selections (8)
    pub interval: i64,
    /// randomness lane the oracle should serve the request on (32)
    pub gas_lane: [u8; 32],
    /// oracle subscription paying for randomness requests (8)
    pub subscription_id: u64,
    /// gas budget for the oracle fulfillment callback (4)
    pub callback_gas_limit: u32,
    /// off-chain oracle key that must sign fulfillments (32)
    pub vrf_authority: Pubkey,
    /// current state of the round (1)
    pub raffle_state: RaffleState,
    /// entries for the current round, insertion order preserved,
    /// duplicates allowed (4 + 32 * 128)
    pub players: Vec<Pubkey>,
    /// sum of admitted fees for the current round, in lamports (8)
    pub pool_balance: u64,
    /// timestamp of the last committed winner selection, or the
    /// construction time for round zero (8)
    pub last_winner_time: i64,
    /// last selected winner, zero before any round completes (32)
    pub recent_winner: Pubkey,
    /// id of the single outstanding randomness request (9)
    pub pending_request: Option<u64>,
    /// monotone counter used to mint request ids (8)
    pub request_counter: u64,
    /// bump for the raffle PDA (1)
    pub bump: u8,
}

impl Raffle {
    /// Validates the immutable configuration before it is locked into
    /// the account. Both the entrance fee and the round interval must
    /// be positive.
    pub fn validate_config(entrance_fee: u64, interval: i64) -> Result<()> {
        require!(entrance_fee > 0, RaffleError::InvalidEntranceFee);
        require!(interval > 0, RaffleError::InvalidInterval);
        Ok(())
    }

    /// Admits a player into the current round. Returns the index the
    /// entry was recorded at.
    pub fn enter(&mut self, player: Pubkey, amount: u64) -> Result<u64> {
        require!(
            self.raffle_state == RaffleState::Open,
            RaffleError::RaffleNotOpen
        );
        require!(
            amount >= self.entrance_fee,
            RaffleError::InsufficientEntranceFee
        );
        require!(self.players.len() < MAX_PLAYERS, RaffleError::RaffleFull);

        let index = self.players.len() as u64;
        self.pool_balance = self
            .pool_balance
            .checked_add(amount)
            .ok_or(RaffleError::Overflow)?;
        self.players.push(player);
        Ok(index)
    }

    /// Evaluates whether a winner-selection cycle should start. All four
    /// conditions must hold: the raffle is open, the interval has
    /// elapsed since the last winner, at least one player entered, and
    /// the pool is funded. Read-only, safe to poll arbitrarily often.
    pub fn upkeep_status(&self, now: i64) -> UpkeepStatus {
        if self.raffle_state != RaffleState::Open {
            return UpkeepStatus::RaffleNotOpen;
        }
        if now.saturating_sub(self.last_winner_time) < self.interval {
            return UpkeepStatus::IntervalNotElapsed;
        }
        if self.players.is_empty() {
            return UpkeepStatus::NoPlayers;
        }
        if self.pool_balance == 0 {
            return UpkeepStatus::EmptyPool;
        }
        UpkeepStatus::Ready
    }

    pub fn upkeep_needed(&self, now: i64) -> bool {
        self.upkeep_status(now).is_ready()
    }

    /// Mints a fresh request id, records it as the pending request and
    /// moves the raffle into `Calculating`. Only one request may be
    /// outstanding at a time.
    pub fn begin_request(&mut self) -> Result<u64> {
        require!(
            self.raffle_state == RaffleState::Open,
            RaffleError::RaffleNotOpen
        );

        let request_id = self.request_counter;
        self.request_counter = self
            .request_counter
            .checked_add(1)
            .ok_or(RaffleError::Overflow)?;
        self.pending_request = Some(request_id);
        self.raffle_state = RaffleState::Calculating;
        Ok(request_id)
    }

    /// Consumes a fulfilled randomness request: selects the winner,
    /// records it, resets the round and reopens the raffle. Returns the
    /// winner and the payout amount; the caller moves the lamports.
    ///
    /// A request id that does not match the pending request is rejected
    /// without touching any state, which covers replayed and misdelivered
    /// fulfillments.
    ///
    /// The winner index is `word % players.len()`, where `word` is the
    /// first 8 bytes of the random value. The modulo is slightly biased
    /// when the player count does not divide 2^64; negligible for player
    /// counts this small.
    pub fn settle(
        &mut self,
        request_id: u64,
        randomness: &[u8; 32],
        now: i64,
    ) -> Result<(Pubkey, u64)> {
        require!(
            self.raffle_state == RaffleState::Calculating
                && self.pending_request == Some(request_id),
            RaffleError::UnknownRequest
        );
        // Entries are rejected while calculating, so the list cannot have
        // changed since the request was issued. Re-validated regardless.
        let player_count = self.players.len() as u64;
        require!(player_count > 0, RaffleError::NoPlayers);

        let word = u64::from_le_bytes(*array_ref![randomness, 0, 8]);
        let winner_index = (word % player_count) as usize;
        let winner = self.players[winner_index];
        let payout = self.pool_balance;

        self.recent_winner = winner;
        self.last_winner_time = now;
        self.players.clear();
        self.pool_balance = 0;
        self.pending_request = None;
        self.raffle_state = RaffleState::Open;

        Ok((winner, payout))
    }

    pub fn player_count(&self) -> u64 {
        self.players.len() as u64
    }

    pub fn player(&self, index: u64) -> Option<Pubkey> {
        self.players.get(index as usize).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTRANCE_FEE: u64 = 300_000_000; // 0.3 SOL
    const INTERVAL: i64 = 30;
    const START: i64 = 1_000;

    fn open_raffle() -> Raffle {
        Raffle {
            entrance_fee: ENTRANCE_FEE,
            interval: INTERVAL,
            gas_lane: [7u8; 32],
            subscription_id: 1,
            callback_gas_limit: 500_000,
            vrf_authority: Pubkey::new_unique(),
            raffle_state: RaffleState::Open,
            players: Vec::new(),
            pool_balance: 0,
            last_winner_time: START,
            recent_winner: Pubkey::default(),
            pending_request: None,
            request_counter: 0,
            bump: 255,
        }
    }

    fn randomness_with_word(word: u64) -> [u8; 32] {
        let mut randomness = [0u8; 32];
        randomness[..8].copy_from_slice(&word.to_le_bytes());
        randomness
    }

    #[test]
    fn config_rejects_zero_entrance_fee() {
        let err = Raffle::validate_config(0, INTERVAL).unwrap_err();
        assert_eq!(err, RaffleError::InvalidEntranceFee.into());
    }

    #[test]
    fn config_rejects_non_positive_interval() {
        let err = Raffle::validate_config(ENTRANCE_FEE, 0).unwrap_err();
        assert_eq!(err, RaffleError::InvalidInterval.into());

        let err = Raffle::validate_config(ENTRANCE_FEE, -30).unwrap_err();
        assert_eq!(err, RaffleError::InvalidInterval.into());
    }

    #[test]
    fn config_accepts_positive_fee_and_interval() {
        assert!(Raffle::validate_config(ENTRANCE_FEE, INTERVAL).is_ok());
    }

    #[test]
    fn enter_appends_player_and_accumulates_pool() {
        let mut raffle = open_raffle();
        let player = Pubkey::new_unique();

        let index = raffle.enter(player, ENTRANCE_FEE).unwrap();

        assert_eq!(index, 0);
        assert_eq!(raffle.player_count(), 1);
        assert_eq!(raffle.player(0), Some(player));
        assert_eq!(raffle.pool_balance, ENTRANCE_FEE);
    }

    #[test]
    fn enter_credits_full_paid_amount_above_fee() {
        let mut raffle = open_raffle();
        let paid = ENTRANCE_FEE + 50_000_000;

        raffle.enter(Pubkey::new_unique(), paid).unwrap();

        assert_eq!(raffle.pool_balance, paid);
    }

    #[test]
    fn enter_rejects_paid_amount_below_fee() {
        let mut raffle = open_raffle();

        let err = raffle
            .enter(Pubkey::new_unique(), 5_000_000) // 0.005 SOL
            .unwrap_err();

        assert_eq!(err, RaffleError::InsufficientEntranceFee.into());
        assert_eq!(raffle.player_count(), 0);
        assert_eq!(raffle.pool_balance, 0);
    }

    #[test]
    fn enter_allows_the_same_player_multiple_times() {
        let mut raffle = open_raffle();
        let player = Pubkey::new_unique();

        raffle.enter(player, ENTRANCE_FEE).unwrap();
        raffle.enter(player, ENTRANCE_FEE).unwrap();

        assert_eq!(raffle.player_count(), 2);
        assert_eq!(raffle.player(0), Some(player));
        assert_eq!(raffle.player(1), Some(player));
        assert_eq!(raffle.pool_balance, 2 * ENTRANCE_FEE);
    }

    #[test]
    fn enter_is_rejected_while_calculating() {
        let mut raffle = open_raffle();
        raffle.enter(Pubkey::new_unique(), ENTRANCE_FEE).unwrap();
        raffle.begin_request().unwrap();

        let err = raffle
            .enter(Pubkey::new_unique(), ENTRANCE_FEE)
            .unwrap_err();

        assert_eq!(err, RaffleError::RaffleNotOpen.into());
        assert_eq!(raffle.player_count(), 1);
        assert_eq!(raffle.pool_balance, ENTRANCE_FEE);
    }

    #[test]
    fn enter_is_rejected_when_round_is_full() {
        let mut raffle = open_raffle();
        for _ in 0..MAX_PLAYERS {
            raffle.enter(Pubkey::new_unique(), ENTRANCE_FEE).unwrap();
        }

        let err = raffle
            .enter(Pubkey::new_unique(), ENTRANCE_FEE)
            .unwrap_err();

        assert_eq!(err, RaffleError::RaffleFull.into());
        assert_eq!(raffle.player_count(), MAX_PLAYERS as u64);
    }

    #[test]
    fn upkeep_blocked_before_interval_elapses() {
        let mut raffle = open_raffle();
        raffle.enter(Pubkey::new_unique(), ENTRANCE_FEE).unwrap();

        assert_eq!(
            raffle.upkeep_status(START + INTERVAL - 1),
            UpkeepStatus::IntervalNotElapsed
        );
        assert!(!raffle.upkeep_needed(START + INTERVAL - 1));
    }

    #[test]
    fn upkeep_blocked_without_players() {
        let raffle = open_raffle();

        assert_eq!(
            raffle.upkeep_status(START + INTERVAL),
            UpkeepStatus::NoPlayers
        );
    }

    #[test]
    fn upkeep_blocked_with_empty_pool() {
        let mut raffle = open_raffle();
        // A player slot with nothing paid in: cannot happen through
        // enter(), but the evaluator checks the pool independently.
        raffle.players.push(Pubkey::new_unique());

        assert_eq!(
            raffle.upkeep_status(START + INTERVAL),
            UpkeepStatus::EmptyPool
        );
    }

    #[test]
    fn upkeep_blocked_while_calculating() {
        let mut raffle = open_raffle();
        raffle.enter(Pubkey::new_unique(), ENTRANCE_FEE).unwrap();
        raffle.begin_request().unwrap();

        assert_eq!(
            raffle.upkeep_status(START + INTERVAL),
            UpkeepStatus::RaffleNotOpen
        );
    }

    #[test]
    fn upkeep_ready_once_interval_elapses_with_funded_players() {
        let mut raffle = open_raffle();
        raffle.enter(Pubkey::new_unique(), ENTRANCE_FEE).unwrap();

        // Boundary: exactly `interval` seconds after the last winner.
        assert_eq!(raffle.upkeep_status(START + INTERVAL), UpkeepStatus::Ready);
        assert!(raffle.upkeep_needed(START + INTERVAL));
    }

    #[test]
    fn begin_request_moves_to_calculating_with_one_pending_id() {
        let mut raffle = open_raffle();
        raffle.enter(Pubkey::new_unique(), ENTRANCE_FEE).unwrap();

        let request_id = raffle.begin_request().unwrap();

        assert_eq!(raffle.raffle_state, RaffleState::Calculating);
        assert_eq!(raffle.pending_request, Some(request_id));
    }

    #[test]
    fn begin_request_is_rejected_while_calculating() {
        let mut raffle = open_raffle();
        raffle.enter(Pubkey::new_unique(), ENTRANCE_FEE).unwrap();
        raffle.begin_request().unwrap();

        let err = raffle.begin_request().unwrap_err();

        assert_eq!(err, RaffleError::RaffleNotOpen.into());
    }

    #[test]
    fn request_ids_are_unique_across_rounds() {
        let mut raffle = open_raffle();
        raffle.enter(Pubkey::new_unique(), ENTRANCE_FEE).unwrap();
        let first = raffle.begin_request().unwrap();
        raffle
            .settle(first, &randomness_with_word(0), START + INTERVAL)
            .unwrap();

        raffle.enter(Pubkey::new_unique(), ENTRANCE_FEE).unwrap();
        let second = raffle.begin_request().unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn settle_rejects_mismatched_request_id() {
        let mut raffle = open_raffle();
        let player = Pubkey::new_unique();
        raffle.enter(player, ENTRANCE_FEE).unwrap();
        let request_id = raffle.begin_request().unwrap();

        let err = raffle
            .settle(request_id + 1, &randomness_with_word(7), START + 60)
            .unwrap_err();

        assert_eq!(err, RaffleError::UnknownRequest.into());
        assert_eq!(raffle.raffle_state, RaffleState::Calculating);
        assert_eq!(raffle.pending_request, Some(request_id));
        assert_eq!(raffle.player_count(), 1);
        assert_eq!(raffle.pool_balance, ENTRANCE_FEE);
        assert_eq!(raffle.recent_winner, Pubkey::default());
        assert_eq!(raffle.last_winner_time, START);
    }

    #[test]
    fn settle_rejects_delivery_while_open() {
        let mut raffle = open_raffle();
        raffle.enter(Pubkey::new_unique(), ENTRANCE_FEE).unwrap();

        let err = raffle
            .settle(0, &randomness_with_word(7), START + 60)
            .unwrap_err();

        assert_eq!(err, RaffleError::UnknownRequest.into());
        assert_eq!(raffle.raffle_state, RaffleState::Open);
    }

    #[test]
    fn settle_picks_winner_by_modulo_and_resets_round() {
        let mut raffle = open_raffle();
        let p1 = Pubkey::new_unique();
        let p2 = Pubkey::new_unique();
        raffle.enter(p1, ENTRANCE_FEE).unwrap();
        raffle.enter(p2, ENTRANCE_FEE).unwrap();
        let request_id = raffle.begin_request().unwrap();

        let settled_at = START + INTERVAL + 5;
        let (winner, payout) = raffle
            .settle(request_id, &randomness_with_word(7), settled_at)
            .unwrap();

        // 7 % 2 == 1, so the second entry wins the whole pool.
        assert_eq!(winner, p2);
        assert_eq!(payout, 2 * ENTRANCE_FEE);
        assert_eq!(raffle.recent_winner, p2);
        assert_eq!(raffle.last_winner_time, settled_at);
        assert_eq!(raffle.raffle_state, RaffleState::Open);
        assert_eq!(raffle.player_count(), 0);
        assert_eq!(raffle.pool_balance, 0);
        assert_eq!(raffle.pending_request, None);
    }

    #[test]
    fn settle_uses_first_eight_randomness_bytes_little_endian() {
        let mut raffle = open_raffle();
        let players: Vec<Pubkey> = (0..5).map(|_| Pubkey::new_unique()).collect();
        for player in &players {
            raffle.enter(*player, ENTRANCE_FEE).unwrap();
        }
        let request_id = raffle.begin_request().unwrap();

        let mut randomness = randomness_with_word(12);
        // Trailing bytes must not influence the selection.
        randomness[8..].fill(0xff);

        let (winner, _) = raffle.settle(request_id, &randomness, START + 60).unwrap();
        assert_eq!(winner, players[12 % 5]);
    }

    #[test]
    fn settle_is_deterministic_for_equal_inputs() {
        let make = || {
            let mut raffle = open_raffle();
            raffle.players = vec![Pubkey::new_from_array([1; 32]), Pubkey::new_from_array([2; 32])];
            raffle.pool_balance = 2 * ENTRANCE_FEE;
            raffle.pending_request = Some(9);
            raffle.raffle_state = RaffleState::Calculating;
            raffle
        };

        let outcome_a = make().settle(9, &randomness_with_word(41), START + 60).unwrap();
        let outcome_b = make().settle(9, &randomness_with_word(41), START + 60).unwrap();

        assert_eq!(outcome_a, outcome_b);
    }

    #[test]
    fn full_cycle_consumes_the_round_exactly_once() {
        let mut raffle = open_raffle();
        let players: Vec<Pubkey> = (0..3).map(|_| Pubkey::new_unique()).collect();
        for player in &players {
            raffle.enter(*player, ENTRANCE_FEE).unwrap();
        }
        let pool = raffle.pool_balance;

        let now = START + INTERVAL + 1;
        assert!(raffle.upkeep_needed(now));
        let request_id = raffle.begin_request().unwrap();
        let (winner, payout) = raffle
            .settle(request_id, &randomness_with_word(4), now)
            .unwrap();

        assert_eq!(winner, players[4 % 3]);
        assert_eq!(payout, pool);

        // Replaying the same fulfillment after commit has no effect.
        let err = raffle
            .settle(request_id, &randomness_with_word(4), now + 1)
            .unwrap_err();
        assert_eq!(err, RaffleError::UnknownRequest.into());
        assert_eq!(raffle.recent_winner, winner);

        // The next round starts from a clean ledger.
        assert_eq!(raffle.player_count(), 0);
        assert_eq!(raffle.pool_balance, 0);
        raffle.enter(Pubkey::new_unique(), ENTRANCE_FEE).unwrap();
        assert_eq!(raffle.player_count(), 1);
    }
}
