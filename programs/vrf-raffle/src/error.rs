use anchor_lang::error_code;

#[error_code]
pub enum RaffleError {
    Overflow,
    #[msg("Entrance fee must be greater than zero")]
    InvalidEntranceFee,
    #[msg("Round interval must be greater than zero")]
    InvalidInterval,
    #[msg("Paid amount is below the entrance fee")]
    InsufficientEntranceFee,
    #[msg("Raffle is not open for entries")]
    RaffleNotOpen,
    #[msg("Player limit for the current round has been reached")]
    RaffleFull,
    #[msg("Request id does not match the pending randomness request")]
    UnknownRequest,
    #[msg("No players are recorded for the current round")]
    NoPlayers,
    #[msg("Winner account does not match the selected player")]
    WinnerMismatch,
    #[msg("Payout to the winner could not be completed")]
    PayoutFailed,
    #[msg("Vault transfer failed")]
    TransferFailed,
    #[msg("Subscription balance cannot cover the randomness request")]
    InsufficientSubscriptionBalance,
    #[msg("Subscription does not match the raffle configuration")]
    SubscriptionMismatch,
    #[msg("Signer is not the configured randomness authority")]
    OracleAuthorityMismatch,
}
