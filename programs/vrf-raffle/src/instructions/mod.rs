pub use check_upkeep::*;
pub use enter_raffle::*;
pub use fulfill_randomness::*;
pub use fund_subscription::*;
pub use init_subscription::*;
pub use initialize::*;
pub use request_upkeep::*;

pub mod check_upkeep;
pub mod enter_raffle;
pub mod fulfill_randomness;
pub mod fund_subscription;
pub mod init_subscription;
pub mod initialize;
pub mod request_upkeep;
