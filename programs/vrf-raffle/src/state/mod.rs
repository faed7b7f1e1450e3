pub use raffle::*;
pub use subscription::*;
pub use vault::*;

pub mod raffle;
pub mod subscription;
pub mod vault;
