pub mod account;
pub mod bet;
pub mod event;
pub mod request;
pub mod transaction;

pub use account::Account;
pub use bet::Bet;
pub use event::{Event, EventStatus, GameFamily, RecurrencePattern};
pub use request::{RequestKind, WalletRequest};
pub use transaction::Transaction;
