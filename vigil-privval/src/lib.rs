//! Validator signing authorities.
//!
//! [`PrivValidator`] is the contract a local signer upholds. [`FilePV`] is the
//! conforming implementation that persists what it signed and refuses to
//! equivocate; [`MockPV`] and [`ErroringMockPV`] are for tests.

pub mod error;
pub mod file;
pub mod mock;
mod persist;
pub mod state;
pub mod validator;

pub use error::SigningError;
pub use file::{FilePV, FilePVKey};
pub use mock::{ErroringMockPV, MockPV};
pub use state::{LastSignState, SignStep};
pub use validator::{sort_by_address, PrivValidator};
