pub mod address;
pub mod errors;

pub use address::{Address, ADDRESS_LENGTH};
pub use errors::AddressError;
