pub mod error;
pub mod ident;

pub use error::{LedgerError, Result};
pub use ident::{DERIVED_ID_SUFFIX_LEN, validate_id};
