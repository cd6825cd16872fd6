//! Provider configuration and its persistent store.

mod provider;
mod store;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use provider::*;
pub use store::*;
