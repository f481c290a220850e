//! Cart

pub mod errors;
pub mod models;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use errors::CartError;
pub use models::CartLine;
pub use store::CartStore;
