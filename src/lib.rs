//! Forage
//!
//! Forage is the ordering, checkout and loyalty core of a surplus-food pickup
//! marketplace. It holds the device-local shopping cart, turns cart contents
//! into one pickup order per store, and keeps a member's loyalty-points ledger
//! with a once-daily check-in bonus.
//!
//! The crate is an in-process library boundary only: screens, navigation and
//! the remote document store sit behind the collaborator traits in
//! [`storage`], [`checkout::gateway`] and [`points::gateway`].

pub mod cart;
pub mod checkout;
pub mod context;
pub mod identity;
pub mod points;
pub mod storage;
