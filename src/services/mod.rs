//! Service layer for ofxvault
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation and the links between accounts, sites and client
//! identifiers.

pub mod account;

pub use account::AccountService;
