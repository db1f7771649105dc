pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod files;
pub mod policy;
pub mod session;
pub mod vault;
