pub mod cli;
pub mod client;
pub mod config;
pub mod directory;
pub mod draft;
pub mod filter;
pub mod grants;
pub mod types;
pub mod wizard;

#[cfg(test)]
pub mod testing;
