pub mod cli;
pub mod config;
pub mod handlers;
pub mod helpers;
pub mod router;
pub mod schemas;

#[cfg(test)]
mod test_utils;
