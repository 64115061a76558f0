pub mod cli;
pub mod config;
pub mod helpers;
pub mod scanner;
pub mod strip;
