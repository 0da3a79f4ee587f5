#![cfg(test)]
mod files;
mod utils;
