#![cfg(test)]

pub mod logging;
