#![cfg(test)]
//! Integration tests against real loopback listeners.

mod probe;
mod search;
mod util;
mod wait;
