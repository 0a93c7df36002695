#![doc = include_str!("../README.md")]

pub mod interface;
pub mod models;
pub mod neighbors;
pub mod probe;
pub mod resolver;

pub use resolver::*;
