//! # gql-preprocess-lib
//!
//! `gql-preprocess-lib` is a collection of utilities shared by the `gql-preprocess-*` crates:
//! configuration, defaults, wire-level constants and logging bootstrap.

#![deny(unused_crate_dependencies)]

pub mod config;
pub mod constants;
pub mod defaults;
pub mod utils;
