//! Unit test module
//!
//! Config and core type tests live here, separate from source files.

mod config_test;
