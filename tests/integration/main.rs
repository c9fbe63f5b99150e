//! Integration tests: catalog backends feeding the optimizer.

mod catalog_tests;
mod fixture;
mod optimizer_tests;
