#![allow(dead_code)]

mod failing_backend;
mod fixtures;
mod harness;

pub use failing_backend::FailingBackend;
pub use fixtures::{context, draft, guest_insert};
pub use harness::{
    MemoryHarness, START, expect_envelope, expect_error, expect_quiet, memory_harness,
    memory_harness_with,
};
