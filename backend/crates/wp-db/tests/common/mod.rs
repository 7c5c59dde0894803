#![allow(dead_code)]

mod fixtures;
mod test_db;

pub use fixtures::{envelope_at, tenant};
pub use test_db::create_test_pool;
