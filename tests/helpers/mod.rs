#![allow(dead_code, unused_imports)]
pub mod factories;
pub mod request;
pub mod test_db;

pub use factories::*;
pub use request::*;
pub use test_db::*;
