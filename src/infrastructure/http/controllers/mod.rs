pub mod articles;
pub mod hello;
pub mod tags;
pub mod users;
