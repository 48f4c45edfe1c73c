pub mod book_store;
pub mod error;
pub mod http;
pub mod model;
pub mod seed;
