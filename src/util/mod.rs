pub mod env;
pub mod mapper;
pub mod symbol;
