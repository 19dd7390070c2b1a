pub mod id;
pub mod mapper;
