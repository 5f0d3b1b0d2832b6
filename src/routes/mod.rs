pub mod book;
pub mod recommendation;
pub mod request;
