mod handler;

pub use handler::get_not_returned_books;
