pub mod authors;
pub mod books;
pub mod publishers;
pub mod reviewers;
