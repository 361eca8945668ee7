pub mod add_book_cmd;
pub mod add_copy_cmd;
pub mod available_copies_cmd;
pub mod book_categories_cmd;
pub mod list_books_cmd;
pub mod list_copies_cmd;
pub mod remove_book_cmd;
pub mod remove_copy_cmd;
pub mod update_book_cmd;
pub mod update_copy_cmd;
