mod book;
mod page_stat;

pub use book::{Book, BookRef};
pub use page_stat::PageStat;
