mod books;
mod page_stats;
