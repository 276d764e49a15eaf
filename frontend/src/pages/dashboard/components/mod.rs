pub mod profile;
pub mod table;

pub use profile::ProfileCard;
pub use table::{Pagination, ReadersTable, SearchBox};
