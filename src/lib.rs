pub mod config;
pub mod directory;
pub mod error;
pub mod normalize;
pub mod owner;
pub mod pipeline;
pub mod resolver;
pub mod table;
mod utils;

pub use config::Config;
pub use error::TableError;
pub use normalize::normalize_phone;
pub use owner::{OwnerRecord, SearchKey};
pub use pipeline::{enrich_table, process_file, Summary};
pub use resolver::{Lookup, PhoneResolver};
pub use table::{read_table, write_table, Table, Value};
