pub mod acquire;
pub mod extract;
pub mod presets;
mod render;
pub mod types;
pub mod utils;

pub use acquire::PageAcquirer;
pub use extract::{ExtractOptions, extract_menu};
