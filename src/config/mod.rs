pub mod load;
pub mod types;

pub use types::{DEFAULT_MIN_SIZE_BYTES, FilenameLabel, PreviewSettings};
