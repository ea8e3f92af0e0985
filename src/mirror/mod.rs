//! Local mirror layout
//!
//! This module decides where each crawled resource lives on disk and writes it
//! there:
//! - URL to local path mapping under a mirror root
//! - Relative links between saved resources
//! - Saving bytes with intermediate directory creation

mod path;
mod writer;

pub use path::{extension, local_path, relative_link, DEFAULT_MIRROR_ROOT, INDEX_FILE};
pub use writer::save;
