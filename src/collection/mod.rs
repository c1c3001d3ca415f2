pub mod assembler;
pub mod model;

pub use assembler::CollectionAssembler;
pub use model::{Collection, Item, SCHEMA_URL, Variable};

use crate::Result;
use std::fs;
use std::path::Path;

/// 以两个空格缩进的 JSON 写出 collection
pub fn write_collection<P: AsRef<Path>>(path: P, collection: &Collection) -> Result<()> {
    let output = serde_json::to_string_pretty(collection)?;
    fs::write(path, output)?;
    Ok(())
}
