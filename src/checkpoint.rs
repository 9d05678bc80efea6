//! Binary persistence of an [`ActionTable`].
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use log::info;

use crate::{ds::ActionTable, error::Result};

/// Write `table` to `path`, truncating any existing file
///
/// The file is flushed and closed before returning, so write errors are reported here.
/// A failure part way through can leave a corrupt checkpoint behind.
pub fn save(table: &ActionTable, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    bincode::serialize_into(&mut writer, table)?;
    writer.flush()?;
    info!("saved action table {:?} to {}", table.shape(), path.display());
    Ok(())
}

/// Read a table from `path` and check that it has the `expected` shape
///
/// **Errors** if the file is missing or unreadable, cannot be decoded, or has a different
/// shape, with [`Error::ShapeMismatch`](crate::error::Error::ShapeMismatch) in the last case
pub fn load(path: impl AsRef<Path>, expected: &[usize]) -> Result<ActionTable> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let table: ActionTable = bincode::deserialize_from(reader)?;
    table.ensure_consistent()?;
    table.ensure_shape(expected)?;
    info!("loaded action table {:?} from {}", table.shape(), path.display());
    Ok(table)
}
