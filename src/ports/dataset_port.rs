//! Dataset source port trait.

use std::path::Path;

use crate::domain::dataset::Dataset;
use crate::domain::error::LakaspiacError;

/// Something that can turn a path into a clean [`Dataset`].
///
/// Implementations must be idempotent: loading an unchanged file twice
/// yields equal datasets.
pub trait DatasetPort {
    fn load(&self, path: &Path) -> Result<Dataset, LakaspiacError>;
}
