pub mod extract;
pub mod init;

use std::path::PathBuf;

/// What a successful `extract` run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractSummary {
    pub components: usize,
    pub configurations: usize,
    pub warnings: usize,
    pub component_output: PathBuf,
    pub config_output: PathBuf,
}
