use std::path::PathBuf;

use autoprep_core::DatasetProfile;
use autoprep_model::Diagnostics;

#[derive(Debug)]
pub struct RunResult {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Files written; empty for dry runs.
    pub written: Vec<PathBuf>,
    pub diagnostics: Diagnostics,
    pub dry_run: bool,
}

#[derive(Debug)]
pub struct ProfileResult {
    pub input: PathBuf,
    pub profile: DatasetProfile,
}
