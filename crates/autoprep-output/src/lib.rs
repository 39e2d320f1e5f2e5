//! Artifact export.
//!
//! Every artifact becomes one flat CSV file with a header row of feature
//! names and one numeric row per record.

pub mod csv_export;

pub use csv_export::{
    DIAGNOSTICS_FILE, artifact_file_name, write_artifacts, write_diagnostics, write_frame_csv,
};
