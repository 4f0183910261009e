//! Run configuration
//!
//! The CLI fills this in; the library validates it and drives a full run.

use crate::core::builder::{MappingCollectionBuilder, MappingSourceFormat};
use crate::core::error::{ConfigurationError, FastRemapError};
use crate::core::io::{is_stdio, open_reader, open_writer};
use crate::core::reconcile::{FailureReport, FeatureReconciler, ReconcileOptions};
use log::info;
use std::io::Write;
use std::path::PathBuf;

/// Everything needed for one remapping run
#[derive(Debug, Clone, Default)]
pub struct RemapConfig {
    /// AGP or GFF3 mapping description (required)
    pub mapping_source: Option<PathBuf>,
    pub source_format: MappingSourceFormat,
    /// Only GFF3 mapping-source rows of this type build pair mappings
    pub feature_type_filter: Option<String>,
    /// Feature GFF3 stream; `-` is stdin
    pub input: Option<PathBuf>,
    /// Output GFF3; None or `-` is stdout
    pub output: Option<PathBuf>,
    /// Optional sink for spanning features
    pub failed_output: Option<PathBuf>,
    pub pass_through_unmapped: bool,
    /// Query assembled -> component instead of component -> assembled
    pub reverse: bool,
    pub verbose: bool,
}

impl RemapConfig {
    /// Check the fatal preconditions before anything is read
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let source = self
            .mapping_source
            .as_ref()
            .ok_or(ConfigurationError::MissingMappingSource)?;
        if !source.exists() {
            return Err(ConfigurationError::MappingSourceNotFound(source.clone()));
        }
        match std::fs::metadata(source) {
            Ok(meta) if meta.len() == 0 => {
                return Err(ConfigurationError::EmptyMappingSource(source.clone()))
            }
            Ok(_) => {}
            Err(_) => return Err(ConfigurationError::MappingSourceNotFound(source.clone())),
        }

        let input = self.input.as_ref().ok_or(ConfigurationError::MissingInput)?;
        if !is_stdio(input) && !input.exists() {
            return Err(ConfigurationError::InputNotFound(input.clone()));
        }
        Ok(())
    }

    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            pass_through_unmapped: self.pass_through_unmapped,
            verbose: self.verbose,
        }
    }
}

/// Validate, build the collection, and reconcile the input stream
pub fn run(config: &RemapConfig) -> Result<FailureReport, FastRemapError> {
    config.validate()?;
    let (source, input) = match (&config.mapping_source, &config.input) {
        (Some(source), Some(input)) => (source, input),
        (None, _) => return Err(ConfigurationError::MissingMappingSource.into()),
        (_, None) => return Err(ConfigurationError::MissingInput.into()),
    };

    let collection = MappingCollectionBuilder::new()
        .format(config.source_format)
        .feature_type(config.feature_type_filter.clone())
        .reverse(config.reverse)
        .build_from_file(source)?;
    info!("Built {} pair mappings", collection.count());

    let reader = open_reader(input)?;
    let mut writer = open_writer(config.output.as_deref())?;
    let mut failed_writer = match &config.failed_output {
        Some(path) => Some(open_writer(Some(path))?),
        None => None,
    };

    let failed_sink = failed_writer.as_mut().map(|w| w.as_mut() as &mut dyn Write);

    let mut reconciler = FeatureReconciler::new(&collection, config.reconcile_options());
    reconciler.run(reader, &mut writer, failed_sink)?;
    Ok(reconciler.failure_report())
}
