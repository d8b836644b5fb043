// src/config/validate.rs

use crate::config::model::{PipelineFile, RawPipelineFile};
use crate::errors::{Result, TaskRelayError};

impl TryFrom<RawPipelineFile> for PipelineFile {
    type Error = TaskRelayError;

    fn try_from(raw: RawPipelineFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(PipelineFile::new_unchecked(raw.task))
    }
}

fn validate_raw_config(raw: &RawPipelineFile) -> Result<()> {
    ensure_has_tasks(raw)?;
    validate_references(raw)?;
    Ok(())
}

fn ensure_has_tasks(raw: &RawPipelineFile) -> Result<()> {
    if raw.task.is_empty() {
        return Err(TaskRelayError::ConfigError(
            "config must contain at least one [task.<id>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_references(raw: &RawPipelineFile) -> Result<()> {
    for (id, entry) in raw.task.iter() {
        for parent in entry.after.iter() {
            if !raw.task.contains_key(parent) {
                return Err(TaskRelayError::ConfigError(format!(
                    "task '{id}' has unknown parent '{parent}' in `after`"
                )));
            }
            if parent == id {
                return Err(TaskRelayError::ConfigError(format!(
                    "task '{id}' cannot list itself in `after`"
                )));
            }
        }
        for child in entry.next.iter() {
            if !raw.task.contains_key(child) {
                return Err(TaskRelayError::ConfigError(format!(
                    "task '{id}' has unknown child '{child}' in `next`"
                )));
            }
            if child == id {
                return Err(TaskRelayError::ConfigError(format!(
                    "task '{id}' cannot list itself in `next`"
                )));
            }
        }
    }
    Ok(())
}
