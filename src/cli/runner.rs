//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::TransformConfig;
use crate::database::{resolve, ConnectionDescriptor};
use crate::engine::{resolve_content_type, Transformer};
use crate::error::{Error, Result};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Transform {
                input,
                output,
                content_type,
            } => self.transform(input, output, content_type.as_deref()),
            Commands::Batch { inputs, out_dir } => self.batch(inputs, out_dir).await,
            Commands::Detect { file, content_type } => self.detect(file, content_type.as_deref()),
            Commands::Resolve {
                descriptor,
                descriptor_json,
            } => self.resolve(descriptor.as_deref(), descriptor_json.as_deref()),
        }
    }

    /// Load transform settings from `--config`, or the defaults
    fn load_config(&self) -> Result<TransformConfig> {
        let config = match &self.cli.config {
            Some(path) => TransformConfig::from_file(path)?,
            None => TransformConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    fn transform(&self, input: &Path, output: &Path, content_type: Option<&str>) -> Result<()> {
        let transformer = Transformer::new(self.load_config()?);
        let summary = transformer.transform_path(input, content_type, output)?;

        self.output_message(&json!({
            "type": "SUMMARY",
            "input": input.display().to_string(),
            "output": output.display().to_string(),
            "summary": summary,
        }));
        Ok(())
    }

    async fn batch(&self, inputs: &[PathBuf], out_dir: &Path) -> Result<()> {
        let transformer = Transformer::new(self.load_config()?);
        let jobs = batch_outputs(inputs, out_dir)?;

        fs::create_dir_all(out_dir).map_err(|e| {
            Error::sink_write(format!(
                "Failed to create output directory '{}': {e}",
                out_dir.display()
            ))
        })?;

        let handles: Vec<_> = jobs
            .into_iter()
            .map(|(input, output)| {
                let transformer = transformer.clone();
                let task = tokio::task::spawn_blocking({
                    let (input, output) = (input.clone(), output.clone());
                    move || transformer.transform_path(&input, None, &output)
                });
                (input, output, task)
            })
            .collect();

        let total = handles.len();
        let mut failed = 0;
        for (input, output, task) in handles {
            let result = task
                .await
                .map_err(|e| Error::Other(format!("Transform task failed: {e}")))
                .and_then(|r| r);

            match result {
                Ok(summary) => self.output_message(&json!({
                    "type": "SUMMARY",
                    "input": input.display().to_string(),
                    "output": output.display().to_string(),
                    "summary": summary,
                })),
                Err(e) => {
                    failed += 1;
                    tracing::warn!(input = %input.display(), error = %e, "Transform failed");
                    self.output_message(&json!({
                        "type": "ERROR",
                        "input": input.display().to_string(),
                        "error": e.to_string(),
                    }));
                }
            }
        }

        if failed > 0 {
            return Err(Error::Other(format!("{failed} of {total} transforms failed")));
        }
        Ok(())
    }

    fn detect(&self, file: &Path, content_type: Option<&str>) -> Result<()> {
        let resolved = resolve_content_type(file, content_type)?;
        self.output_message(&json!({
            "type": "CONTENT_TYPE",
            "file": file.display().to_string(),
            "content_type": resolved.mime(),
        }));
        Ok(())
    }

    fn resolve(&self, path: Option<&Path>, inline: Option<&str>) -> Result<()> {
        let descriptor = match (path, inline) {
            (_, Some(json)) => ConnectionDescriptor::from_json(json)?,
            (Some(path), None) => {
                let content = fs::read_to_string(path).map_err(|e| {
                    Error::config(format!(
                        "Failed to read descriptor '{}': {e}",
                        path.display()
                    ))
                })?;
                ConnectionDescriptor::from_json(&content)?
            }
            (None, None) => {
                return Err(Error::config(
                    "Descriptor not specified (use --descriptor or --descriptor-json)",
                ))
            }
        };

        let resolved = resolve(&descriptor)?;
        self.output_message(&serde_json::to_value(&resolved)?);
        Ok(())
    }

    /// Output a message according to `--format`
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Pair each input with `<out_dir>/<stem>.json`
///
/// Two inputs sharing a stem would race on one output file, so that is
/// rejected before anything runs.
pub(crate) fn batch_outputs(inputs: &[PathBuf], out_dir: &Path) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut seen = HashSet::new();
    inputs
        .iter()
        .map(|input| {
            let stem = input
                .file_stem()
                .ok_or_else(|| Error::config(format!("Input '{}' has no file name", input.display())))?;
            let output = out_dir.join(format!("{}.json", stem.to_string_lossy()));
            if !seen.insert(output.clone()) {
                return Err(Error::config(format!(
                    "Inputs share the output file '{}'",
                    output.display()
                )));
            }
            Ok((input.clone(), output))
        })
        .collect()
}
