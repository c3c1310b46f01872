#![deny(missing_docs)]

//! # Generate Command
//!
//! Builds a generator configuration from flags and an optional YAML file,
//! then runs the generation pipeline.

use std::fs;
use std::path::PathBuf;

use clientgen_core::{generate, GenerationOutcome, GeneratorConfig, OperationFilter};

use crate::error::{CliError, CliResult};

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Path to the OpenAPI v3 document (JSON or YAML).
    #[clap(long, short = 'i')]
    pub input: Option<PathBuf>,

    /// Directory receiving the generated sources.
    #[clap(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Namespace of the generated code (e.g. `acme.pets` or `acme::pets`).
    #[clap(long, short = 'p')]
    pub package: Option<String>,

    /// Only generate operations at this path. Repeatable.
    #[clap(long = "operation")]
    pub operations: Vec<String>,

    /// Extension module id to apply. Repeatable; applied in order.
    #[clap(long = "module", short = 'm')]
    pub modules: Vec<String>,

    /// YAML configuration file. Flags override its values.
    #[clap(long, env = "CLIENTGEN_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Merges the configuration file with explicit flags.
pub fn resolve_config(args: &GenerateArgs) -> CliResult<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            serde_yaml::from_str::<GeneratorConfig>(&text)?
        }
        None => GeneratorConfig::default(),
    };

    if let Some(input) = &args.input {
        config.document = input.clone();
    }
    if let Some(output) = &args.output {
        config.output = output.clone();
    }
    if let Some(package) = &args.package {
        config.base_package = package.clone();
    }
    if !args.operations.is_empty() {
        config.operations = OperationFilter::only(args.operations.iter().cloned());
    }
    if !args.modules.is_empty() {
        config.modules = args.modules.clone();
    }

    if config.document.as_os_str().is_empty() {
        return Err(CliError::General(
            "no input document given (use --input or a config file)".into(),
        ));
    }
    if config.output.as_os_str().is_empty() {
        return Err(CliError::General(
            "no output directory given (use --output or a config file)".into(),
        ));
    }
    Ok(config)
}

/// Executes the generate command.
pub fn execute(args: &GenerateArgs) -> CliResult<()> {
    let config = resolve_config(args)?;

    match generate(&config) {
        GenerationOutcome::Success {
            clients_generated,
            models_generated,
        } => {
            println!(
                "Generated {} client module(s) and {} model type(s) in {}",
                clients_generated,
                models_generated,
                config.output.display()
            );
            Ok(())
        }
        GenerationOutcome::Failure { message, cause } => match cause {
            Some(error) => Err(CliError::Core(error)),
            None => Err(CliError::General(message)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args() -> GenerateArgs {
        GenerateArgs {
            input: None,
            output: None,
            package: None,
            operations: vec![],
            modules: vec![],
            config: None,
        }
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("clientgen.yaml");
        fs::write(
            &file,
            "document: api.yaml\noutput: out\nbase_package: from.file\nmodules: [strict-codec]\n",
        )
        .unwrap();

        let mut a = args();
        a.config = Some(file);
        a.package = Some("from.flag".into());
        let config = resolve_config(&a).unwrap();
        assert_eq!(config.document, PathBuf::from("api.yaml"));
        assert_eq!(config.base_package, "from.flag");
        assert_eq!(config.modules, vec!["strict-codec"]);
    }

    #[test]
    fn test_missing_input_is_error() {
        let mut a = args();
        a.output = Some("out".into());
        let err = resolve_config(&a).unwrap_err();
        assert!(err.to_string().contains("--input"));
    }

    #[test]
    fn test_failure_surfaces_location() {
        let dir = tempdir().unwrap();
        let mut a = args();
        a.input = Some(dir.path().join("absent.yaml"));
        a.output = Some(dir.path().join("out"));
        let err = execute(&a).unwrap_err();
        assert!(err.to_string().contains("absent.yaml"));
    }
}
