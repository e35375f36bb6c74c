//! The `biocompress compress` command.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use biocompress_core::{BiometricRecord, Config, ImageCompressor, Response};
use clap::Args;

/// Arguments for the `compress` command.
#[derive(Args, Debug)]
pub struct CompressArgs {
    /// JSON biometric record to compress (`-` reads stdin)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output file for the response envelope (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override a compressor property; all three keys must be given to apply
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub set: Vec<(String, String)>,

    /// Pretty-print the JSON envelope
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the compress command.
///
/// The envelope is always written; a non-success status still fails the
/// command so scripts can branch on the exit code.
pub fn execute(args: CompressArgs, config: Config) -> anyhow::Result<()> {
    let record = read_record(&args.input)?;
    let flags: HashMap<String, String> = args.set.into_iter().collect();

    let compressor = ImageCompressor::new(config);
    let response = compressor.extract_template(record, None, &flags);

    let json = render(&response, args.pretty)?;
    match &args.output {
        Some(path) => std::fs::write(path, json.as_bytes())
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.flush()?;
        }
    }

    if !response.is_success() {
        anyhow::bail!(
            "Compression failed with status {}: {}",
            response.status_code,
            response.status_message.as_deref().unwrap_or_default()
        );
    }
    Ok(())
}

/// Read a record; JSON `null` yields no record.
fn read_record(input: &Path) -> anyhow::Result<Option<BiometricRecord>> {
    let content = if input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?
    };
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a biometric record", input.display()))
}

fn render(response: &Response<BiometricRecord>, pretty: bool) -> anyhow::Result<String> {
    let mut json = if pretty {
        serde_json::to_string_pretty(response)?
    } else {
        serde_json::to_string(response)?
    };
    json.push('\n');
    Ok(json)
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in `{s}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(input: PathBuf, output: PathBuf) -> CompressArgs {
        CompressArgs {
            input,
            output: Some(output),
            set: vec![],
            pretty: false,
        }
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("bio.image.compressor.compression.ratio=80").unwrap(),
            (
                "bio.image.compressor.compression.ratio".to_string(),
                "80".to_string()
            )
        );
        assert_eq!(
            parse_key_value(" k =a=b").unwrap(),
            ("k".to_string(), "a=b".to_string())
        );
        assert!(parse_key_value("no-separator").is_err());
        assert!(parse_key_value("=1").is_err());
    }

    #[test]
    fn test_empty_record_writes_failure_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("record.json");
        let output = dir.path().join("out.json");
        std::fs::write(&input, r#"{"segments": []}"#).unwrap();

        let err = execute(args(input, output.clone()), Config::default()).unwrap_err();
        assert!(err.to_string().contains("402"));

        let envelope: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(envelope["statusCode"], 402);
        assert_eq!(envelope["statusMessage"], "Missing Input Parameter - sample");
        assert!(envelope["response"].is_null());
    }

    #[test]
    fn test_null_record_is_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("record.json");
        std::fs::write(&input, "null").unwrap();
        assert!(read_record(&input).unwrap().is_none());
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("record.json");
        let output = dir.path().join("out.json");
        std::fs::write(&input, "{not json").unwrap();

        let err = execute(args(input, output.clone()), Config::default()).unwrap_err();
        assert!(err.to_string().contains("not a biometric record"));
        assert!(!output.exists());
    }
}
