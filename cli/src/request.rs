//! Request file loading.
//!
//! Requests can be given as YAML or JSON files, or piped on stdin with `-`.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Error type for request loading.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("failed to read request: {0}")]
    Read(#[from] io::Error),
    #[error("failed to parse YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),
    #[error("failed to parse JSON: {0}")]
    ParseJson(#[from] serde_json::Error),
    #[error("failed to parse request (tried YAML and JSON)")]
    ParseFailed,
}

/// Loads a request from a YAML or JSON file, or from stdin when `path` is `-`.
pub fn load_request<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, RequestError> {
    let path = path.as_ref();
    if path == Path::new("-") {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        return parse_request(&data, path);
    }
    let data = fs::read(path)?;
    parse_request(&data, path)
}

/// Parses request data based on file extension, falling back to trying both
/// formats.
pub fn parse_request<T: DeserializeOwned>(
    data: &[u8],
    path: impl AsRef<Path>,
) -> Result<T, RequestError> {
    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_slice(data)?),
        Some("json") => Ok(serde_json::from_slice(data)?),
        _ => {
            // JSON is a subset of YAML, but JSON errors are clearer.
            if let Ok(v) = serde_json::from_slice(data) {
                return Ok(v);
            }
            if let Ok(v) = serde_yaml::from_slice(data) {
                return Ok(v);
            }
            Err(RequestError::ParseFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[derive(Debug, Deserialize, PartialEq)]
    struct PromptFile {
        prompt: String,
        #[serde(default)]
        n: Option<u32>,
    }

    #[test]
    fn test_load_yaml() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(file, "prompt: a lighthouse at dusk\nn: 2").unwrap();

        let req: PromptFile = load_request(file.path()).unwrap();
        assert_eq!(req.prompt, "a lighthouse at dusk");
        assert_eq!(req.n, Some(2));
    }

    #[test]
    fn test_load_json() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        writeln!(file, r#"{{"prompt": "a lighthouse at dusk"}}"#).unwrap();

        let req: PromptFile = load_request(file.path()).unwrap();
        assert_eq!(req.prompt, "a lighthouse at dusk");
        assert_eq!(req.n, None);
    }

    #[test]
    fn test_parse_unknown_extension() {
        let req: PromptFile = parse_request(b"prompt: koi pond", "request.txt").unwrap();
        assert_eq!(req.prompt, "koi pond");
    }

    #[test]
    fn test_parse_invalid() {
        let result: Result<PromptFile, _> = parse_request(b"invalid data {{{{", "request.txt");
        assert!(matches!(result, Err(RequestError::ParseFailed)));
    }

    #[test]
    fn test_missing_file() {
        let result: Result<PromptFile, _> = load_request("/definitely/not/here.yaml");
        assert!(matches!(result, Err(RequestError::Read(_))));
    }
}
