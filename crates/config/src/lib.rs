// SPDX-FileCopyrightText: Copyright © 2020-2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Layered YAML configuration files
//!
//! A program's configuration is read from a fixed sequence of locations
//! (user, then project). Callers merge the loaded layers so later ones win.

use std::{
    io,
    path::{Path, PathBuf},
};

use fs_err as fs;
use serde_core::de::DeserializeOwned;
use snafu::{ResultExt, Snafu};

pub const EXTENSION: &str = "yaml";

/// Per-user config file for `program`, if the platform has a config dir
pub fn user_path(program: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(program).join(file_name(program)))
}

/// Config file for `program` at the top of `project_dir`
pub fn project_path(project_dir: &Path, program: &str) -> PathBuf {
    project_dir.join(file_name(program))
}

fn file_name(program: &str) -> String {
    format!("{program}.{EXTENSION}")
}

/// Load `path`, which must exist
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let contents = fs::read_to_string(path).context(ReadSnafu { path })?;
    parse(path, &contents)
}

/// Load `path`, returning `None` if it doesn't exist
pub fn load_optional<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, Error> {
    match fs::read_to_string(path) {
        Ok(contents) => parse(path, &contents).map(Some),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(Error::Read {
            path: path.to_owned(),
            source,
        }),
    }
}

/// Load every existing file in `paths`, preserving order
pub fn load_layers<T: DeserializeOwned>(paths: impl IntoIterator<Item = PathBuf>) -> Result<Vec<T>, Error> {
    paths
        .into_iter()
        .filter_map(|path| load_optional(&path).transpose())
        .collect()
}

fn parse<T: DeserializeOwned>(path: &Path, contents: &str) -> Result<T, Error> {
    // Empty documents are treated as an empty mapping
    let contents = if contents.trim().is_empty() { "{}" } else { contents };

    serde_yaml::from_str(contents).context(ParseSnafu { path })
}

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("reading config {path:?}"))]
    Read { path: PathBuf, source: io::Error },
    #[snafu(display("parsing config {path:?}"))]
    Parse { path: PathBuf, source: serde_yaml::Error },
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use tempfile::TempDir;

    use super::*;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(deny_unknown_fields)]
    struct Sample {
        name: Option<String>,
        count: Option<u32>,
    }

    #[test]
    fn test_load_optional_missing() {
        let temp = TempDir::new().unwrap();

        let loaded = load_optional::<Sample>(&temp.path().join("nope.yaml")).unwrap();

        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_empty_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.yaml");
        fs::write(&path, "\n").unwrap();

        assert_eq!(load::<Sample>(&path).unwrap(), Sample::default());
    }

    #[test]
    fn test_load_layers_keeps_order_and_skips_missing() {
        let temp = TempDir::new().unwrap();
        let first = temp.path().join("first.yaml");
        let second = temp.path().join("second.yaml");
        fs::write(&first, "name: first\n").unwrap();
        fs::write(&second, "count: 2\n").unwrap();

        let layers = load_layers::<Sample>([first, temp.path().join("missing.yaml"), second]).unwrap();

        assert_eq!(
            layers,
            vec![
                Sample {
                    name: Some("first".to_owned()),
                    count: None
                },
                Sample {
                    name: None,
                    count: Some(2)
                },
            ]
        );
    }

    #[test]
    fn test_parse_error_names_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.yaml");
        fs::write(&path, "unknown: field\n").unwrap();

        let err = load::<Sample>(&path).unwrap_err();

        assert!(matches!(err, Error::Parse { .. }));
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn test_project_path() {
        assert_eq!(
            project_path(Path::new("/work"), "tool"),
            Path::new("/work/tool.yaml")
        );
    }
}
