// SPDX-FileCopyrightText: Copyright © 2020-2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

use std::path::{Path, PathBuf};

use path_clean::PathClean;
use serde::Deserialize;

/// Name used for config files and the user config directory
pub const PROGRAM: &str = "filewalker";

pub const DEFAULT_HEADERS: &str = "include";
pub const DEFAULT_SOURCES: &str = "src";
pub const DEFAULT_OUTPUT: &str = "file_walker.cmake";
pub const DEFAULT_HEADER_EXTENSION: &str = "hpp";
pub const DEFAULT_SOURCE_EXTENSION: &str = "cpp";

/// Everything a manifest or stub run needs to know
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub headers_root: PathBuf,
    pub sources_root: PathBuf,
    pub output_path: PathBuf,
    /// Without leading dot
    pub header_extension: String,
    /// Without leading dot
    pub source_extension: String,
    /// When set, manifest entries are relative to this directory rather than
    /// to their walk root
    pub manifest_base: Option<PathBuf>,
}

impl Config {
    pub fn new(
        headers_root: impl Into<PathBuf>,
        sources_root: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            headers_root: headers_root.into(),
            sources_root: sources_root.into(),
            output_path: output_path.into(),
            header_extension: DEFAULT_HEADER_EXTENSION.to_owned(),
            source_extension: DEFAULT_SOURCE_EXTENSION.to_owned(),
            manifest_base: None,
        }
    }

    pub fn with_extensions(self, header: &str, source: &str) -> Self {
        Self {
            header_extension: normalize_extension(header),
            source_extension: normalize_extension(source),
            ..self
        }
    }

    pub fn with_manifest_base(self, base: impl Into<PathBuf>) -> Self {
        Self {
            manifest_base: Some(base.into()),
            ..self
        }
    }

    /// Build a config from `overrides`, filling gaps with defaults.
    /// Relative paths are resolved against `project_dir`.
    pub fn resolve(project_dir: &Path, overrides: Overrides) -> Self {
        let Overrides {
            headers,
            sources,
            output,
            header_extension,
            source_extension,
            relative_to,
        } = overrides;

        let resolve = |path: PathBuf| project_dir.join(path).clean();

        Self {
            headers_root: resolve(headers.unwrap_or_else(|| DEFAULT_HEADERS.into())),
            sources_root: resolve(sources.unwrap_or_else(|| DEFAULT_SOURCES.into())),
            output_path: resolve(output.unwrap_or_else(|| DEFAULT_OUTPUT.into())),
            header_extension: normalize_extension(header_extension.as_deref().unwrap_or(DEFAULT_HEADER_EXTENSION)),
            source_extension: normalize_extension(source_extension.as_deref().unwrap_or(DEFAULT_SOURCE_EXTENSION)),
            manifest_base: relative_to.map(resolve),
        }
    }
}

/// One layer of optional settings, from a config file or the command line
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Overrides {
    pub headers: Option<PathBuf>,
    pub sources: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub header_extension: Option<String>,
    pub source_extension: Option<String>,
    pub relative_to: Option<PathBuf>,
}

impl Overrides {
    /// Field-wise merge where `other` wins
    pub fn merge(self, other: Self) -> Self {
        Self {
            headers: other.headers.or(self.headers),
            sources: other.sources.or(self.sources),
            output: other.output.or(self.output),
            header_extension: other.header_extension.or(self.header_extension),
            source_extension: other.source_extension.or(self.source_extension),
            relative_to: other.relative_to.or(self.relative_to),
        }
    }
}

/// Load config file layers for `project_dir`
///
/// With an `explicit` file only that file is read (and must exist),
/// otherwise the user file then the project file, both optional.
pub fn load_layers(project_dir: &Path, explicit: Option<&Path>) -> Result<Overrides, ::config::Error> {
    let layers: Vec<Overrides> = match explicit {
        Some(path) => vec![::config::load(&project_dir.join(path))?],
        None => ::config::load_layers(
            ::config::user_path(PROGRAM)
                .into_iter()
                .chain([::config::project_path(project_dir, PROGRAM)]),
        )?,
    };

    Ok(layers.into_iter().fold(Overrides::default(), Overrides::merge))
}

/// `.hpp` and `hpp` are the same extension
pub fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_owned()
}

#[cfg(test)]
mod tests {
    use fs_err as fs;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let config = Config::resolve(Path::new("/project"), Overrides::default());

        assert_eq!(
            config,
            Config::new("/project/include", "/project/src", "/project/file_walker.cmake")
        );
    }

    #[test]
    fn test_resolve_cleans_paths() {
        let overrides = Overrides {
            headers: Some("../include".into()),
            sources: Some("./code/src".into()),
            output: Some("/abs/out.cmake".into()),
            relative_to: Some(".".into()),
            ..Default::default()
        };

        let config = Config::resolve(Path::new("/project/ci"), overrides);

        assert_eq!(config.headers_root, Path::new("/project/include"));
        assert_eq!(config.sources_root, Path::new("/project/ci/code/src"));
        assert_eq!(config.output_path, Path::new("/abs/out.cmake"));
        assert_eq!(config.manifest_base.as_deref(), Some(Path::new("/project/ci")));
    }

    #[test]
    fn test_extensions_are_normalized() {
        let config = Config::new("i", "s", "o").with_extensions(".h", "cc");

        assert_eq!(config.header_extension, "h");
        assert_eq!(config.source_extension, "cc");

        let overrides = Overrides {
            header_extension: Some(".hh".to_owned()),
            ..Default::default()
        };
        assert_eq!(Config::resolve(Path::new("/"), overrides).header_extension, "hh");
    }

    #[test]
    fn test_merge_later_wins() {
        let base = Overrides {
            headers: Some("a".into()),
            sources: Some("b".into()),
            ..Default::default()
        };
        let top = Overrides {
            sources: Some("c".into()),
            ..Default::default()
        };

        let merged = base.merge(top);

        assert_eq!(merged.headers, Some("a".into()));
        assert_eq!(merged.sources, Some("c".into()));
    }

    #[test]
    fn test_load_project_layer() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("filewalker.yaml"),
            "headers: inc\nsource-extension: .cc\nrelative-to: .\n",
        )
        .unwrap();

        let overrides = load_layers(temp.path(), None).unwrap();

        assert_eq!(overrides.headers, Some("inc".into()));
        assert_eq!(overrides.source_extension, Some(".cc".to_owned()));
        assert_eq!(overrides.relative_to, Some(".".into()));
    }

    #[test]
    fn test_explicit_layer_must_exist() {
        let temp = TempDir::new().unwrap();

        assert!(load_layers(temp.path(), Some(Path::new("custom.yaml"))).is_err());

        fs::write(temp.path().join("custom.yaml"), "output: out.cmake\n").unwrap();
        let overrides = load_layers(temp.path(), Some(Path::new("custom.yaml"))).unwrap();
        assert_eq!(overrides.output, Some("out.cmake".into()));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("filewalker.yaml"), "header: typo\n").unwrap();

        assert!(load_layers(temp.path(), None).is_err());
    }
}
