//! Effective run settings: CLI flags layered over the config file.

use crate::cli::args::PlanArgs;
use crate::core::planner::PlanOptions;
use crate::core::script::{PreviewInfo, ShellDialect};
use crate::generators::filename::NameFormatter;
use crate::models::config::{load_config, Config};
use crate::models::plan::{OperationKind, PathMapping};
use crate::utils::path::parse_path_mapping;
use crate::Result;
use std::path::PathBuf;

/// Values every command works from once flags and config are merged.
#[derive(Debug, Clone)]
pub struct Settings {
    pub kind: OperationKind,
    pub output_dir: Option<PathBuf>,
    pub formatter: NameFormatter,
    pub path_map: Option<PathMapping>,
    pub shell: ShellDialect,
    pub auto_approve: bool,
    /// Section IDs to process (empty = all).
    pub libraries: Vec<i64>,
}

impl Settings {
    /// Load the config file named by `args` (or the default one) and merge.
    pub fn resolve(args: &PlanArgs, shell: Option<&str>) -> Result<Self> {
        let config = load_config(args.config.as_deref())?;
        Self::merge(args, shell, config)
    }

    /// Merge flags over `config`. A flag always wins over the file.
    pub fn merge(args: &PlanArgs, shell: Option<&str>, config: Config) -> Result<Self> {
        let kind = match &args.mode {
            Some(mode) => mode.parse()?,
            None => config.mode,
        };

        let output_dir = args
            .output
            .clone()
            .or(config.output_dir.clone())
            .filter(|p| !p.as_os_str().is_empty());

        let tv_format = args.tv_format.as_deref().unwrap_or(&config.tv_format);
        let movie_format = args.movie_format.as_deref().unwrap_or(&config.movie_format);

        let path_map = match &args.path_map {
            Some(spec) => Some(parse_path_mapping(spec)?),
            None => config.path_mapping(),
        };

        let shell = shell.unwrap_or(&config.shell).parse()?;

        Ok(Self {
            kind,
            output_dir,
            formatter: NameFormatter::new(tv_format, movie_format),
            path_map,
            shell,
            auto_approve: config.auto_approve,
            libraries: args.libraries.clone(),
        })
    }

    /// Planner options before any location selection.
    pub fn plan_options(&self) -> PlanOptions {
        PlanOptions {
            kind: self.kind,
            output_dir: self.output_dir.clone(),
            path_map: self.path_map.clone(),
            ..Default::default()
        }
    }

    pub fn preview_info(&self) -> PreviewInfo {
        PreviewInfo {
            mode: self.kind,
            output_dir: self.output_dir.clone(),
            path_map: self.path_map.clone(),
        }
    }

    /// Whether section `id` passes the `--library` filter.
    pub fn wants_library(&self, id: i64) -> bool {
        self.libraries.is_empty() || self.libraries.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::filename::DEFAULT_TV_FORMAT;
    use crate::Error;

    #[test]
    fn test_defaults() {
        let settings = Settings::merge(&PlanArgs::default(), None, Config::default()).unwrap();
        assert_eq!(settings.kind, OperationKind::Move);
        assert_eq!(settings.shell, ShellDialect::Batch);
        assert_eq!(settings.formatter.tv_format(), DEFAULT_TV_FORMAT);
        assert!(settings.output_dir.is_none());
        assert!(settings.path_map.is_none());
        assert!(settings.wants_library(42));
    }

    #[test]
    fn test_flags_override_config() {
        let config = Config {
            mode: OperationKind::Move,
            output_dir: Some(PathBuf::from("/from-config")),
            movie_format: "{title}{ext}".to_string(),
            path_map_from: Some("/a".to_string()),
            path_map_to: Some("/b".to_string()),
            shell: "powershell".to_string(),
            ..Config::default()
        };
        let args = PlanArgs {
            mode: Some("copy".to_string()),
            output: Some(PathBuf::from("/from-flag")),
            path_map: Some("/x:/y".to_string()),
            libraries: vec![2],
            ..Default::default()
        };

        let settings = Settings::merge(&args, Some("bash"), config).unwrap();
        assert_eq!(settings.kind, OperationKind::Copy);
        assert_eq!(settings.output_dir, Some(PathBuf::from("/from-flag")));
        assert_eq!(settings.formatter.movie_format(), "{title}{ext}");
        assert_eq!(settings.path_map.as_ref().unwrap().from, "/x");
        assert_eq!(settings.shell, ShellDialect::Posix);
        assert!(settings.wants_library(2));
        assert!(!settings.wants_library(3));
    }

    #[test]
    fn test_config_used_when_flags_absent() {
        let config = Config {
            path_map_from: Some("/a".to_string()),
            path_map_to: Some("/b".to_string()),
            shell: "ps".to_string(),
            auto_approve: true,
            ..Config::default()
        };
        let settings = Settings::merge(&PlanArgs::default(), None, config).unwrap();
        assert_eq!(settings.shell, ShellDialect::PowerShell);
        assert_eq!(settings.path_map.unwrap().to, "/b");
        assert!(settings.auto_approve);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let args = PlanArgs {
            mode: Some("symlink".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            Settings::merge(&args, None, Config::default()),
            Err(Error::UnknownOperationKind(_))
        ));
        assert!(matches!(
            Settings::merge(&PlanArgs::default(), Some("fish"), Config::default()),
            Err(Error::UnsupportedShell(_))
        ));
        let args = PlanArgs {
            path_map: Some("nocolon".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            Settings::merge(&args, None, Config::default()),
            Err(Error::InvalidPathMapping(_))
        ));
    }
}
