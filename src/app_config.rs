//! Config file loading and the merge of file values with CLI flags.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};

use get_comics_core::RunOptions;

use crate::cli::Args;

/// File configuration for run defaults. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Default output directory.
    pub output_dir: Option<PathBuf>,
    /// Site origin to crawl.
    pub base_url: Option<String>,
    /// Connect timeout for every HTTP client, in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// Read timeout for pages and host resolution, in seconds.
    pub read_timeout_secs: Option<u64>,
    /// Read timeout for file transfers, in seconds.
    pub download_read_timeout_secs: Option<u64>,
    /// Ceiling on listing pages for unbounded walks.
    pub max_index_pages: Option<u32>,
    /// Chrome/Chromium executable for browser-backed hosts.
    pub chrome_path: Option<PathBuf>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Validates config values against runtime constraints.
    pub fn validate(&self) -> Result<()> {
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        validate_timeout_secs(
            "download_read_timeout_secs",
            self.download_read_timeout_secs,
        )?;

        if let Some(max) = self.max_index_pages
            && max == 0
        {
            bail!("Invalid config value for `max_index_pages`: 0. Expected at least 1");
        }

        if let Some(base_url) = self.base_url.as_deref()
            && url::Url::parse(base_url).is_err()
        {
            bail!("Invalid config value for `base_url`: '{base_url}' is not an absolute URL");
        }

        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Verbose => "verbose",
            Self::Quiet => "quiet",
            Self::Debug => "debug",
        }
    }

    /// Log filter directive this setting maps to.
    #[must_use]
    pub fn filter_level(self) -> &'static str {
        match self {
            Self::Default => "info",
            Self::Verbose => "debug",
            Self::Quiet => "error",
            Self::Debug => "trace",
        }
    }
}

/// Resolves the default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/get-comics/config.toml`
/// 2. `$HOME/.config/get-comics/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("get-comics")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("get-comics")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from the default path if a file is present there.
pub fn load_default_file_config() -> Result<Option<FileConfig>> {
    let Some(path) = resolve_default_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }
    load_file_config(&path).map(Some)
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let context = || format!("Invalid `{key}` value on line {line_no}");

        match key {
            "output_dir" => {
                cfg.output_dir = Some(PathBuf::from(
                    parse_string_literal(value).with_context(context)?,
                ));
            }
            "base_url" => {
                cfg.base_url = Some(parse_string_literal(value).with_context(context)?);
            }
            "chrome_path" => {
                cfg.chrome_path = Some(PathBuf::from(
                    parse_string_literal(value).with_context(context)?,
                ));
            }
            "connect_timeout_secs" => {
                cfg.connect_timeout_secs = Some(parse_integer_u64(value).with_context(context)?);
            }
            "read_timeout_secs" => {
                cfg.read_timeout_secs = Some(parse_integer_u64(value).with_context(context)?);
            }
            "download_read_timeout_secs" => {
                cfg.download_read_timeout_secs =
                    Some(parse_integer_u64(value).with_context(context)?);
            }
            "max_index_pages" => {
                let parsed = parse_integer_u64(value).with_context(context)?;
                let n = u32::try_from(parsed)
                    .map_err(|_| anyhow::anyhow!("max_index_pages out of range for u32"))?;
                cfg.max_index_pages = Some(n);
            }
            "verbosity" => {
                let parsed = parse_string_literal(value).with_context(context)?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_no}")
                })?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}

/// Builds the immutable run options: CLI flags over file values over defaults.
#[must_use]
pub fn build_run_options(args: &Args, file: Option<&FileConfig>) -> RunOptions {
    let defaults = RunOptions::default();
    let file = file.cloned().unwrap_or_default();

    let mut network = defaults.network.clone();
    if let Some(secs) = file.connect_timeout_secs {
        network.connect_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = file.read_timeout_secs {
        network.read_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = file.download_read_timeout_secs {
        network.download_read_timeout = Duration::from_secs(secs);
    }
    network.chrome_path = file.chrome_path;

    RunOptions {
        output_dir: args
            .output
            .clone()
            .or(file.output_dir)
            .unwrap_or(defaults.output_dir),
        pages: args.pages,
        start: args.start,
        overwrite: args.overwrite,
        save_links: args.save_links,
        url: args.url.clone(),
        query: args.query.clone(),
        tag: args.tag.clone(),
        category: args.category.clone(),
        no_extract: args.no_extract,
        cbz: args.cbz,
        flatten: args.flatten,
        base_url: args
            .base_url
            .clone()
            .or(file.base_url)
            .unwrap_or(defaults.base_url),
        max_index_pages: file.max_index_pages.unwrap_or(defaults.max_index_pages),
        network,
    }
}
