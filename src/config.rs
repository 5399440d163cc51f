use anyhow::{bail, Context as _};
use clap::{Args, ValueEnum};
use serde::Deserialize;
use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::algorithm::{index::DuplicatePolicy, normalize::NormalizationMode, ComparisonParams};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    /// Human-readable report.
    Text,
    /// The whole comparison as one JSON document.
    Json,
    Debug,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Normalization {
    /// Keep diacritics.
    Strict,
    /// Fold diacritics to base letters, so "für" and "fur" compare equal.
    Loose,
}

impl Normalization {
    pub fn convert(&self) -> NormalizationMode {
        match &self {
            Normalization::Strict => NormalizationMode::Strict,
            Normalization::Loose => NormalizationMode::Loose,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Duplicates {
    /// A chunk repeated inside one document points at its first occurrence.
    KeepFirst,
    /// A chunk repeated inside one document points at its last occurrence.
    KeepLast,
}

impl Duplicates {
    pub fn convert(&self) -> DuplicatePolicy {
        match &self {
            Duplicates::KeepFirst => DuplicatePolicy::KeepFirst,
            Duplicates::KeepLast => DuplicatePolicy::KeepLast,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorChoice {
    /// Style the report when it goes to a terminal.
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn enabled(&self, is_terminal: bool) -> bool {
        match self {
            ColorChoice::Auto => is_terminal,
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

macro_rules! config_structs {
    {
        $(
            $( #[config_opt($attr:meta)] )*
            pub $name:ident: $typ:ty,
        )*
        $(
            #[config_alias($atarget:ident = $avalue:expr)]
            $( #[config_opt($aattr:meta)] )*
            pub $aname:ident: bool,
        )*
    } => {
        #[derive(Clone, Debug, PartialEq)]
        pub struct Config {
            $( pub $name: $typ, )*
        }

        #[derive(Args, Deserialize, Default, Debug)]
        #[serde(deny_unknown_fields)]
        pub struct ConfigOpt {
            $( $( #[$aattr] )* #[serde(skip)] pub $aname: bool, )*
            $( $( #[$attr] )* pub $name: Option<$typ>, )*
        }

        impl Config {
            pub fn update(self, mut opt: ConfigOpt) -> Config {
                $(
                    if opt.$aname {
                        opt.$atarget = Some($avalue);
                    }
                )*
                Config {
                    $( $name: opt.$name.unwrap_or(self.$name), )*
                }
            }
        }
    }
}

config_structs! {
    #[config_opt(arg(short, long))]
    pub mode: OutputMode,

    #[config_opt(arg(short = 'n', long, value_name = "NUM", allow_negative_numbers = true, help = "Number of consecutive words that form one chunk"))]
    pub chunk_size: i64,

    #[config_opt(arg(long, value_name = "NUM", allow_negative_numbers = true, help = "Drop sentences with fewer words"))]
    pub min_sentence_words: i64,

    #[config_opt(arg(short = 'C', long, value_name = "NUM", allow_negative_numbers = true, help = "Sentences of context shown on each side of a match"))]
    pub context_radius: i64,

    #[config_opt(arg(long, group = "normalization_group"))]
    pub normalization: Normalization,

    #[config_opt(arg(long, require_equals = true, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL", group = "collapse_spaced_dashes_group"))]
    pub collapse_spaced_dashes: bool,

    #[config_opt(arg(long, group = "duplicates_group"))]
    pub duplicates: Duplicates,

    #[config_opt(arg(long, require_equals = true, num_args = 0..=1, default_missing_value = "always", group = "color_group"))]
    pub color: ColorChoice,

    #[config_opt(arg(long, value_name = "COMMAND", help = "PDF to text command writing to stdout, {input} is replaced with the path"))]
    pub extractor: String,

    #[config_alias(normalization = Normalization::Loose)]
    #[config_opt(arg(long, group = "normalization_group"))]
    pub loose: bool,

    #[config_alias(collapse_spaced_dashes = false)]
    #[config_opt(arg(long, group = "collapse_spaced_dashes_group"))]
    pub no_collapse_spaced_dashes: bool,

    #[config_alias(duplicates = Duplicates::KeepLast)]
    #[config_opt(arg(long, group = "duplicates_group"))]
    pub keep_last_duplicate: bool,

    #[config_alias(color = ColorChoice::Never)]
    #[config_opt(arg(long, group = "color_group"))]
    pub no_color: bool,
}

pub const DEFAULT_EXTRACTOR: &str = "pdftotext -layout -enc UTF-8 {input} -";

impl Default for Config {
    fn default() -> Config {
        Config {
            mode: OutputMode::Text,
            chunk_size: 5,
            min_sentence_words: 3,
            context_radius: 2,
            normalization: Normalization::Strict,
            collapse_spaced_dashes: false,
            duplicates: Duplicates::KeepFirst,
            color: ColorChoice::Auto,
            extractor: DEFAULT_EXTRACTOR.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NotPositive { name: &'static str, value: i64 },
    Negative { name: &'static str, value: i64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotPositive { name, value } => write!(f, "{name} must be at least 1, got {value}"),
            ConfigError::Negative { name, value } => write!(f, "{name} must not be negative, got {value}"),
        }
    }
}

impl std::error::Error for ConfigError {}

fn non_negative(name: &'static str, value: i64) -> Result<usize, ConfigError> {
    usize::try_from(value).map_err(|_| ConfigError::Negative { name, value })
}

impl Config {
    /// Checks the numeric knobs and turns the configuration into the parameters of a run.
    pub fn validate(&self) -> Result<ComparisonParams, ConfigError> {
        if self.chunk_size < 1 {
            return Err(ConfigError::NotPositive {
                name: "chunk-size",
                value: self.chunk_size,
            });
        }
        Ok(ComparisonParams {
            chunk_size: non_negative("chunk-size", self.chunk_size)?,
            min_sentence_words: non_negative("min-sentence-words", self.min_sentence_words)?,
            context_radius: non_negative("context-radius", self.context_radius)?,
            normalization: self.normalization.convert(),
            collapse_spaced_dashes: self.collapse_spaced_dashes,
            duplicate_policy: self.duplicates.convert(),
        })
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("docmatch").join("config.toml"))
}

/// Reads the TOML configuration file. A missing file at the default location is not an
/// error, a missing file that was asked for explicitly is.
pub fn load_config_file(explicit: Option<&Path>) -> anyhow::Result<ConfigOpt> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                bail!("Config file {} does not exist", path.display());
            }
            path.to_owned()
        }
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(ConfigOpt::default()),
        },
    };
    log::debug!("loading configuration from {}", path.display());

    let text = std::fs::read_to_string(&path).with_context(|| format!("Cannot read {}", path.display()))?;
    let opt = toml::from_str(&text).with_context(|| format!("Cannot parse {}", path.display()))?;
    Ok(opt)
}

#[cfg(test)]
mod test {
    use super::{load_config_file, ColorChoice, Config, ConfigError, ConfigOpt, Duplicates, Normalization, OutputMode};
    use crate::algorithm::{index::DuplicatePolicy, normalize::NormalizationMode, ComparisonParams};
    use clap::Parser;
    use std::io::Write as _;

    #[derive(Parser)]
    struct TestArgs {
        #[command(flatten)]
        config: ConfigOpt,
    }

    fn parse(args: &[&str]) -> Config {
        let args = TestArgs::try_parse_from(std::iter::once("docmatch").chain(args.iter().copied())).unwrap();
        Config::default().update(args.config)
    }

    #[test]
    fn defaults() {
        assert_eq!(Config::default().validate(), Ok(ComparisonParams::default()));
    }

    #[test]
    fn command_line_overrides() {
        let config = parse(&["--chunk-size", "7", "-C", "0", "--mode", "json", "--duplicates", "keep-last"]);
        assert_eq!(config.chunk_size, 7);
        assert_eq!(config.context_radius, 0);
        assert_eq!(config.mode, OutputMode::Json);
        assert_eq!(config.duplicates, Duplicates::KeepLast);
        assert_eq!(config.min_sentence_words, 3);
    }

    #[test]
    fn aliases() {
        let config = parse(&["--loose", "--keep-last-duplicate", "--no-color"]);
        let params = config.validate().unwrap();
        assert_eq!(params.normalization, NormalizationMode::Loose);
        assert_eq!(params.duplicate_policy, DuplicatePolicy::KeepLast);
        assert_eq!(config.color, ColorChoice::Never);

        assert!(parse(&["--collapse-spaced-dashes"]).collapse_spaced_dashes);
        assert!(!parse(&["--collapse-spaced-dashes=false"]).collapse_spaced_dashes);

        let from_file = Config::default().update(ConfigOpt {
            collapse_spaced_dashes: Some(true),
            ..ConfigOpt::default()
        });
        let args = TestArgs::try_parse_from(["docmatch", "--no-collapse-spaced-dashes"]).unwrap();
        assert!(!from_file.update(args.config).collapse_spaced_dashes);
    }

    #[test]
    fn alias_conflicts_with_its_target() {
        assert!(TestArgs::try_parse_from(["docmatch", "--loose", "--normalization", "strict"]).is_err());
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        assert_eq!(
            parse(&["--chunk-size", "0"]).validate(),
            Err(ConfigError::NotPositive {
                name: "chunk-size",
                value: 0
            })
        );
        assert_eq!(
            parse(&["--context-radius", "-1"]).validate(),
            Err(ConfigError::Negative {
                name: "context-radius",
                value: -1
            })
        );
        assert!(parse(&["--min-sentence-words=-4"]).validate().is_err());
        assert_eq!(
            parse(&["--chunk-size", "-2"]).validate().unwrap_err().to_string(),
            "chunk-size must be at least 1, got -2"
        );
    }

    #[test]
    fn config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "chunk_size = 8\nnormalization = \"loose\"\ncolor = \"never\"").unwrap();
        let opt = load_config_file(Some(file.path())).unwrap();
        let config = Config::default().update(opt);
        assert_eq!(config.chunk_size, 8);
        assert_eq!(config.normalization, Normalization::Loose);
        assert_eq!(config.color, ColorChoice::Never);
        assert_eq!(config.context_radius, 2);
    }

    #[test]
    fn command_line_wins_over_config_file() {
        let file_opt: ConfigOpt = toml::from_str("chunk_size = 8\ncontext_radius = 4").unwrap();
        let args = TestArgs::try_parse_from(["docmatch", "--chunk-size", "6"]).unwrap();
        let config = Config::default().update(file_opt).update(args.config);
        assert_eq!(config.chunk_size, 6);
        assert_eq!(config.context_radius, 4);
    }

    #[test]
    fn broken_config_files() {
        assert!(load_config_file(Some(std::path::Path::new("/nonexistent/docmatch.toml"))).is_err());
        assert!(toml::from_str::<ConfigOpt>("chunk_sise = 8").is_err());
    }

    #[test]
    fn color_choice() {
        assert!(ColorChoice::Auto.enabled(true));
        assert!(!ColorChoice::Auto.enabled(false));
        assert!(ColorChoice::Always.enabled(false));
        assert!(!ColorChoice::Never.enabled(true));
    }
}
