use std::env;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use thiserror::Error;

/// Weight multiplier applied per ancestor level.
pub const DEFAULT_DECAY: f64 = 0.9;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// What to do when a `parentId` does not resolve inside the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MissingParentPolicy {
    /// Abort the whole run with `UnresolvedParent`.
    #[default]
    Fail,
    /// End that story's chain at the dangling link.
    Terminate,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read stories from a JSON snapshot file instead of MongoDB
    #[arg(long, env = "STORY_SNAPSHOT_PATH")]
    pub snapshot: Option<PathBuf>,

    /// Also write the rendered ranking as a JSON array to this path
    #[arg(long, env = "STORY_RANKING_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Write the normalized snapshot to this path before ranking
    #[arg(long, env = "STORY_SNAPSHOT_DUMP")]
    pub dump_snapshot: Option<PathBuf>,

    /// Weight multiplier applied to each ancestor level
    #[arg(long, env = "STORY_DECAY", default_value_t = DEFAULT_DECAY)]
    pub decay: f64,

    /// Policy for parent references missing from the snapshot
    #[arg(long, env = "STORY_MISSING_PARENT", value_enum, default_value_t = MissingParentPolicy::Fail)]
    pub missing_parent: MissingParentPolicy,

    /// Print raw (id, score) pairs before the rendered ranking
    #[arg(long)]
    pub print_scores: bool,
}

/// Connection descriptor for the live story collection.
#[derive(Clone, PartialEq, Eq)]
pub struct MongoSettings {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

// The URI usually carries credentials.
impl std::fmt::Debug for MongoSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoSettings")
            .field("uri", &"<redacted>")
            .field("database", &self.database)
            .field("collection", &self.collection)
            .finish()
    }
}

impl MongoSettings {
    /// Reads `MONGO_URI` (or `MONGO_URI_FILE`), `DATABASE_NAME` and `COLLECTION_NAME`.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when a variable is missing or the URI file cannot be read.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            uri: get_env_or_file("MONGO_URI")?,
            database: env_var("DATABASE_NAME")?,
            collection: env_var("COLLECTION_NAME")?,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_non_empty("MONGO_URI", &self.uri)?;
        validate_non_empty("DATABASE_NAME", &self.database)?;
        validate_non_empty("COLLECTION_NAME", &self.collection)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankerSettings {
    pub decay: f64,
    pub missing_parent: MissingParentPolicy,
}

impl Default for RankerSettings {
    fn default() -> Self {
        Self {
            decay: DEFAULT_DECAY,
            missing_parent: MissingParentPolicy::Fail,
        }
    }
}

impl RankerSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.decay.is_finite() || !(0.0..=1.0).contains(&self.decay) {
            return Err(ConfigError::Invalid {
                name: "decay",
                reason: format!("must be within [0, 1], got {}", self.decay),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SourceSettings {
    Mongo(MongoSettings),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub source: SourceSettings,
    pub ranker: RankerSettings,
    pub output: Option<PathBuf>,
    pub dump_snapshot: Option<PathBuf>,
    pub print_scores: bool,
}

impl Settings {
    /// Resolves the run configuration. Mongo variables are only required
    /// when no snapshot file was selected.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when required values are missing or invalid.
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let source = match cli.snapshot {
            Some(path) => SourceSettings::File(path),
            None => SourceSettings::Mongo(MongoSettings::from_env()?),
        };

        let settings = Self {
            source,
            ranker: RankerSettings {
                decay: cli.decay,
                missing_parent: cli.missing_parent,
            },
            output: cli.output,
            dump_snapshot: cli.dump_snapshot,
            print_scores: cli.print_scores,
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.source {
            SourceSettings::Mongo(mongo) => mongo.validate()?,
            SourceSettings::File(path) => {
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::Invalid {
                        name: "snapshot",
                        reason: "path cannot be empty".into(),
                    });
                }
            }
        }
        self.ranker.validate()
    }
}

fn validate_non_empty(name: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid {
            name,
            reason: "cannot be empty".into(),
        });
    }
    Ok(())
}

fn env_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

/// Read a value from environment variable, with support for _FILE suffix (Docker Secrets)
fn get_env_or_file(name: &'static str) -> Result<String, ConfigError> {
    let file_env = format!("{name}_FILE");
    if let Ok(file_path) = env::var(&file_env) {
        return fs::read_to_string(&file_path)
            .map(|content| content.trim().to_string())
            .map_err(|e| ConfigError::Invalid {
                name,
                reason: format!("failed to read {file_env} ({file_path}): {e}"),
            });
    }

    env_var(name)
}
