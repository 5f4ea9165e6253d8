//! Error types for update-crate-tests with contextual messages and exit codes
//!
//! Every failure in this tool is fatal. Errors are categorized so the entry
//! point can pick an exit code and print a help line where one exists.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for update-crate-tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (environment, config, invalid paths)
  User = 1,
  /// System error (external tools, I/O)
  System = 2,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for update-crate-tests
#[derive(Debug)]
pub enum UpdaterError {
  /// Environment and configuration errors
  Config(ConfigError),

  /// External build or query tool errors
  Query(QueryError),

  /// Package path errors
  Path(PathError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl UpdaterError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    UpdaterError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    UpdaterError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      UpdaterError::Message { message, context, help } => UpdaterError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      UpdaterError::Io(err) => UpdaterError::Message {
        message: format!("{}: {}", ctx_str, err),
        context: None,
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      UpdaterError::Config(_) => ExitCode::User,
      UpdaterError::Query(_) => ExitCode::System,
      UpdaterError::Path(_) => ExitCode::User,
      UpdaterError::Io(_) => ExitCode::System,
      UpdaterError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      UpdaterError::Config(e) => e.help_message(),
      UpdaterError::Query(e) => e.help_message(),
      UpdaterError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for UpdaterError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      UpdaterError::Config(e) => write!(f, "{}", e),
      UpdaterError::Query(e) => write!(f, "{}", e),
      UpdaterError::Path(e) => write!(f, "{}", e),
      UpdaterError::Io(e) => write!(f, "I/O error: {}", e),
      UpdaterError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for UpdaterError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      UpdaterError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for UpdaterError {
  fn from(err: io::Error) -> Self {
    UpdaterError::Io(err)
  }
}

impl From<String> for UpdaterError {
  fn from(msg: String) -> Self {
    UpdaterError::message(msg)
  }
}

impl From<&str> for UpdaterError {
  fn from(msg: &str) -> Self {
    UpdaterError::message(msg)
  }
}

impl From<toml_edit::de::Error> for UpdaterError {
  fn from(err: toml_edit::de::Error) -> Self {
    UpdaterError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for UpdaterError {
  fn from(err: serde_json::Error) -> Self {
    UpdaterError::message(format!("JSON error: {}", err))
  }
}

/// Environment and configuration errors
#[derive(Debug)]
pub enum ConfigError {
  /// A required environment variable is unset
  MissingEnv { var: String },

  /// The host platform is not supported
  UnsupportedPlatform { os: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::MissingEnv { .. } => Some("Run `. build/envsetup.sh` then `lunch <target>` and retry.".to_string()),
      ConfigError::UnsupportedPlatform { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::MissingEnv { var } => write!(
        f,
        "${} is not defined; you must first source build/envsetup.sh and select a target.",
        var
      ),
      ConfigError::UnsupportedPlatform { os } => {
        write!(f, "This tool has only been tested on Linux (running on {}).", os)
      }
    }
  }
}

/// External build or query tool errors
#[derive(Debug)]
pub enum QueryError {
  /// A soong_ui step exited non-zero; carries combined stdout and stderr
  BuildFailed { step: String, output: String },

  /// A bazel query exited non-zero
  QueryFailed { command: String, stderr: String },

  /// The tool could not be spawned at all
  SpawnFailed { program: PathBuf, reason: String },
}

impl QueryError {
  fn help_message(&self) -> Option<String> {
    match self {
      QueryError::SpawnFailed { program, .. } => Some(format!(
        "Check that {} exists and is executable in this tree.",
        program.display()
      )),
      _ => None,
    }
  }
}

impl fmt::Display for QueryError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      QueryError::BuildFailed { step, output } => write!(f, "{}: {}", step, output),
      QueryError::QueryFailed { command, stderr } => {
        write!(f, "Bazel query failed: {}\n{}", command, stderr)
      }
      QueryError::SpawnFailed { program, reason } => {
        write!(f, "Failed to execute {}: {}", program.display(), reason)
      }
    }
  }
}

/// Package path errors
#[derive(Debug)]
pub enum PathError {
  /// The package directory is outside the tree root
  NotUnderRoot { path: PathBuf, root: PathBuf },
}

impl fmt::Display for PathError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PathError::NotUnderRoot { path, root } => write!(
        f,
        "The path {} is not under {}; You must be in the directory of a crate or pass its absolute path as the argument.",
        path.display(),
        root.display()
      ),
    }
  }
}

/// Result type alias for update-crate-tests
pub type UpdaterResult<T> = Result<T, UpdaterError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> UpdaterResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> UpdaterResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<UpdaterError>,
{
  fn context(self, ctx: impl Into<String>) -> UpdaterResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> UpdaterResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Print an error to stderr with the `Error:` prefix and any help text
pub fn print_error(error: &UpdaterError) {
  eprintln!("Error: {}", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}", help);
  }
}
