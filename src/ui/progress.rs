//! Progress indicators for long-running query loops
//!
//! Uses `linya` for allocation-free progress bars. A bar is only drawn when
//! there is at least one step to report.

use linya::{Bar, Progress};

/// Progress bar over a fixed number of queries
pub struct QueryProgress {
  inner: Option<(Progress, Bar)>,
}

impl QueryProgress {
  /// Create a new progress bar; `total == 0` draws nothing
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    if total == 0 {
      return Self { inner: None };
    }
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self {
      inner: Some((progress, bar)),
    }
  }

  /// Increment progress by 1
  pub fn inc(&mut self) {
    if let Some((progress, bar)) = self.inner.as_mut() {
      progress.inc_and_draw(bar, 1);
    }
  }
}
