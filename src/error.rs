//! Error type returned by runnables and by every policy layer.
//!
//! [`TaskError`] is a single tree-shaped enum: leaf variants describe what a runnable
//! itself reported (`Fail`, `Canceled`, `Panicked`), wrapping variants add the context
//! of the layer that observed the failure (`RetryExhausted`, `RetryCanceled`, `Replica`,
//! `Group`). The rendered message chain is enough to tell which layer, replica and
//! attempt produced the underlying failure.
//!
//! ## Joined errors
//! Retry layers accumulate several errors; they render as `[e1; e2; ...]`.
//!
//! ## Cancellation class
//! [`TaskError::is_canceled`] looks through wrapping variants, so a cancellation that
//! surfaces deep inside a replica or a retry loop is still classified as cancellation.

use std::fmt;

use thiserror::Error;

/// # Errors produced by runnables and policy layers.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// A single run failed with its own error.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The run observed cancellation of its token and stopped.
    #[error("context cancelled")]
    Canceled,

    /// Every attempt of a bounded retry loop failed.
    #[error("failed after {bound} retries: {}", Joined(errors))]
    RetryExhausted {
        /// The configured number of attempts.
        bound: u32,
        /// Failures in attempt order.
        errors: Vec<TaskError>,
    },

    /// Cancellation fired while a retry loop was waiting between attempts.
    #[error("context cancelled during retry delay: {}", Joined(errors))]
    RetryCanceled {
        /// Failures accumulated before cancellation.
        errors: Vec<TaskError>,
    },

    /// One replica of a replicated runnable failed.
    #[error("replica {index} returned error: {source}")]
    Replica {
        /// Replica number (1-based).
        index: usize,
        /// The replica's own error.
        source: Box<TaskError>,
    },

    /// A member of a launcher group failed.
    #[error("member #{index} ({name}) in launcher has returned an error: {source}")]
    Group {
        /// Position of the member in the launcher (0-based).
        index: usize,
        /// Diagnostic name of the member.
        name: String,
        /// The member's own error.
        source: Box<TaskError>,
    },

    /// A panic was caught at a fault isolation boundary.
    #[error("panic recovered: {reason}")]
    Panicked {
        /// Panic payload message.
        reason: String,
    },
}

impl TaskError {
    /// Builds a [`TaskError::Fail`] from anything displayable.
    ///
    /// ```
    /// use taskchain::TaskError;
    ///
    /// let err = TaskError::fail("boom");
    /// assert_eq!(err.to_string(), "execution failed: boom");
    /// ```
    pub fn fail(error: impl fmt::Display) -> Self {
        TaskError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// ```
    /// use taskchain::TaskError;
    ///
    /// assert_eq!(TaskError::Canceled.as_label(), "task_canceled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Canceled => "task_canceled",
            TaskError::RetryExhausted { .. } => "retry_exhausted",
            TaskError::RetryCanceled { .. } => "retry_canceled",
            TaskError::Replica { .. } => "replica_failed",
            TaskError::Group { .. } => "group_failed",
            TaskError::Panicked { .. } => "panic_recovered",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Canceled => "context cancelled".to_string(),
            TaskError::RetryExhausted { bound, errors } => {
                format!("retry exhausted: bound={bound} errors={}", errors.len())
            }
            TaskError::RetryCanceled { errors } => {
                format!("retry cancelled: errors={}", errors.len())
            }
            TaskError::Replica { index, source } => {
                format!("replica={index}: {}", source.as_message())
            }
            TaskError::Group {
                index,
                name,
                source,
            } => format!("member={index} name={name}: {}", source.as_message()),
            TaskError::Panicked { reason } => format!("panic: {reason}"),
        }
    }

    /// Returns the errors directly wrapped by this one.
    ///
    /// Leaf variants return an empty iterator.
    pub fn causes(&self) -> impl Iterator<Item = &TaskError> {
        let slice: &[TaskError] = match self {
            TaskError::RetryExhausted { errors, .. } | TaskError::RetryCanceled { errors } => {
                errors.as_slice()
            }
            TaskError::Replica { source, .. } | TaskError::Group { source, .. } => {
                std::slice::from_ref(source.as_ref())
            }
            TaskError::Fail { .. } | TaskError::Canceled | TaskError::Panicked { .. } => &[],
        };
        slice.iter()
    }

    /// Indicates whether this error belongs to the cancellation class.
    ///
    /// True for [`TaskError::Canceled`] and [`TaskError::RetryCanceled`], and for any
    /// wrapping variant whose wrapped errors contain a cancellation.
    ///
    /// ```
    /// use taskchain::TaskError;
    ///
    /// let err = TaskError::Replica { index: 2, source: Box::new(TaskError::Canceled) };
    /// assert!(err.is_canceled());
    /// assert!(!TaskError::fail("boom").is_canceled());
    /// ```
    pub fn is_canceled(&self) -> bool {
        match self {
            TaskError::Canceled | TaskError::RetryCanceled { .. } => true,
            _ => self.causes().any(TaskError::is_canceled),
        }
    }
}

/// Renders a list of errors as `[e1; e2; ...]`.
struct Joined<'a>(&'a [TaskError]);

impl fmt::Display for Joined<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        f.write_str("]")
    }
}
