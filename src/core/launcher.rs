//! # Launcher: run a fixed set of runnables as one supervised unit.
//!
//! A [`Launcher`] owns an immutable list of members. Running it spawns one task per
//! member inside a [`TaskGroup`]: all members share the group token, the first failure
//! cancels it and is reported as [`TaskError::Group`] naming the member.
//!
//! ```text
//! Launcher::run(ctx)
//!   └─► TaskGroup::new(&ctx)
//!         ├─► member[0].run(group_token) ──► Err? → Group { index: 0, name, source }
//!         ├─► member[1].run(group_token)
//!         └─► member[N-1].run(group_token)
//!       wait(): first Group error, or Ok when every member succeeded
//! ```
//!
//! A launcher is itself a [`Runnable`], so it can be decorated with a
//! [`Chain`](crate::Chain) or nested inside another launcher.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use taskchain::{Launcher, RunFn, Runnable, TaskError};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let launcher = Launcher::new([
//!     RunFn::arc(|_ctx: CancellationToken| async { Ok::<_, TaskError>(()) }),
//!     RunFn::arc(|_ctx: CancellationToken| async { Ok::<_, TaskError>(()) }),
//! ]);
//! assert_eq!(launcher.len(), 2);
//! assert!(launcher.run(CancellationToken::new()).await.is_ok());
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::core::group::TaskGroup;
use crate::error::TaskError;
use crate::runnables::{Runnable, RunnableRef};

/// Fixed group of runnables launched together.
#[derive(Clone)]
pub struct Launcher {
    members: Arc<[RunnableRef]>,
}

impl Launcher {
    /// Creates a launcher over `members`; membership never changes afterwards.
    pub fn new(members: impl IntoIterator<Item = RunnableRef>) -> Self {
        Self {
            members: members.into_iter().collect(),
        }
    }

    /// Returns the members in launch order.
    pub fn members(&self) -> &[RunnableRef] {
        &self.members
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the launcher has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl fmt::Debug for Launcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.members.iter().map(|m| m.name()).collect();
        f.debug_struct("Launcher").field("members", &names).finish()
    }
}

#[async_trait]
impl Runnable for Launcher {
    fn name(&self) -> &str {
        "launcher"
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError> {
        let mut group = TaskGroup::new(&ctx);
        for (index, member) in self.members.iter().enumerate() {
            let member = Arc::clone(member);
            group.spawn(move |token| async move {
                member.run(token).await.map_err(|e| TaskError::Group {
                    index,
                    name: member.name().to_string(),
                    source: Box::new(e),
                })
            });
        }
        tracing::debug!(members = self.members.len(), "launcher started");

        let res = group.wait().await;
        if let Err(e) = &res {
            tracing::debug!(error = %e, "launcher stopped with error");
        }
        res
    }
}

/// Shorthand for [`Launcher::new`] returning a shared handle.
///
/// ```rust
/// use tokio_util::sync::CancellationToken;
/// use taskchain::{launch, RunFn, Runnable, TaskError};
///
/// let all = launch([RunFn::arc(|_ctx: CancellationToken| async { Ok::<_, TaskError>(()) })]);
/// assert_eq!(all.name(), "launcher");
/// ```
pub fn launch(members: impl IntoIterator<Item = RunnableRef>) -> RunnableRef {
    Arc::new(Launcher::new(members))
}
