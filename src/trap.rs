// Start of file: /src/trap.rs

/*
    * Scoped runtime-error trap.
    *
    * Code running inside `scope` reports non-fatal runtime errors through
    * `raise`. While a trap is active and the severity is part of the process
    * reporting mask, the error comes back as a `TrappedError` the caller
    * propagates with `?` (it converts into a `Failure`). Outside a trap the
    * error is only logged.
    *
    * The same task-local frame carries the `PanicSite` the panic hook writes
    * to, so a panic location is only ever attributed to the trap it happened in.
*/

use std::future::Future;
use std::panic::{Location, PanicHookInfo};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, Once};

use tracing::{error, info, warn};

use crate::problem::{Failure, FailureRecord};

/// Class recorded for trapped runtime errors.
pub const TRAPPED_ERROR_CLASS: &str = "TrappedError";

bitflags::bitflags! {
    /// Bit set of runtime-error severities.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Severity: u32 {
        const ERROR = 1;
        const WARNING = 1 << 1;
        const NOTICE = 1 << 2;
        const DEPRECATED = 1 << 3;
        const USER_ERROR = 1 << 4;
        const USER_WARNING = 1 << 5;
        const USER_NOTICE = 1 << 6;
        const USER_DEPRECATED = 1 << 7;
        const ALL = 0xFF;
    }
}

impl Severity {
    /// Severity by its constant name, e.g. `"user_warning"`, ignoring case
    /// and surrounding blanks.
    pub fn parse_name(name: &str) -> Option<Self> {
        Self::from_name(&name.trim().to_ascii_uppercase())
    }

    fn is_error(self) -> bool {
        self.intersects(Self::ERROR | Self::USER_ERROR)
    }

    fn is_warning(self) -> bool {
        self.intersects(Self::WARNING | Self::USER_WARNING)
    }
}

static ERROR_REPORTING: AtomicU32 = AtomicU32::new(Severity::ALL.bits());

/// Replaces the process-wide reporting mask, returning the previous one.
pub fn set_error_reporting(mask: Severity) -> Severity {
    Severity::from_bits_retain(ERROR_REPORTING.swap(mask.bits(), Ordering::SeqCst))
}

/// Current process-wide reporting mask.
pub fn error_reporting() -> Severity {
    Severity::from_bits_retain(ERROR_REPORTING.load(Ordering::SeqCst))
}

/// Location of a panic raised inside a trap, written by the panic hook.
///
/// Panics on other threads and panics re-raised with
/// `std::panic::resume_unwind` never reach the hook from inside the trap, so
/// they leave the site empty.
#[derive(Debug, Default)]
pub struct PanicSite(Mutex<Option<(String, u32)>>);

impl PanicSite {
    fn record(&self, location: Option<(String, u32)>) {
        if let Ok(mut slot) = self.0.lock() {
            *slot = location;
        }
    }

    /// Recorded location, cleared on read.
    pub fn take(&self) -> Option<(String, u32)> {
        self.0.lock().ok().and_then(|mut slot| slot.take())
    }
}

// Per-task trap frame
struct Trap {
    depth: usize,
    panic_site: Arc<PanicSite>,
}

tokio::task_local! {
    static TRAP: Trap;
}

/// Runs `fut` with a trap installed. The previous trap (if any) is back in
/// place once `fut` completes, is dropped or unwinds.
///
/// Panics are recorded on the enclosing trap's site, or on a fresh one at the
/// outermost level.
pub async fn scope<F: Future>(fut: F) -> F::Output {
    let panic_site: Arc<PanicSite> = TRAP
        .try_with(|trap| trap.panic_site.clone())
        .unwrap_or_default();
    scope_with(panic_site, fut).await
}

/// Like [`scope`], recording panics raised inside `fut` on `panic_site`.
pub async fn scope_with<F: Future>(panic_site: Arc<PanicSite>, fut: F) -> F::Output {
    let trap: Trap = Trap {
        depth: depth() + 1,
        panic_site,
    };
    TRAP.scope(trap, fut).await
}

/// Whether the current task runs inside a trap.
pub fn is_active() -> bool {
    depth() > 0
}

/// Number of traps nested around the current task.
pub fn depth() -> usize {
    TRAP.try_with(|trap| trap.depth).unwrap_or(0)
}

/// Runtime error promoted by an active trap.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TrappedError {
    pub severity: Severity,
    pub message: String,
    pub file: String,
    pub line: u32,
}

impl From<TrappedError> for Failure {
    fn from(err: TrappedError) -> Self {
        FailureRecord::new(TRAPPED_ERROR_CLASS, err.message)
            .with_location(err.file, err.line)
            .into()
    }
}

/// Reports a runtime error at the caller's location.
///
/// Returns `Err` only when a trap is active and `severity` is in the reporting
/// mask. Errors outside the mask are dropped silently inside a trap; outside a
/// trap they are logged.
#[track_caller]
pub fn raise(severity: Severity, message: impl Into<String>) -> Result<(), TrappedError> {
    let location: &'static Location<'static> = Location::caller();
    let message: String = message.into();

    if !is_active() {
        let (file, line) = (location.file(), location.line());
        if severity.is_error() {
            error!(file, line, severity = severity.bits(), "{message}");
        } else if severity.is_warning() {
            warn!(file, line, severity = severity.bits(), "{message}");
        } else {
            info!(file, line, severity = severity.bits(), "{message}");
        }
        return Ok(());
    }

    if !error_reporting().intersects(severity) {
        return Ok(());
    }

    Err(TrappedError {
        severity,
        message,
        file: location.file().to_owned(),
        line: location.line(),
    })
}

/// Installs a panic hook that logs panics through `tracing` and records the
/// location of panics raised inside a trap on that trap's [`PanicSite`].
/// Idempotent.
pub fn install_panic_hook() {
    static INSTALL: Once = Once::new();

    INSTALL.call_once(|| {
        std::panic::set_hook(Box::new(|info: &PanicHookInfo<'_>| {
            let location: Option<(String, u32)> = info
                .location()
                .map(|location| (location.file().to_owned(), location.line()));

            let record: FailureRecord = FailureRecord::from_panic(info.payload(), location.clone());
            error!(
                file = ?record.file,
                line = ?record.line,
                "Request handler panicked: {}",
                record.message
            );

            // Outside a trap there is nobody to attribute the location to.
            let _ = TRAP.try_with(|trap| trap.panic_site.record(location));
        }));
    });
}


// End of file: /src/trap.rs
