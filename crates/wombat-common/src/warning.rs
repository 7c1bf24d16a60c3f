//! Engine warnings with colored terminal output.
//!
//! Nothing inside the engine is fatal: malformed markup and stylesheets are
//! recovered and the page still renders. The recoveries are reported here so
//! they are visible during debugging, once per unique message.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Whether warnings are printed at all.
static ENABLED: AtomicBool = AtomicBool::new(true);

/// Warn about a recovered anomaly (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("CSS", "dropped declaration 'color' at byte 14");
/// ```
pub fn warn_once(component: &str, message: &str) {
    if !ENABLED.load(Ordering::Relaxed) {
        return;
    }

    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .map(|mut guard| guard.get_or_insert_with(HashSet::new).insert(key))
        // A poisoned set only loses deduplication, never the warning.
        .unwrap_or(true);

    if should_print {
        eprintln!("{}", format!("[Wombat {component}] ⚠ {message}").yellow());
    }
}

/// Clear all recorded warnings (call when loading a new page)
pub fn clear_warnings() {
    if let Ok(mut guard) = WARNED.lock()
        && let Some(set) = guard.as_mut()
    {
        set.clear();
    }
}

/// Turn warning output on or off for the whole process.
///
/// The CLI's `--quiet` flag switches this off.
pub fn set_warnings_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}
