use log::Level;

/// Route the `log` facade to the browser console; later calls are no-ops.
pub fn init_logging() {
    if console_log::init_with_level(Level::Debug).is_ok() {
        log::debug!(target: "dashboard.start", "console logging installed");
    }
}
