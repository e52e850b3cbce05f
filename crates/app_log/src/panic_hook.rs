//! Panic hook for crash reporting

use backtrace::Backtrace;
use chrono::Local;
use std::panic::PanicHookInfo;

/// Initialize the panic hook for crash reporting
pub fn init_panic_hook() {
    std::panic::set_hook(Box::new(panic_handler));
    tracing::debug!("Panic hook initialized");
}

/// Build the text of a crash report
pub fn crash_report(thread_name: &str, location: &str, payload: &str, stack: &str) -> String {
    format!(
        "=== CRITICAL PANIC ===\n\
         Timestamp: {}\n\
         Thread: {}\n\
         Location: {}\n\
         Payload: {}\n\n\
         Stack Trace:\n{}",
        Local::now().to_rfc3339(),
        thread_name,
        location,
        payload,
        stack
    )
}

fn panic_handler(info: &PanicHookInfo) {
    let backtrace = Backtrace::new();
    let thread = std::thread::current();
    let thread_name = thread.name().unwrap_or("<unnamed>");

    let payload = info
        .payload()
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| info.payload().downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<unknown>");
    let location = info
        .location()
        .map(|l| l.to_string())
        .unwrap_or_else(|| "<unknown>".to_string());

    let report = crash_report(thread_name, &location, payload, &format!("{:?}", backtrace));

    // 1. Log to stderr (always available)
    eprintln!("{}", report);

    // 2. Log via tracing (may fail if the writer thread is gone)
    tracing::error!("{}", report);

    // 3. Write crash dump file
    let dump_filename = format!(
        "browsera_crash_{}.txt",
        Local::now().format("%Y%m%d_%H%M%S")
    );
    let dump_path = std::env::temp_dir().join(&dump_filename);

    if let Err(e) = std::fs::write(&dump_path, &report) {
        eprintln!("Failed to write crash dump: {}", e);
    } else {
        eprintln!("Crash report written to {}", dump_path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crash_report_layout() {
        let report = crash_report("main", "src/app.rs:10:5", "boom", "frame 0");
        assert!(report.starts_with("=== CRITICAL PANIC ===\n"));
        assert!(report.contains("Thread: main\n"));
        assert!(report.contains("Location: src/app.rs:10:5\n"));
        assert!(report.contains("Payload: boom\n"));
        assert!(report.ends_with("Stack Trace:\nframe 0"));
    }
}
