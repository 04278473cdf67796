use ic_canister_log::{declare_log_buffer, export, LogEntry};

// High-priority messages: one per committed pool operation.
declare_log_buffer!(name = INFO, capacity = 1000);

// Low-priority messages: rejections and swap stepping details.
declare_log_buffer!(name = DEBUG, capacity = 1000);

/// Copies the buffered entries of one sink, oldest first. The buffers are left intact.
pub fn export_logs(debug: bool) -> Vec<LogEntry> {
    if debug { export(&DEBUG) } else { export(&INFO) }
}
