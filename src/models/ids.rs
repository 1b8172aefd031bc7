//! 标识符与时间戳生成

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// 当前 Unix 毫秒时间戳；时钟早于 1970 时返回 0
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// 进程内单调递增序号，保证同一毫秒内生成的 id 不冲突
pub fn next_sequence() -> u64 {
    SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

/// `<prefix>-<millis>-<seq>`
pub fn unique_id(prefix: &str) -> String {
    format!("{}-{}-{}", prefix, now_millis(), next_sequence())
}
