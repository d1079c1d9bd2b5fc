use std::sync::atomic::{AtomicI64, Ordering};

/// Mints time-derived session ids (`scan_<millis>`).
///
/// Two scans within the same millisecond still get distinct ids: the
/// generator never hands out a value at or below the previous one.
#[derive(Debug, Default)]
pub struct SessionIdGenerator {
    last: AtomicI64,
}

impl SessionIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> String {
        self.next_at(chrono::Utc::now().timestamp_millis())
    }

    fn next_at(&self, now_ms: i64) -> String {
        let mut previous = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now_ms.max(previous + 1);
            match self.last.compare_exchange_weak(
                previous,
                candidate,
                Ordering::SeqCst,
                Ordering::Relaxed,
            ) {
                Ok(_) => return format!("scan_{candidate}"),
                Err(actual) => previous = actual,
            }
        }
    }
}
