//! Barcode scan handling.
//!
//! Physical scanners fire the same read several times per second while the
//! code is in front of the camera. The debouncer drops repeats of the same
//! normalized code inside a cool-down window; a different code is always
//! accepted immediately (it is a debounce, not a lock).

use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// Strips everything that is not a digit. GTINs read from damaged labels
/// often come with stray separators or whitespace.
pub fn normalize_barcode(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

pub struct ScanDebouncer {
    cooldown: Duration,
    last: Mutex<Option<(String, Instant)>>,
}

impl ScanDebouncer {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last: Mutex::new(None),
        }
    }

    /// Returns `true` when the scan should be processed. Records accepted
    /// scans so an identical code inside the cool-down is dropped.
    pub async fn accept(&self, code: &str) -> bool {
        self.accept_at(code, Instant::now()).await
    }

    async fn accept_at(&self, code: &str, now: Instant) -> bool {
        let mut last = self.last.lock().await;
        if let Some((prev_code, prev_at)) = last.as_ref() {
            if prev_code == code && now.duration_since(*prev_at) < self.cooldown {
                return false;
            }
        }
        *last = Some((code.to_string(), now));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COOLDOWN: Duration = Duration::from_millis(1200);

    #[test]
    fn test_normalize_strips_non_digits() {
        assert_eq!(normalize_barcode(" 789-1000.100103 "), "7891000100103");
        assert_eq!(normalize_barcode("abc"), "");
    }

    #[tokio::test]
    async fn test_identical_scan_within_cooldown_is_dropped() {
        let debouncer = ScanDebouncer::new(COOLDOWN);
        let start = Instant::now();
        assert!(debouncer.accept_at("7891000100103", start).await);
        assert!(
            !debouncer
                .accept_at("7891000100103", start + Duration::from_millis(300))
                .await
        );
    }

    #[tokio::test]
    async fn test_identical_scan_after_cooldown_is_accepted() {
        let debouncer = ScanDebouncer::new(COOLDOWN);
        let start = Instant::now();
        assert!(debouncer.accept_at("7891000100103", start).await);
        assert!(
            debouncer
                .accept_at("7891000100103", start + Duration::from_millis(1300))
                .await
        );
    }

    #[tokio::test]
    async fn test_distinct_scan_is_accepted_immediately() {
        let debouncer = ScanDebouncer::new(COOLDOWN);
        let start = Instant::now();
        assert!(debouncer.accept_at("7891000100103", start).await);
        assert!(
            debouncer
                .accept_at("7891991010856", start + Duration::from_millis(50))
                .await
        );
    }
}
