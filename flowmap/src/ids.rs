//! Timestamp-derived node identifiers, matching the `{prefix}-{millis}`
//! convention of persisted documents. The clock is always supplied by the
//! caller so tree operations stay deterministic under test; native hosts
//! can use [`now_ms`], wasm hosts pass `js_sys::Date::now()`.

pub fn group_id(now_ms: u64) -> String {
    format!("group-{now_ms}")
}

pub fn item_id(now_ms: u64) -> String {
    format!("item-{now_ms}")
}

pub fn copy_id(original: &str, now_ms: u64) -> String {
    format!("{original}-copy-{now_ms}")
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
