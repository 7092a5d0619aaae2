use blake2::{Blake2b512, Digest};

/// Derives the dedup key for an incoming SMS payment record from the originating device and the raw message text.
///
/// The ingestion pipeline normally supplies its own hash; this is the fallback used when a record arrives without
/// one (and by test fixtures). Deterministic, so re-ingesting the same message from the same device collides with
/// the UNIQUE constraint on `sms_payments.content_hash` and is rejected as a duplicate.
pub fn content_hash(device_id: &str, raw_text: &str) -> String {
    let mut hasher = Blake2b512::new();
    hasher.update(device_id.as_bytes());
    hasher.update(b"\x00");
    hasher.update(raw_text.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
