use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};
use sha2::{Digest, Sha256};
use std::sync::LazyLock;
use subtle::ConstantTimeEq;

pub static RELAY_REQUESTS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "cqm_relayer_requests_total",
        "Relay requests by validation result",
        &["result"]
    )
    .unwrap()
});

pub static SUBMISSIONS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "cqm_relayer_submissions_total",
        "metaTransfer submissions by outcome",
        &["outcome"]
    )
    .unwrap()
});

pub static SUBMIT_LATENCY: LazyLock<HistogramVec> = LazyLock::new(|| {
    register_histogram_vec!(
        "cqm_relayer_submit_duration_seconds",
        "Time from accepted request to node acceptance of the transaction",
        &["outcome"],
        vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap()
});

pub fn metrics_output() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Compare a presented bearer token against the configured one.
/// Both sides are hashed first so neither length nor content leaks through timing.
pub fn token_matches(presented: &[u8], expected: &[u8]) -> bool {
    let a = Sha256::digest(presented);
    let b = Sha256::digest(expected);
    a.ct_eq(&b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_comparison() {
        assert!(token_matches(b"metrics-token", b"metrics-token"));
        assert!(!token_matches(b"metrics-token", b"metrics-tokem"));
        assert!(!token_matches(b"short", b"much longer token"));
        assert!(!token_matches(b"", b"notempty"));
    }

    #[test]
    fn counters_show_up_in_output() {
        RELAY_REQUESTS.with_label_values(&["accepted"]).inc();
        assert!(metrics_output().contains("cqm_relayer_requests_total"));
    }
}
