//! In-process metrics registry for the gateway.
//!
//! Counter/gauge/histogram families with dynamic labels backed by `DashMap`.
//! Labels are flattened into sorted key vectors to keep deterministic ordering.
//! Latency is recorded in whole microseconds and rendered in seconds, so the
//! hot path never touches floating point.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

type LabelKey = Vec<(String, String)>;

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_str(key: &LabelKey) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

/// `name{labels}` or bare `name` when there are no labels.
fn series(name: &str, labels: &str) -> String {
    if labels.is_empty() {
        name.to_string()
    } else {
        format!("{name}{{{labels}}}")
    }
}

fn micros_as_secs(micros: u64) -> f64 {
    micros as f64 / 1_000_000.0
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for one label set; 0 when never touched.
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        let _ = writeln!(out, "# HELP {name} {help}");
        let _ = writeln!(out, "# TYPE {name} counter");
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{} {}", series(name, &label_str(r.key())), val);
        }
    }
}

#[derive(Default)]
pub struct GaugeVec {
    map: DashMap<LabelKey, AtomicI64>,
}

impl GaugeVec {
    pub fn inc(&self, labels: &[(&str, &str)]) { self.add(labels, 1); }
    pub fn dec(&self, labels: &[(&str, &str)]) { self.add(labels, -1); }

    /// Add an arbitrary signed delta.
    pub fn add(&self, labels: &[(&str, &str)], v: i64) {
        let gauge = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicI64::new(0));
        gauge.fetch_add(v, Ordering::Relaxed);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> i64 {
        self.map
            .get(&label_key(labels))
            .map(|g| g.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        let _ = writeln!(out, "# HELP {name} {help}");
        let _ = writeln!(out, "# TYPE {name} gauge");
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{} {}", series(name, &label_str(r.key())), val);
        }
    }
}

// Prometheus client default buckets, in microseconds:
// 5ms, 10ms, 25ms, 50ms, 75ms, 100ms, 250ms, 500ms, 750ms, 1s, 2.5s, 5s, 7.5s, 10s
const BUCKET_COUNT: usize = 14;
const BUCKETS_MICROS: [u64; BUCKET_COUNT] = [
    5_000, 10_000, 25_000, 50_000, 75_000, 100_000, 250_000, 500_000, 750_000, 1_000_000,
    2_500_000, 5_000_000, 7_500_000, 10_000_000,
];

struct AtomicHistogram {
    count: AtomicU64,
    sum_micros: AtomicU64,
    buckets: [AtomicU64; BUCKET_COUNT],
}

impl Default for AtomicHistogram {
    fn default() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum_micros: AtomicU64::new(0),
            buckets: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }
}

#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<LabelKey, AtomicHistogram>,
}

impl HistogramVec {
    /// Observe a duration and increment cumulative buckets.
    pub fn observe(&self, labels: &[(&str, &str)], duration: Duration) {
        let hist = self
            .map
            .entry(label_key(labels))
            .or_insert_with(AtomicHistogram::default);
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum_micros.fetch_add(micros, Ordering::Relaxed);

        // cumulative: every bucket at or above the value
        for (i, &b) in BUCKETS_MICROS.iter().enumerate() {
            if micros <= b {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Number of observations for one label set.
    pub fn count(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|h| h.count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format (unit: seconds).
    fn render(&self, name: &str, help: &str, out: &mut String) {
        let _ = writeln!(out, "# HELP {name} {help}");
        let _ = writeln!(out, "# TYPE {name} histogram");
        for r in self.map.iter() {
            let hist = r.value();
            let labels = label_str(r.key());
            let prefix = if labels.is_empty() { String::new() } else { format!("{labels},") };

            for (i, &le) in BUCKETS_MICROS.iter().enumerate() {
                let count = hist.buckets[i].load(Ordering::Relaxed);
                let _ = writeln!(
                    out,
                    "{}_bucket{{{}le=\"{}\"}} {}",
                    name,
                    prefix,
                    micros_as_secs(le),
                    count
                );
            }
            let count = hist.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{name}_bucket{{{prefix}le=\"+Inf\"}} {count}");

            let sum = micros_as_secs(hist.sum_micros.load(Ordering::Relaxed));
            let _ = writeln!(out, "{} {}", series(&format!("{name}_sum"), &labels), sum);
            let _ = writeln!(out, "{} {}", series(&format!("{name}_count"), &labels), count);
        }
    }
}

/// Process-wide metric families. Request handling only increments/observes.
#[derive(Default)]
pub struct GatewayMetrics {
    /// labels: method, endpoint, status
    pub http_requests: CounterVec,
    /// labels: endpoint
    pub http_latency: HistogramVec,
    /// labels: endpoint
    pub http_in_flight: GaugeVec,
    /// labels: type (single | range)
    pub conversions: CounterVec,
}

impl GatewayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render every family in Prometheus text exposition format 0.0.4.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.http_requests.render(
            "http_requests_total",
            "Total number of HTTP requests processed by the service",
            &mut out,
        );
        self.http_latency.render(
            "http_request_latency_seconds",
            "End-to-end latency of HTTP requests in seconds",
            &mut out,
        );
        self.http_in_flight.render(
            "http_requests_in_flight",
            "HTTP requests currently being served",
            &mut out,
        );
        self.conversions.render(
            "roman_conversions_total",
            "Total number of Roman numeral conversions performed",
            &mut out,
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_labels_are_order_insensitive() {
        let c = CounterVec::default();
        c.inc(&[("method", "GET"), ("status", "200")]);
        c.inc(&[("status", "200"), ("method", "GET")]);
        assert_eq!(c.get(&[("method", "GET"), ("status", "200")]), 2);

        let mut out = String::new();
        c.render("reqs", "help", &mut out);
        assert!(out.contains("reqs{method=\"GET\",status=\"200\"} 2"));
    }

    #[test]
    fn histogram_buckets_are_cumulative_and_in_seconds() {
        let h = HistogramVec::default();
        h.observe(&[("endpoint", "/x")], Duration::from_millis(20));
        h.observe(&[("endpoint", "/x")], Duration::from_secs(3));

        let mut out = String::new();
        h.render("lat", "help", &mut out);
        assert!(out.contains("lat_bucket{endpoint=\"/x\",le=\"0.01\"} 0"));
        assert!(out.contains("lat_bucket{endpoint=\"/x\",le=\"0.025\"} 1"));
        assert!(out.contains("lat_bucket{endpoint=\"/x\",le=\"5\"} 2"));
        assert!(out.contains("lat_bucket{endpoint=\"/x\",le=\"+Inf\"} 2"));
        assert!(out.contains("lat_sum{endpoint=\"/x\"} 3.02"));
        assert!(out.contains("lat_count{endpoint=\"/x\"} 2"));
        assert_eq!(h.count(&[("endpoint", "/x")]), 2);
    }

    #[test]
    fn unlabelled_series_have_no_braces() {
        let g = GaugeVec::default();
        g.inc(&[]);
        g.inc(&[]);
        g.dec(&[]);

        let mut out = String::new();
        g.render("inflight", "help", &mut out);
        assert!(out.contains("\ninflight 1\n"));
    }

    #[test]
    fn label_values_are_escaped() {
        let c = CounterVec::default();
        c.inc(&[("endpoint", "a\"b")]);
        let mut out = String::new();
        c.render("x", "help", &mut out);
        assert!(out.contains(r#"x{endpoint="a\"b"} 1"#));
    }

    #[test]
    fn render_lists_every_family() {
        let m = GatewayMetrics::new();
        let out = m.render();
        for name in [
            "http_requests_total",
            "http_request_latency_seconds",
            "http_requests_in_flight",
            "roman_conversions_total",
        ] {
            assert!(out.contains(&format!("# TYPE {name} ")), "missing {name}");
        }
    }
}
