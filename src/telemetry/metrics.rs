//! Prometheus metrics setup and metric definitions

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const USE_CASE_TOTAL: &str = "resource_access_use_case_total";
pub const EFFECTIVE_RULES_TOTAL: &str = "resource_access_effective_rules_total";

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder")
}

/// Register metric descriptions and emit initial zero values so Prometheus output
/// includes HELP/TYPE lines for all metrics from startup.
pub fn describe_metrics() {
    describe_counter!(
        USE_CASE_TOTAL,
        "Resource access use case executions by operation and outcome"
    );
    describe_counter!(
        EFFECTIVE_RULES_TOTAL,
        "Effective rule resolutions by contact kind (admin/direct)"
    );

    counter!(USE_CASE_TOTAL, "operation" => "partial_update_rule", "outcome" => "no_content")
        .absolute(0);
    counter!(EFFECTIVE_RULES_TOTAL, "contact" => "admin").absolute(0);
}

/// Count one use case outcome.
pub fn record_use_case(operation: &'static str, outcome: &'static str) {
    counter!(USE_CASE_TOTAL, "operation" => operation, "outcome" => outcome).increment(1);
}

/// Count one effective rule resolution.
pub fn record_effective_rules(admin: bool) {
    let contact = if admin { "admin" } else { "non_admin" };
    counter!(EFFECTIVE_RULES_TOTAL, "contact" => contact).increment(1);
}
