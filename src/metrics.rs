use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
pub fn init_metrics() -> PrometheusHandle {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // Pre-register counters so they appear even before the first increment.
    counter!("bets_placed_total").absolute(0);
    counter!("bets_settled_total").absolute(0);
    counter!("bets_won_total").absolute(0);
    counter!("settlement_payout_units_total").absolute(0);
    counter!("coinflips_played_total").absolute(0);
    counter!("wallet_requests_approved_total").absolute(0);

    handle
}
