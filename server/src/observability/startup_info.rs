use careerdesk_application::infrastructure_config::Config;
use domain::tool::Tool;
use tracing::info;

pub fn print_api_info(config: &Config) {
    print_endpoint_info(config);
    print_configuration_info(config);
}

fn print_endpoint_info(config: &Config) {
    let base_url = format!("http://{}", config.server_address());
    info!("📋 API Endpoints:");
    info!("  💳 Credits: {}/credits", base_url);
    info!("  🔎 Job match: {}/match", base_url);
    info!("  ❤️  Health: {}/health", base_url);
}

fn print_configuration_info(config: &Config) {
    info!("⚙️  Configuration:");
    print_cost_table();
    info!("  🗄️  Database: PostgreSQL with connection pooling");
    info!(
        "  📦 Match cache: TTL {}s, {} entries per user",
        config.match_cache.ttl_seconds, config.match_cache.max_entries_per_user
    );
    info!(
        "  🔁 Retry: {} attempts, {}ms backoff",
        config.retry.max_attempts, config.retry.backoff_ms
    );
    info!(
        "  🧹 Hold sweeper: TTL {}s, every {}s",
        config.credits.hold_ttl_seconds, config.credits.sweep_interval_seconds
    );
}

fn print_cost_table() {
    info!("  💰 Tool costs:");
    for tool in Tool::ALL {
        info!("    • {}: {} credit(s)", tool, tool.cost());
    }
}
