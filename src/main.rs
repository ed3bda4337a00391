use act_zero::runtimes::tokio::spawn_actor;
use std::sync::Arc;
use tracing::info;
use tracing::subscriber::set_global_default;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};
use utho_cluster_autoscaler::cloud_provider;
use utho_cluster_autoscaler::config::{get_config_path, load_config, Config};
use utho_cluster_autoscaler::control_loop::ControlLoop;

fn init_logging(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let telemetry = match &config.tracing.jaeger_agent {
        Some(endpoint) => {
            let tracer = opentelemetry_jaeger::new_agent_pipeline()
                .with_endpoint(endpoint.as_str())
                .with_service_name("utho-cluster-autoscaler")
                .install_simple()?;

            Some(tracing_opentelemetry::layer().with_tracer(tracer))
        }
        None => None,
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

    let subscriber = Registry::default()
        .with(env_filter)
        .with(telemetry)
        .with(tracing_error::ErrorLayer::default())
        .with(fmt_layer);

    set_global_default(subscriber)?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = get_config_path();
    let config = load_config(&config_path)?;
    init_logging(&config)?;

    if let Some(e) = &config_path.fallback_reason {
        info!(
            error = format!("{:?}", e).as_str(),
            "Missing or invalid APP_CONFIG env var, fallback to config.yml"
        );
    }

    let cloud_provider = cloud_provider::build_from_config(Arc::clone(&config)).await?;
    info!(
        cluster_id = cloud_provider.manager().cluster_id(),
        scan_interval = ?config.scan_interval,
        "Initialised Utho cloud provider"
    );

    let _control_loop = spawn_actor(ControlLoop::new(cloud_provider, config.scan_interval));

    tokio::signal::ctrl_c().await?;
    info!("Received interrupt, shutting down");

    opentelemetry::global::shutdown_tracer_provider();

    Ok(())
}
