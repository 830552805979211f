use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryRegistry};
use crate::routes::with_validation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use driver_onboarding::config::{AppConfig, ValidationSettings};
use driver_onboarding::error::AppError;
use driver_onboarding::telemetry;
use driver_onboarding::validation::{ReferenceData, ReferenceStore, ValidationCoordinator};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) type Coordinator = ValidationCoordinator<InMemoryRegistry>;

/// Load reference lists and seed the registry backend from configuration.
pub(crate) fn build_coordinator(settings: &ValidationSettings) -> Result<Coordinator, AppError> {
    let reference = ReferenceData::load(settings)?;
    let registry = InMemoryRegistry::from_active(&settings.active_sirets);

    info!(
        active_establishments = registry.len(),
        registry_timeout_ms = settings.registry_timeout.as_millis() as u64,
        "registry backend seeded"
    );

    Ok(ValidationCoordinator::new(
        Arc::new(ReferenceStore::new(reference)),
        Arc::new(registry),
        settings.registry_timeout,
    ))
}

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let coordinator = Arc::new(build_coordinator(&config.validation)?);

    let app = with_validation_routes(coordinator)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "driver onboarding validator ready");

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_temp_csv(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{name}", std::process::id()));
        let mut file = std::fs::File::create(&path).expect("create temp csv");
        file.write_all(contents.as_bytes()).expect("write temp csv");
        path
    }

    #[test]
    fn coordinator_uses_configured_reference_lists() {
        let domains = write_temp_csv("domains.csv", "value,note\ncourrier-jetable.fr,\n");
        let settings = ValidationSettings {
            disposable_domains_csv: Some(domains.clone()),
            ..ValidationSettings::default()
        };

        let coordinator = build_coordinator(&settings).expect("coordinator builds");
        let reference = coordinator.reference().snapshot();
        std::fs::remove_file(domains).ok();

        assert!(reference.is_disposable_domain("courrier-jetable.fr"));
        assert!(coordinator.lookup_activity("73282932000074").is_active);
    }

    #[test]
    fn missing_reference_file_fails_startup() {
        let settings = ValidationSettings {
            siret_reject_list_csv: Some(PathBuf::from("/nonexistent/onboarding/sirets.csv")),
            ..ValidationSettings::default()
        };

        match build_coordinator(&settings) {
            Err(AppError::ReferenceData(_)) => {}
            Err(other) => panic!("expected reference data error, got {other}"),
            Ok(_) => panic!("expected reference data error"),
        }
    }
}
