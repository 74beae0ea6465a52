use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt};

use crate::Result;
use crate::error::Error;

const FALLBACK_FILTER: &str = "info";

/// Initialise tracing avec un filtre optionnel et un mode JSON conditionnel.
///
/// Ordre de priorité du filtre : argument explicite, puis `RUST_LOG`, puis `info`.
/// Un candidat invalide est ignoré au profit du suivant.
///
/// # Errors
///
/// Retourne une erreur si aucun filtre n'est utilisable, si la sortie JSON est
/// demandée sans la fonctionnalité `json-logs`, ou si un subscriber global est
/// déjà installé.
pub fn init_tracing(explicit_filter: Option<&str>, use_json: bool) -> Result<()> {
    let filter = resolve_filter(explicit_filter, std::env::var("RUST_LOG").ok())?;

    #[cfg(feature = "json-logs")]
    if use_json {
        let subscriber = Registry::default().with(filter).with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .json()
                .flatten_event(true),
        );
        return tracing::subscriber::set_global_default(subscriber)
            .map_err(|err| Error::Telemetry(err.to_string()));
    }

    #[cfg(not(feature = "json-logs"))]
    if use_json {
        return Err(Error::Telemetry(
            "binary was built without the `json-logs` feature".to_string(),
        ));
    }

    let subscriber = Registry::default()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true).compact());
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|err| Error::Telemetry(err.to_string()))
}

fn resolve_filter(explicit: Option<&str>, from_env: Option<String>) -> Result<EnvFilter> {
    explicit
        .map(str::to_string)
        .into_iter()
        .chain(from_env)
        .chain(std::iter::once(FALLBACK_FILTER.to_string()))
        .find_map(|candidate| EnvFilter::try_new(candidate).ok())
        .ok_or_else(|| Error::Telemetry("invalid log filter".to_string()))
}
