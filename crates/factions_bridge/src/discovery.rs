//! Finding and binding the installed faction plugin.

use crate::api::FactionsApi;
use crate::context::{BridgeContext, BridgeOptions};
use crate::error::BridgeResult;
use crate::model::Provider;
use crate::registry;
use host_event_system::Host;
use std::sync::Arc;
use tracing::{debug, info};

/// A provider with its registered API adapter.
#[derive(Debug, Clone)]
pub struct Binding {
    pub provider: Provider,
    pub api: Arc<dyn FactionsApi>,
}

/// Binds the first registry entry, in precedence order, that matches an
/// installed plugin. `Ok(None)` when nothing matches.
///
/// The adapter's listeners are registered before this returns, so every
/// native event published afterwards reaches the unified bus.
pub async fn discover(host: Arc<dyn Host>, options: BridgeOptions) -> BridgeResult<Option<Binding>> {
    let plugins = host.installed_plugins();
    debug!("🔍 Probing {} installed plugin(s)", plugins.len());

    for entry in registry::entries() {
        let Some(plugin) = plugins.iter().find(|plugin| entry.matches(plugin)) else {
            continue;
        };
        info!("🔌 {} matches provider {}", plugin.name, entry.name);

        let provider = Provider::new(entry, plugin.clone());
        let context = BridgeContext::new(host.clone(), provider.clone(), options);
        let api = (entry.factory)(context)?;
        api.register().await?;
        return Ok(Some(Binding { provider, api }));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use host_event_system::ServerHost;
    use native_factions::factions_uuid::types::Flavor;
    use native_factions::factions_uuid::FactionsPlugin;
    use native_factions::massive::MassiveFactions;

    #[tokio::test]
    async fn nothing_installed_binds_nothing() {
        let host = Arc::new(ServerHost::new("1.20.4"));
        let binding = discover(host, BridgeOptions::default()).await.unwrap();
        assert!(binding.is_none());
    }

    #[tokio::test]
    async fn registry_order_wins_over_install_order() {
        let host = Arc::new(ServerHost::new("1.20.4"));
        let massive = MassiveFactions::new(host.events());
        host.install_plugin(massive.descriptor()).await;
        let medieval = native_factions::medieval::MedievalFactions::new(host.events());
        host.install_plugin(medieval.descriptor()).await;

        let binding = discover(host, BridgeOptions::default()).await.unwrap().unwrap();
        assert_eq!(binding.provider.id, "massivecraft");
        assert!(binding.api.is_registered());
    }

    #[tokio::test]
    async fn saber_build_binds_the_fork_adapter() {
        let host = Arc::new(ServerHost::new("1.20.4"));
        let plugin = FactionsPlugin::new(host.events(), Flavor::Saber { legacy_fields: false });
        host.install_plugin(plugin.descriptor()).await;

        let binding = discover(host, BridgeOptions::default()).await.unwrap().unwrap();
        assert_eq!(binding.provider.id, "saberfactions");
        assert_eq!(
            registry::lookup_by_adapter_class(binding.api.adapter_class()).map(|e| e.id),
            Some("saberfactions")
        );
    }
}
