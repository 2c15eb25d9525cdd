//! Console output of the bridge: the status line at bind time, the
//! diagnostic dump when no provider matches, and degradation warnings.
//!
//! Everything here is silenced by `console_output = false`.

use crate::context::{BridgeContext, BridgeOptions};
use crate::error::BridgeError;
use crate::model::Provider;
use host_event_system::Host;
use tracing::{info, warn};

pub fn status(provider: &Provider, options: &BridgeOptions) {
    if !options.console_output {
        return;
    }
    info!(
        "🤝 Hooked into {} v{} by {}",
        provider.name,
        provider.plugin.version,
        provider.authors_joined()
    );
}

/// Everything an operator needs to file a bug report about a missing
/// provider.
pub fn diagnostics(host: &dyn Host, options: &BridgeOptions) {
    if !options.console_output {
        return;
    }
    let plugins = host.installed_plugins();
    warn!("❌ No supported factions plugin found");
    warn!("Platform: {}", host.platform_version());
    warn!("Installed plugins ({}):", plugins.len());
    for plugin in plugins {
        warn!(
            "  - {} v{} [{}] main={} authors={}",
            plugin.name,
            plugin.version,
            if plugin.enabled { "enabled" } else { "disabled" },
            plugin.main_class,
            plugin.authors.join(", ")
        );
    }
}

pub fn already_connected(provider: &Provider, options: &BridgeOptions) {
    if options.console_output {
        warn!("⚠️ Already connected to {}; ignoring connect", provider.name);
    }
}

pub(crate) fn degraded(context: &BridgeContext, operation: &str, error: &BridgeError) {
    if context.options().console_output {
        warn!(
            "⚠️ {} degraded to a default value on {}: {}",
            operation,
            context.provider().name,
            error
        );
    }
}
