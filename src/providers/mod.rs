//! Provider module for Chatdesk
//!
//! This module contains the response provider abstraction and the demo
//! implementation.

pub mod base;
pub mod demo;

pub use base::{ProviderReply, ResponseProvider};
pub use demo::DemoProvider;

use std::sync::Arc;

use crate::config::ProviderConfig;
use crate::error::{ChatdeskError, Result};

/// Create a provider instance based on configuration
///
/// # Arguments
///
/// * `config` - Provider configuration; `provider_type` selects the
///   implementation
///
/// # Errors
///
/// Returns `ChatdeskError::Provider` if the provider type is unknown
///
/// # Examples
///
/// ```
/// use chatdesk::config::ProviderConfig;
/// use chatdesk::providers::create_provider;
///
/// let provider = create_provider(&ProviderConfig::default()).unwrap();
/// assert_eq!(provider.name(), "demo");
/// ```
pub fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn ResponseProvider>> {
    match config.provider_type.as_str() {
        "demo" => Ok(Arc::new(DemoProvider::new(config.demo.clone()))),
        other => Err(ChatdeskError::Provider(format!("Unknown provider type: {}", other)).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_demo_provider() {
        let provider = create_provider(&ProviderConfig::default()).unwrap();
        assert_eq!(provider.name(), "demo");
    }

    #[test]
    fn test_create_unknown_provider() {
        let config = ProviderConfig {
            provider_type: "openai".to_string(),
            ..ProviderConfig::default()
        };
        let err = create_provider(&config).err().unwrap();
        assert!(err.to_string().contains("Unknown provider type: openai"));
    }
}
