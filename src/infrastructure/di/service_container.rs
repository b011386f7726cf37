//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::SortService;
use crate::config::Settings;
use crate::domain::SortOptions;
use crate::infrastructure::traits::{DocumentCodec, FileSystem, RealFileSystem};
use crate::infrastructure::yaml::YamlCodec;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// YAML document model adapter
    pub codec: Arc<dyn DocumentCodec>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem), Arc::new(YamlCodec))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        codec: Arc<dyn DocumentCodec>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs, codec }
    }

    pub fn sort_service(&self) -> SortService {
        SortService::new(Arc::clone(&self.fs), Arc::clone(&self.codec))
    }

    /// Sort options from the loaded rules, with `-k` selecting the fixed root order.
    pub fn sort_options(&self, k8s: bool) -> SortOptions {
        self.settings.sort_options(k8s)
    }
}
