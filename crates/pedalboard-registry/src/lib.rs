//! Unit registry and factory for the pedalboard chain host.
//!
//! This crate provides an explicit registry for discovering and instantiating
//! units by type name. The registry is an ordinary value injected into the
//! chain; nothing is looked up through global state.
//!
//! # Features
//!
//! - **Unit Discovery**: List all registered unit types with metadata
//! - **Async Factories**: Create units by type name at runtime
//! - **Category and Keyword Filtering**: Narrow the list for a picker UI
//! - **Built-in Units**: A handful of reference units ready to chain
//!
//! # Example
//!
//! ```rust
//! use pedalboard_registry::{UnitCategory, UnitRegistry};
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let registry = UnitRegistry::new();
//!
//! for desc in registry.with_keyword("drive") {
//!     println!("{}: {}", desc.name, desc.description);
//! }
//!
//! let unit = registry.create("overdrive").await.unwrap();
//! assert_eq!(unit.type_name(), "overdrive");
//!
//! assert!(!registry.in_category(UnitCategory::TimeBased).is_empty());
//! # });
//! ```

pub mod builtin;

use std::future::Future;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use pedalboard_core::{Unit, UnitError};
use thiserror::Error;

pub use builtin::ParamTableUnit;

/// Category of unit for organization and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitCategory {
    /// Dynamics processing (compressor, limiter, gate)
    Dynamics,
    /// Distortion and saturation
    Distortion,
    /// Modulation (tremolo, chorus, phaser)
    Modulation,
    /// Time-based (delay, reverb)
    TimeBased,
    /// Gain stages and other utilities
    Utility,
}

impl UnitCategory {
    /// Returns a human-readable name for the category.
    pub const fn name(&self) -> &'static str {
        match self {
            UnitCategory::Dynamics => "Dynamics",
            UnitCategory::Distortion => "Distortion",
            UnitCategory::Modulation => "Modulation",
            UnitCategory::TimeBased => "Time-Based",
            UnitCategory::Utility => "Utility",
        }
    }
}

/// Describes a unit type in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitDescriptor {
    /// Type name used to instantiate the unit (lowercase, no spaces).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Brief description.
    pub description: String,
    /// Category for organization.
    pub category: UnitCategory,
    /// Search keywords.
    pub keywords: Vec<String>,
}

impl UnitDescriptor {
    /// Create a descriptor with no keywords.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        category: UnitCategory,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            category,
            keywords: Vec::new(),
        }
    }

    /// Attach search keywords.
    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = keywords.iter().map(|k| (*k).to_string()).collect();
        self
    }

    /// Case-insensitive match against id, name and keywords.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let needle = keyword.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.id.to_lowercase().contains(&needle)
            || self.name.to_lowercase().contains(&needle)
            || self.keywords.iter().any(|k| k.to_lowercase().contains(&needle))
    }
}

/// Registry errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No factory is registered for this type.
    #[error("unknown unit type: {0}")]
    UnknownType(String),

    /// The type name is already registered.
    #[error("unit type already registered: {0}")]
    DuplicateType(String),

    /// The factory ran but failed to produce a unit.
    #[error("factory for '{unit_type}' failed: {source}")]
    Factory {
        /// Requested type.
        unit_type: String,
        /// Underlying unit error.
        #[source]
        source: UnitError,
    },
}

/// Async factory producing a shared unit handle.
pub type UnitFactory =
    Arc<dyn Fn() -> BoxFuture<'static, Result<Arc<dyn Unit>, UnitError>> + Send + Sync>;

struct RegistryEntry {
    descriptor: UnitDescriptor,
    factory: UnitFactory,
}

/// Registry of instantiable unit types.
///
/// [`UnitRegistry::new`] registers the built-in units; [`UnitRegistry::empty`]
/// starts blank for hosts that bring their own.
pub struct UnitRegistry {
    entries: Vec<RegistryEntry>,
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for UnitRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitRegistry")
            .field("types", &self.entries.iter().map(|e| &e.descriptor.id).collect::<Vec<_>>())
            .finish()
    }
}

impl UnitRegistry {
    /// Create a registry with all built-in units registered.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        builtin::register_all(&mut registry);
        registry
    }

    /// Create a registry with nothing registered.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a unit type.
    ///
    /// The factory is called once per [`create`](Self::create).
    pub fn register<F, Fut>(
        &mut self,
        descriptor: UnitDescriptor,
        factory: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Arc<dyn Unit>, UnitError>> + Send + 'static,
    {
        if self.contains(&descriptor.id) {
            return Err(RegistryError::DuplicateType(descriptor.id));
        }
        self.insert(descriptor, Arc::new(move || factory().boxed()));
        Ok(())
    }

    fn insert(&mut self, descriptor: UnitDescriptor, factory: UnitFactory) {
        self.entries.push(RegistryEntry {
            descriptor,
            factory,
        });
    }

    /// Returns descriptors for all registered units, in registration order.
    pub fn all_units(&self) -> Vec<&UnitDescriptor> {
        self.entries.iter().map(|e| &e.descriptor).collect()
    }

    /// Returns descriptors for units in a specific category.
    pub fn in_category(&self, category: UnitCategory) -> Vec<&UnitDescriptor> {
        self.entries
            .iter()
            .filter(|e| e.descriptor.category == category)
            .map(|e| &e.descriptor)
            .collect()
    }

    /// Returns descriptors matching a keyword. An empty keyword matches all.
    pub fn with_keyword(&self, keyword: &str) -> Vec<&UnitDescriptor> {
        self.entries
            .iter()
            .filter(|e| e.descriptor.matches_keyword(keyword))
            .map(|e| &e.descriptor)
            .collect()
    }

    /// Get a descriptor by type name.
    pub fn get(&self, id: &str) -> Option<&UnitDescriptor> {
        self.entries
            .iter()
            .find(|e| e.descriptor.id == id)
            .map(|e| &e.descriptor)
    }

    /// Returns `true` if the type name is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Instantiate a unit by type name.
    pub async fn create(&self, id: &str) -> Result<Arc<dyn Unit>, RegistryError> {
        let factory = self
            .entries
            .iter()
            .find(|e| e.descriptor.id == id)
            .map(|e| Arc::clone(&e.factory))
            .ok_or_else(|| RegistryError::UnknownType(id.to_string()))?;
        factory().await.map_err(|source| RegistryError::Factory {
            unit_type: id.to_string(),
            source,
        })
    }

    /// Returns the number of registered unit types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no unit types are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
