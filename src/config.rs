//! Builder for configuring a [`Publisher`].

use crate::identity::IdentityMap;
use crate::publisher::Publisher;
use crate::settings::Settings;
use crate::storage::Storage;

/// Builder for configuring a [`Publisher`].
///
/// The storage backend is constructed by the caller and handed in, so the
/// publisher never owns a global client.
///
/// # Example
///
/// ```rust,no_run
/// use mockup_publisher::{FsStorage, IdentityMap, PublisherBuilder, Settings};
///
/// # fn example() -> mockup_publisher::Result<()> {
/// let settings = Settings::new(Some("mockups".into()), None, None, None)?;
/// let publisher = PublisherBuilder::new(FsStorage::new("/tmp/preview"), settings)
///     .identities(IdentityMap::parse("Ana=ana_folder,Bo=bo_folder")?)
///     .build();
/// # Ok(())
/// # }
/// ```
pub struct PublisherBuilder<S: Storage> {
    storage: S,
    settings: Settings,
    identities: IdentityMap,
}

impl<S: Storage> PublisherBuilder<S> {
    /// Create a builder with the built-in identity table.
    pub fn new(storage: S, settings: Settings) -> Self {
        Self {
            storage,
            settings,
            identities: IdentityMap::default(),
        }
    }

    /// Replace the identity table.
    pub fn identities(mut self, identities: IdentityMap) -> Self {
        self.identities = identities;
        self
    }

    pub fn build(self) -> Publisher<S> {
        Publisher::new(self.storage, self.settings, self.identities)
    }
}
