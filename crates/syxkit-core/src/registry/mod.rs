//! Format registry.
//!
//! The registry maps open string format ids to immutable
//! [`SysexDefinition`]s and hands out decoders and encoders that borrow
//! them. Built-in definitions are constructed once at registry creation;
//! custom definitions load from declarative JSON descriptions and may
//! overwrite an existing id. The map is only mutated through
//! [`FormatRegistry::register`] / [`FormatRegistry::load_custom_definition`];
//! concurrent mutation needs external synchronization.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use crate::codec::{SysexDecoder, SysexEncoder};
use crate::definition::schema::DefinitionConfig;
use crate::definition::types::SysexDefinition;
use crate::definition::DefinitionError;

mod builtin;

/// Format id of the built-in Access Virus C definition.
pub const ACCESS_VIRUS: &str = "access_virus";

/// Registry lookup failure.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unsupported synthesizer format: {format}")]
    UnknownFormat { format: String },
}

/// Holds built-in and user-supplied device format definitions.
///
/// # Examples
/// ```
/// use syxkit_core::{ACCESS_VIRUS, FormatRegistry};
///
/// let registry = FormatRegistry::new();
/// assert!(registry.list_supported().contains(&ACCESS_VIRUS.to_string()));
/// assert!(registry.get_decoder("no_such_synth").is_err());
/// ```
pub struct FormatRegistry {
    definitions: HashMap<String, SysexDefinition>,
}

impl FormatRegistry {
    /// Registry preloaded with the built-in definitions.
    pub fn new() -> Self {
        let mut definitions = HashMap::new();
        definitions.insert(ACCESS_VIRUS.to_string(), builtin::access_virus());
        Self { definitions }
    }

    pub fn definition(&self, format: &str) -> Result<&SysexDefinition, RegistryError> {
        self.definitions
            .get(format)
            .ok_or_else(|| RegistryError::UnknownFormat {
                format: format.to_string(),
            })
    }

    pub fn get_decoder(&self, format: &str) -> Result<SysexDecoder<'_>, RegistryError> {
        Ok(SysexDecoder::new(self.definition(format)?))
    }

    pub fn get_encoder(&self, format: &str) -> Result<SysexEncoder<'_>, RegistryError> {
        Ok(SysexEncoder::new(self.definition(format)?))
    }

    /// Register a definition under `format`, replacing any existing one.
    pub fn register(&mut self, format: impl Into<String>, definition: SysexDefinition) {
        self.definitions.insert(format.into(), definition);
    }

    /// Load a declarative JSON description and register it under `format`.
    pub fn load_custom_definition(
        &mut self,
        config_path: &Path,
        format: &str,
    ) -> Result<(), DefinitionError> {
        let definition = DefinitionConfig::from_file(config_path)?.into_definition()?;
        self.register(format, definition);
        Ok(())
    }

    /// Registered format ids in stable (sorted) order.
    pub fn list_supported(&self) -> Vec<String> {
        let mut formats: Vec<String> = self.definitions.keys().cloned().collect();
        formats.sort();
        formats
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{FormatRegistry, RegistryError, ACCESS_VIRUS};
    use crate::definition::types::{SysexDefinition, SysexHeader};

    #[test]
    fn builtin_lookup_succeeds() {
        let registry = FormatRegistry::new();
        assert!(registry.get_decoder(ACCESS_VIRUS).is_ok());
        assert!(registry.get_encoder(ACCESS_VIRUS).is_ok());
    }

    #[test]
    fn unknown_format_is_an_error() {
        let registry = FormatRegistry::new();
        let err = registry.get_decoder("dx7").unwrap_err();
        assert!(matches!(err, RegistryError::UnknownFormat { .. }));
        assert!(err.to_string().contains("dx7"));
    }

    #[test]
    fn register_overwrites_existing_id() {
        let mut registry = FormatRegistry::new();
        let replacement =
            SysexDefinition::new("Replacement", SysexHeader::new(vec![0x43]));
        registry.register(ACCESS_VIRUS, replacement);
        let decoder = registry.get_decoder(ACCESS_VIRUS).unwrap();
        assert_eq!(decoder.definition().name, "Replacement");
    }

    #[test]
    fn list_supported_is_sorted() {
        let mut registry = FormatRegistry::new();
        registry.register(
            "zeta_synth",
            SysexDefinition::new("Zeta", SysexHeader::new(vec![0x7D])),
        );
        registry.register(
            "alpha_synth",
            SysexDefinition::new("Alpha", SysexHeader::new(vec![0x7E])),
        );
        let formats = registry.list_supported();
        let mut sorted = formats.clone();
        sorted.sort();
        assert_eq!(formats, sorted);
        assert_eq!(formats.len(), 3);
    }
}
