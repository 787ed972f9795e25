//! Device format definitions.
//!
//! A [`SysexDefinition`] captures one synthesizer family's wire format: the
//! header bytes a message must carry, the parameter table (byte offsets,
//! bit fields, value ranges), and layout metadata (preset name, checksum,
//! total length). Definitions are built once — from a built-in constant or a
//! declarative JSON description — and are immutable afterwards; decoders and
//! encoders borrow them.
//!
//! Schema parsing and default-filling live in `schema`; everything reaching
//! the codec has already been validated, so decode logic never sees a
//! half-filled definition.

pub mod error;
pub mod schema;
pub mod types;

pub use error::DefinitionError;
pub use schema::{DefinitionConfig, HeaderConfig, ParameterConfig};
pub use types::{DataType, ParameterDefinition, SysexDefinition, SysexHeader};
