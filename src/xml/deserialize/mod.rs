//! Schema-driven deserialization of the configuration element tree.
//!
//! Every entity type (gain, profile, mix port, device port, route, module,
//! surround format) is described by an [`EntitySchema`]: its element tag, the
//! tag of the optional element wrapping a list of them, how to parse one
//! element, and how to insert the result into its collection. A single
//! routine, [`deserialize_collection`], walks any element against any schema.
//!
//! Both document shapes are accepted for every collection:
//!
//! ```xml
//! <devicePorts>
//!     <devicePort tagName="Speaker" .../>
//!     <devicePort tagName="Earpiece" .../>
//! </devicePorts>
//! ```
//!
//! and the bare repeated form:
//!
//! ```xml
//! <devicePort tagName="Speaker" .../>
//! <devicePort tagName="Earpiece" .../>
//! ```

pub mod gain;
pub mod global;
pub mod module;
pub mod ports;
pub mod profile;
pub mod route;

pub use gain::GainSchema;
pub use global::{SurroundFormatSchema, deserialize_global_config, deserialize_surround_sound};
pub use module::ModuleSchema;
pub use ports::{DevicePortSchema, MixPortSchema};
pub use profile::ProfileSchema;
pub use route::RouteSchema;

use thiserror::Error;

use crate::context::LoadContext;
use crate::model::ModelError;
use crate::xml::quick::XmlElement;

/// Errors that can occur during XML deserialization.
#[derive(Debug, Error)]
pub enum DeserializeError {
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("XML attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Deserialization error: {0}")]
    Custom(String),
    #[error("Unexpected end of XML")]
    UnexpectedEof,
    #[error("Unexpected element: expected {expected}, found {found}")]
    UnexpectedElement { expected: String, found: String },
    #[error("Missing required field: {0}")]
    MissingField(String),
    #[error("Invalid value for {field}: '{value}'")]
    InvalidValue { field: String, value: String },
    #[error("Unresolved reference to {kind} '{name}'")]
    UnresolvedReference { kind: &'static str, name: String },
    #[error("Duplicate entry: {0}")]
    Duplicate(String),
}

impl From<ModelError> for DeserializeError {
    fn from(error: ModelError) -> Self {
        match error {
            ModelError::DuplicatePort { .. } | ModelError::DuplicateModule(_) => {
                DeserializeError::Duplicate(error.to_string())
            }
            ModelError::UnknownPort { .. } => DeserializeError::Custom(error.to_string()),
        }
    }
}

/// Declarative description of one entity type of the document.
pub trait EntitySchema {
    /// The value produced from one element.
    type Entity;
    /// Where parsed entities are inserted.
    type Collection;

    /// Tag of one entity element.
    const TAG: &'static str;
    /// Tag of the element that may wrap a list of entity elements.
    const COLLECTION_TAG: &'static str;

    /// Build an entity from its element.
    ///
    /// `collection` is the collection the entity will be inserted into; it
    /// gives parsers read access to already registered siblings.
    fn parse(
        &self,
        element: &XmlElement,
        collection: &Self::Collection,
        ctx: &mut LoadContext,
    ) -> Result<Self::Entity, DeserializeError>;

    /// Insert a parsed entity.
    ///
    /// [`DeserializeError::Duplicate`] rejects only this entity; any other
    /// error aborts the whole collection.
    fn insert(
        &self,
        entity: Self::Entity,
        collection: &mut Self::Collection,
    ) -> Result<(), DeserializeError>;
}

/// Entity elements found under `parent`, wrapped or bare, in document order.
pub fn collection_entries<'a, S: EntitySchema>(
    parent: &'a XmlElement,
) -> impl Iterator<Item = &'a XmlElement> + 'a {
    parent
        .children()
        .iter()
        .flat_map(|child| {
            if child.name() == S::COLLECTION_TAG {
                child.children()
            } else if child.name() == S::TAG {
                std::slice::from_ref(child)
            } else {
                &[][..]
            }
        })
        .filter(|entry| entry.name() == S::TAG)
}

/// Parse every entity of `schema` found under `parent` into `collection`.
///
/// Entities that fail to parse, and entities rejected as duplicates, are
/// logged and skipped. Returns the number of entities inserted.
pub fn deserialize_collection<S: EntitySchema>(
    schema: &S,
    parent: &XmlElement,
    collection: &mut S::Collection,
    ctx: &mut LoadContext,
) -> Result<usize, DeserializeError> {
    let mut inserted = 0;

    for entry in collection_entries::<S>(parent) {
        let entity = match schema.parse(entry, collection, ctx) {
            Ok(entity) => entity,
            Err(e) => {
                log::warn!("Ignoring <{}> in <{}>: {}", S::TAG, parent.name(), e);
                continue;
            }
        };
        match schema.insert(entity, collection) {
            Ok(()) => inserted += 1,
            Err(DeserializeError::Duplicate(message)) => {
                log::warn!("Could not add <{}> to {}: {}", S::TAG, S::COLLECTION_TAG, message);
            }
            Err(e) => {
                log::error!("Aborting {} of <{}>: {}", S::COLLECTION_TAG, parent.name(), e);
                return Err(e);
            }
        }
    }

    log::trace!("<{}>: {} {} entries", parent.name(), inserted, S::TAG);
    Ok(inserted)
}
