//! Route deserialization.
//!
//! ```xml
//! <routes>
//!     <route type="mix" sink="Speaker" sources="primary output,deep_buffer"/>
//! </routes>
//! ```
//!
//! Sink and source tag names are resolved against the ports already
//! registered in the module, so routes are read after both port collections.

use crate::context::LoadContext;
use crate::model::{HwModule, PortId, RouteType};
use crate::xml::deserialize::{DeserializeError, EntitySchema};
use crate::xml::quick::XmlElement;

pub const TYPE: &str = "type";
pub const SINK: &str = "sink";
pub const SOURCES: &str = "sources";

/// A route whose references are resolved but not yet linked into the module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub route_type: RouteType,
    pub sink: PortId,
    pub sources: Vec<PortId>,
}

/// Resolve one token of a `sources` list, first verbatim then trimmed.
fn resolve_source(module: &HwModule, token: &str) -> Option<PortId> {
    module
        .find_port(token)
        .or_else(|| module.find_port(token.trim()))
}

/// Schema of `<route>` elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteSchema;

impl EntitySchema for RouteSchema {
    type Entity = ResolvedRoute;
    type Collection = HwModule;

    const TAG: &'static str = "route";
    const COLLECTION_TAG: &'static str = "routes";

    fn parse(
        &self,
        element: &XmlElement,
        module: &HwModule,
        _ctx: &mut LoadContext,
    ) -> Result<ResolvedRoute, DeserializeError> {
        let attrs = element.attrs();
        let route_type = RouteType::from_literal(attrs.get_req(TYPE)?);

        let sink_name = attrs.get_req(SINK)?;
        let sink = module
            .find_port(sink_name)
            .ok_or_else(|| DeserializeError::UnresolvedReference {
                kind: "sink",
                name: sink_name.to_string(),
            })?;

        let mut sources = Vec::new();
        for token in attrs.get_req(SOURCES)?.split(',') {
            if token.is_empty() {
                continue;
            }
            match resolve_source(module, token) {
                Some(id) => sources.push(id),
                None => log::warn!(
                    "Route into '{}' in module '{}': no source named '{}'",
                    sink_name,
                    module.name(),
                    token.trim()
                ),
            }
        }
        if sources.is_empty() {
            log::warn!(
                "Route into '{}' in module '{}' has no resolved source",
                sink_name,
                module.name()
            );
        }

        Ok(ResolvedRoute {
            route_type,
            sink,
            sources,
        })
    }

    fn insert(&self, entity: ResolvedRoute, module: &mut HwModule) -> Result<(), DeserializeError> {
        let id = module.add_route(entity.route_type, entity.sink, entity.sources)?;
        log::trace!(
            "Module '{}': route #{} into '{}'",
            module.name(),
            id.index(),
            module.tag_name(entity.sink).unwrap_or_default()
        );
        Ok(())
    }
}
