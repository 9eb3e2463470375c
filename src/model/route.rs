use crate::model::port::PortId;

/// Stable handle of a route inside its owning module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(pub(crate) u32);

impl RouteId {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteType {
    /// Sources are mixed together into the sink.
    Mix,
    /// Exactly one source feeds the sink at a time.
    Mux,
}

impl RouteType {
    /// `mix` selects [`RouteType::Mix`]; anything else reads as a mux.
    pub fn from_literal(literal: &str) -> RouteType {
        if literal == "mix" {
            RouteType::Mix
        } else {
            RouteType::Mux
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteType::Mix => "mix",
            RouteType::Mux => "mux",
        }
    }
}

/// A directed path from one or more candidate source ports into a sink port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub route_type: RouteType,
    pub(crate) sink: PortId,
    pub(crate) sources: Vec<PortId>,
}

impl Route {
    pub fn sink(&self) -> PortId {
        self.sink
    }

    /// Source ports in declaration order, without duplicates.
    pub fn sources(&self) -> &[PortId] {
        &self.sources
    }

    /// Whether `port` is this route's sink or one of its sources.
    pub fn touches(&self, port: PortId) -> bool {
        self.sink == port || self.sources.contains(&port)
    }
}
