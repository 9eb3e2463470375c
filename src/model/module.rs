//! Hardware module: the arena owning one HAL unit's ports and routes.
//!
//! Ports and routes live in slot vectors addressed by [`PortId`] and
//! [`RouteId`]. Route sinks and sources, and the back-links from ports to the
//! routes touching them, are plain handles resolved through the module, so
//! the port/route cycle carries no ownership.

use std::fmt;

use crate::model::ModelError;
use crate::model::port::{Port, PortId};
use crate::model::route::{Route, RouteId, RouteType};

/// HAL interface version declared by a module, `major.minor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct HalVersion {
    pub major: u32,
    pub minor: u32,
}

impl HalVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse leniently: each component that does not parse reads as zero,
    /// and parsing stops at the first malformed component.
    pub fn parse_loose(literal: &str) -> HalVersion {
        let mut parts = literal.trim().splitn(2, '.');
        let major = parts.next().and_then(leading_number);
        let minor = match major {
            Some(_) => parts.next().and_then(leading_number),
            None => None,
        };
        HalVersion {
            major: major.unwrap_or(0),
            minor: minor.unwrap_or(0),
        }
    }
}

/// Parse the leading decimal digits of `text`, if any.
fn leading_number(text: &str) -> Option<u32> {
    let end = text
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    text[..end].parse().ok()
}

impl fmt::Display for HalVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A logical grouping of ports and routes for one hardware abstraction unit.
#[derive(Debug, Clone, PartialEq)]
pub struct HwModule {
    name: String,
    version: HalVersion,
    ports: Vec<Option<Port>>,
    routes: Vec<Option<Route>>,
    attached_devices: Vec<PortId>,
    default_output_device: Option<PortId>,
}

impl HwModule {
    pub fn new(name: impl Into<String>, version: HalVersion) -> Self {
        Self {
            name: name.into(),
            version,
            ports: Vec::new(),
            routes: Vec::new(),
            attached_devices: Vec::new(),
            default_output_device: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> HalVersion {
        self.version
    }

    // ---------------------------------------------------------------------
    // Ports
    // ---------------------------------------------------------------------

    /// Register a port. Tag names share one namespace across mix and device ports.
    pub fn add_port(&mut self, mut port: Port) -> Result<PortId, ModelError> {
        if self.find_port(&port.tag_name).is_some() {
            return Err(ModelError::DuplicatePort {
                module: self.name.clone(),
                tag_name: port.tag_name,
            });
        }
        port.routes.clear();
        let id = PortId(self.ports.len() as u32);
        self.ports.push(Some(port));
        Ok(id)
    }

    /// Remove a port together with every route sinking into it. The port is
    /// also dropped from the sources of the remaining routes, from the
    /// attached devices and from the default output device.
    pub fn remove_port(&mut self, id: PortId) -> Option<Port> {
        let port = self.ports.get(id.0 as usize)?.as_ref()?;
        let touching: Vec<RouteId> = port.routes().collect();

        for route_id in touching {
            let sinks_here = self.route(route_id).is_some_and(|route| route.sink == id);
            if sinks_here {
                self.remove_route(route_id);
            } else if let Some(Some(route)) = self.routes.get_mut(route_id.0 as usize) {
                route.sources.retain(|source| *source != id);
            }
        }

        self.attached_devices.retain(|device| *device != id);
        if self.default_output_device == Some(id) {
            self.default_output_device = None;
        }

        self.ports.get_mut(id.0 as usize)?.take()
    }

    pub fn port(&self, id: PortId) -> Option<&Port> {
        self.ports.get(id.0 as usize)?.as_ref()
    }

    pub(crate) fn port_mut(&mut self, id: PortId) -> Option<&mut Port> {
        self.ports.get_mut(id.0 as usize)?.as_mut()
    }

    /// All live ports in registration order.
    pub fn ports(&self) -> impl Iterator<Item = (PortId, &Port)> {
        self.ports
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|port| (PortId(i as u32), port)))
    }

    pub fn mix_ports(&self) -> impl Iterator<Item = (PortId, &Port)> {
        self.ports().filter(|(_, port)| port.is_mix())
    }

    pub fn device_ports(&self) -> impl Iterator<Item = (PortId, &Port)> {
        self.ports().filter(|(_, port)| port.is_device())
    }

    /// Find a mix or device port by tag name.
    pub fn find_port(&self, tag_name: &str) -> Option<PortId> {
        self.ports()
            .find(|(_, port)| port.tag_name == tag_name)
            .map(|(id, _)| id)
    }

    /// Find a declared device port by tag name.
    pub fn find_device(&self, tag_name: &str) -> Option<PortId> {
        self.device_ports()
            .find(|(_, port)| port.tag_name == tag_name)
            .map(|(id, _)| id)
    }

    pub fn port_by_tag(&self, tag_name: &str) -> Option<&Port> {
        self.find_port(tag_name).and_then(|id| self.port(id))
    }

    // ---------------------------------------------------------------------
    // Routes
    // ---------------------------------------------------------------------

    /// Register a route and back-link its sink and sources to it.
    ///
    /// Duplicate sources are collapsed, keeping the first occurrence.
    pub fn add_route(
        &mut self,
        route_type: RouteType,
        sink: PortId,
        sources: Vec<PortId>,
    ) -> Result<RouteId, ModelError> {
        if self.port(sink).is_none() {
            return Err(ModelError::UnknownPort {
                module: self.name.clone(),
                port: sink,
            });
        }
        let mut unique: Vec<PortId> = Vec::with_capacity(sources.len());
        for source in sources {
            if self.port(source).is_none() {
                return Err(ModelError::UnknownPort {
                    module: self.name.clone(),
                    port: source,
                });
            }
            if !unique.contains(&source) {
                unique.push(source);
            }
        }

        let id = RouteId(self.routes.len() as u32);
        for port_id in std::iter::once(sink).chain(unique.iter().copied()) {
            if let Some(port) = self.port_mut(port_id) {
                port.routes.insert(id);
            }
        }
        self.routes.push(Some(Route {
            route_type,
            sink,
            sources: unique,
        }));
        Ok(id)
    }

    /// Remove a route and clear the back-links pointing at it.
    pub fn remove_route(&mut self, id: RouteId) -> Option<Route> {
        let route = self.routes.get_mut(id.0 as usize)?.take()?;
        for port_id in std::iter::once(route.sink).chain(route.sources.iter().copied()) {
            if let Some(port) = self.port_mut(port_id) {
                port.routes.remove(&id);
            }
        }
        Some(route)
    }

    pub fn route(&self, id: RouteId) -> Option<&Route> {
        self.routes.get(id.0 as usize)?.as_ref()
    }

    /// All live routes in registration order.
    pub fn routes(&self) -> impl Iterator<Item = (RouteId, &Route)> {
        self.routes
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|route| (RouteId(i as u32), route)))
    }

    /// Tag name of the port behind `id`, for display and matching.
    pub fn tag_name(&self, id: PortId) -> Option<&str> {
        self.port(id).map(|port| port.tag_name.as_str())
    }

    /// Routes whose sink is the port tagged `tag_name`.
    pub fn routes_into<'a>(
        &'a self,
        tag_name: &'a str,
    ) -> impl Iterator<Item = (RouteId, &'a Route)> + 'a {
        self.routes()
            .filter(move |(_, route)| self.tag_name(route.sink) == Some(tag_name))
    }

    // ---------------------------------------------------------------------
    // Device references
    // ---------------------------------------------------------------------

    /// Mark a declared device as attached. Attaching twice is a no-op.
    pub fn attach_device(&mut self, id: PortId) -> bool {
        let is_device = self.port(id).is_some_and(Port::is_device);
        if !is_device || self.attached_devices.contains(&id) {
            return false;
        }
        self.attached_devices.push(id);
        true
    }

    pub fn attached_devices(&self) -> impl Iterator<Item = (PortId, &Port)> {
        self.attached_devices
            .iter()
            .filter_map(|id| self.port(*id).map(|port| (*id, port)))
    }

    pub fn set_default_output_device(&mut self, id: PortId) {
        if self.port(id).is_some_and(Port::is_device) {
            self.default_output_device = Some(id);
        }
    }

    pub fn default_output_device(&self) -> Option<PortId> {
        self.default_output_device
    }
}
