//! Design Graph Implementation
//!
//! Components live in an arena indexed by [`ComponentId`]; interfaces are the
//! nodes of an undirected petgraph graph whose edges are direct links. Both
//! are built once during board assembly. Afterwards the only mutation is a
//! parameter slot moving from an interval to a fixed value.

use chrono::{DateTime, Utc};
use petgraph::graph::UnGraph;
use serde::{Deserialize, Serialize};

use super::schema::*;
use super::DesignError;
use crate::parameter::{ParamKind, Parameter};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignMetadata {
    pub name: String,
    pub created: DateTime<Utc>,
}

/// Component arena plus interface connectivity graph.
#[derive(Debug, Clone)]
pub struct Design {
    components: Vec<Component>,
    graph: UnGraph<Interface, Link>,
    root: ComponentId,
    pub metadata: DesignMetadata,
}

impl Design {
    /// Create a design with an empty root board component.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let root = Component::new(
            name.clone(),
            ComponentKind::composite(CompositeKind::Board),
            None,
        );
        Self {
            components: vec![root],
            graph: UnGraph::new_undirected(),
            root: ComponentId(0),
            metadata: DesignMetadata {
                name,
                created: Utc::now(),
            },
        }
    }

    pub fn root(&self) -> ComponentId {
        self.root
    }

    /// Add a component under `parent`, creating its interfaces.
    pub fn add_component(
        &mut self,
        parent: ComponentId,
        name: impl Into<String>,
        kind: ComponentKind,
    ) -> ComponentId {
        let id = ComponentId(self.components.len());
        self.components.push(Component::new(name, kind, Some(parent)));
        self.components[parent.0].children.push(id);

        for (if_name, if_kind) in kind.interface_layout() {
            let iface = self.add_interface(id, None, if_name, if_kind);
            self.components[id.0].interfaces.push(iface);
        }

        id
    }

    fn add_interface(
        &mut self,
        owner: ComponentId,
        parent: Option<InterfaceId>,
        name: String,
        kind: InterfaceKind,
    ) -> InterfaceId {
        let idx = self.graph.add_node(Interface {
            name,
            kind,
            owner,
            parent,
            children: Vec::new(),
        });

        for (child_name, child_kind) in kind.children() {
            let child = self.add_interface(owner, Some(idx), child_name.to_string(), *child_kind);
            self.graph[idx].children.push(child);
        }

        idx
    }

    pub fn component(&self, id: ComponentId) -> &Component {
        &self.components[id.0]
    }

    /// All components in creation order (parents before children).
    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &Component)> {
        self.components
            .iter()
            .enumerate()
            .map(|(i, c)| (ComponentId(i), c))
    }

    pub fn component_ids(&self) -> impl Iterator<Item = ComponentId> {
        (0..self.components.len()).map(ComponentId)
    }

    pub fn interface(&self, id: InterfaceId) -> &Interface {
        &self.graph[id]
    }

    /// Look up a direct child component by name.
    pub fn child(&self, parent: ComponentId, name: &str) -> Result<ComponentId, DesignError> {
        self.component(parent)
            .children
            .iter()
            .copied()
            .find(|c| self.component(*c).name == name)
            .ok_or_else(|| DesignError::UnknownComponent {
                parent: self.path(parent),
                name: name.to_string(),
            })
    }

    /// Resolve a dotted interface path on a component, e.g. `"power.hv"`.
    pub fn iface(&self, component: ComponentId, path: &str) -> Result<InterfaceId, DesignError> {
        let mut segments = path.split('.');
        let first = segments.next().unwrap_or_default();

        let mut current = self
            .component(component)
            .interfaces
            .iter()
            .copied()
            .find(|i| self.graph[*i].name == first)
            .ok_or_else(|| DesignError::UnknownInterface {
                owner: self.path(component),
                name: path.to_string(),
            })?;

        for segment in segments {
            current = self.sub_interface(current, segment)?;
        }

        Ok(current)
    }

    pub fn sub_interface(&self, iface: InterfaceId, name: &str) -> Result<InterfaceId, DesignError> {
        self.graph[iface]
            .children
            .iter()
            .copied()
            .find(|c| self.graph[*c].name == name)
            .ok_or_else(|| DesignError::UnknownInterface {
                owner: self.interface_path(iface),
                name: name.to_string(),
            })
    }

    /// Link two interfaces; composite interfaces link their children pairwise.
    pub fn connect(&mut self, a: InterfaceId, b: InterfaceId) -> Result<(), DesignError> {
        self.connect_linked(a, b, Link { bridged_by: None })
    }

    /// Connect `a` to the bridge's input and the bridge's output to `b`.
    pub fn connect_via(
        &mut self,
        a: InterfaceId,
        bridge: ComponentId,
        b: InterfaceId,
    ) -> Result<(), DesignError> {
        let (input, output) = self
            .component(bridge)
            .bridge
            .ok_or_else(|| DesignError::NotABridge(self.path(bridge)))?;
        let link = Link {
            bridged_by: Some(bridge),
        };
        self.connect_linked(a, input, link)?;
        self.connect_linked(output, b, link)
    }

    pub fn connect_to_all(&mut self, source: InterfaceId, targets: &[InterfaceId]) -> Result<(), DesignError> {
        for target in targets {
            self.connect(source, *target)?;
        }
        Ok(())
    }

    /// Place a capacitor across a power rail.
    pub fn decouple(&mut self, power: InterfaceId, capacitor: ComponentId) -> Result<(), DesignError> {
        if self.component(capacitor).kind != ComponentKind::Capacitor {
            return Err(DesignError::WrongKind {
                path: self.path(capacitor),
                expected: "Capacitor",
            });
        }
        let hv = self.sub_interface(power, "hv")?;
        let lv = self.sub_interface(power, "lv")?;
        let c0 = self.iface(capacitor, "unnamed[0]")?;
        let c1 = self.iface(capacitor, "unnamed[1]")?;
        self.connect(hv, c0)?;
        self.connect(lv, c1)
    }

    fn connect_linked(&mut self, a: InterfaceId, b: InterfaceId, link: Link) -> Result<(), DesignError> {
        let (ka, kb) = (self.graph[a].kind, self.graph[b].kind);

        match (ka, kb) {
            _ if ka == kb => {
                self.add_link(a, b, link);
                let children: Vec<(String, InterfaceId)> = self.graph[a]
                    .children
                    .iter()
                    .map(|c| (self.graph[*c].name.clone(), *c))
                    .collect();
                for (name, child_a) in children {
                    let child_b = self.sub_interface(b, &name)?;
                    self.connect_linked(child_a, child_b, link)?;
                }
                Ok(())
            }
            (InterfaceKind::Electrical, InterfaceKind::ElectricLogic) => {
                let signal = self.sub_interface(b, "signal")?;
                self.add_link(a, signal, link);
                Ok(())
            }
            (InterfaceKind::ElectricLogic, InterfaceKind::Electrical) => {
                let signal = self.sub_interface(a, "signal")?;
                self.add_link(signal, b, link);
                Ok(())
            }
            _ => Err(DesignError::InterfaceMismatch {
                a: self.interface_path(a),
                a_kind: ka,
                b: self.interface_path(b),
                b_kind: kb,
            }),
        }
    }

    fn add_link(&mut self, a: InterfaceId, b: InterfaceId, link: Link) {
        if a == b || self.graph.find_edge(a, b).is_some() {
            return;
        }
        self.graph.add_edge(a, b, link);
    }

    /// Interfaces sharing a direct link with `iface`, excluding itself.
    pub fn direct_connections(&self, iface: InterfaceId) -> Vec<InterfaceId> {
        self.graph
            .neighbors(iface)
            .filter(|other| *other != iface)
            .collect()
    }

    pub fn set_bridge(
        &mut self,
        component: ComponentId,
        input: InterfaceId,
        output: InterfaceId,
    ) -> Result<(), DesignError> {
        for iface in [input, output] {
            if !self.is_within(iface, component) {
                return Err(DesignError::UnknownInterface {
                    owner: self.path(component),
                    name: self.interface_path(iface),
                });
            }
        }
        self.components[component.0].bridge = Some((input, output));
        Ok(())
    }

    /// Whether an interface belongs to `component` or one of its descendants.
    fn is_within(&self, iface: InterfaceId, component: ComponentId) -> bool {
        let mut owner = Some(self.graph[iface].owner);
        while let Some(id) = owner {
            if id == component {
                return true;
            }
            owner = self.component(id).parent;
        }
        false
    }

    pub fn set_designator(&mut self, component: ComponentId, prefix: impl Into<String>) {
        self.components[component.0].designator = Some(prefix.into());
    }

    pub fn param(&self, component: ComponentId, kind: ParamKind) -> Option<Parameter> {
        self.component(component).param(kind)
    }

    /// Store a parameter into an unbound slot.
    pub fn bind_param(
        &mut self,
        component: ComponentId,
        kind: ParamKind,
        value: Parameter,
    ) -> Result<(), DesignError> {
        if self.param(component, kind).is_some() {
            return Err(DesignError::ParameterAlreadyBound {
                component: self.path(component),
                param: kind,
            });
        }
        self.components[component.0].params.insert(kind, value);
        Ok(())
    }

    /// Replace a slot with its narrowed value and return it.
    pub fn narrow_param(
        &mut self,
        component: ComponentId,
        kind: ParamKind,
        value: f64,
    ) -> Result<Parameter, DesignError> {
        let current = self
            .param(component, kind)
            .ok_or_else(|| DesignError::MissingParameter {
                component: self.path(component),
                param: kind,
            })?;
        let narrowed = current.narrow_to(value)?;
        self.components[component.0].params.insert(kind, narrowed);
        Ok(narrowed)
    }

    /// Dotted path from the root, e.g. `vindriktning.pm_sensor.fan_connector`.
    pub fn path(&self, component: ComponentId) -> String {
        let mut names = Vec::new();
        let mut current = Some(component);
        while let Some(id) = current {
            let c = self.component(id);
            names.push(c.name.as_str());
            current = c.parent;
        }
        names.reverse();
        names.join(".")
    }

    pub fn interface_path(&self, iface: InterfaceId) -> String {
        let mut names = Vec::new();
        let mut current = Some(iface);
        while let Some(id) = current {
            names.push(self.graph[id].name.as_str());
            current = self.graph[id].parent;
        }
        names.reverse();
        format!("{}.{}", self.path(self.graph[iface].owner), names.join("."))
    }

    pub fn stats(&self) -> DesignStats {
        DesignStats {
            component_count: self.components.len(),
            interface_count: self.graph.node_count(),
            link_count: self.graph.edge_count(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignStats {
    pub component_count: usize,
    pub interface_count: usize,
    pub link_count: usize,
}
