use crate::instrument::{Instrument, InstrumentPatch, Position};
use crate::store::{Catalog, Change, InstrumentGroup, NewTemplate, Storage, TemplatePairing};
use crate::utils::error::Result;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Instrument,
    Group,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanvasNode {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub position: Position,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// Node/edge view derived from the stores. Rebuilt on demand, never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanvasGraph {
    pub nodes: Vec<CanvasNode>,
    pub edges: Vec<CanvasEdge>,
}

impl CanvasGraph {
    /// One node per instrument and per group; one edge per pairing, emitted
    /// from the side whose id sorts first.
    pub fn project(instruments: &[Instrument], groups: &[InstrumentGroup]) -> Self {
        let instrument_nodes = instruments.iter().map(|inst| CanvasNode {
            id: inst.id.clone(),
            kind: NodeKind::Instrument,
            label: inst.name.clone(),
            position: inst.position,
            color: inst.color.clone(),
        });
        let group_nodes = groups.iter().map(|group| CanvasNode {
            id: group.id.clone(),
            kind: NodeKind::Group,
            label: group.name.clone(),
            position: group.position,
            color: group.color.clone(),
        });

        let edges = instruments
            .iter()
            .flat_map(|inst| {
                inst.pairings
                    .iter()
                    .filter(move |pair_id| inst.id.as_str() < pair_id.as_str())
                    .map(move |pair_id| CanvasEdge {
                        id: format!("e{}-{}", inst.id, pair_id),
                        source: inst.id.clone(),
                        target: pair_id.clone(),
                    })
            })
            .collect();

        Self {
            nodes: instrument_nodes.chain(group_nodes).collect(),
            edges,
        }
    }

    pub fn node(&self, id: &str) -> Option<&CanvasNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn connected_node_ids(&self, node_id: &str) -> Vec<String> {
        self.edges
            .iter()
            .filter_map(|edge| {
                if edge.source == node_id {
                    Some(edge.target.clone())
                } else if edge.target == node_id {
                    Some(edge.source.clone())
                } else {
                    None
                }
            })
            .collect()
    }

    /// Selection after clicking a node: the node followed by its neighbors.
    pub fn click_selection(&self, node_id: &str) -> Vec<String> {
        let mut selection = vec![node_id.to_string()];
        selection.extend(self.connected_node_ids(node_id));
        selection
    }
}

/// Writes a dragged instrument's final position back to the store.
pub fn on_node_drag_stop<S: Storage>(
    catalog: &mut Catalog<S>,
    id: &str,
    position: Position,
) -> Result<Option<Change>> {
    catalog.update_instrument(id, InstrumentPatch::position(position))
}

/// Drawing an edge between two instrument nodes pairs them.
pub fn on_connect<S: Storage>(
    catalog: &mut Catalog<S>,
    source: &str,
    target: &str,
) -> Result<Option<Change>> {
    catalog.create_pairing(source, target)
}

/// Builds a template from the selected instruments, in collection order.
/// Returns `None` when the selection holds no instruments.
pub fn capture_template(
    instruments: &[Instrument],
    selected_ids: &[String],
    name: &str,
    description: &str,
) -> Option<NewTemplate> {
    let selected: Vec<&Instrument> = instruments
        .iter()
        .filter(|inst| selected_ids.contains(&inst.id))
        .collect();
    let origin = selected.first()?.position;

    let layout: BTreeMap<String, Position> = selected
        .iter()
        .map(|inst| {
            let offset = Position::new(inst.position.x - origin.x, inst.position.y - origin.y);
            (inst.id.clone(), offset)
        })
        .collect();

    let mut pairings: Vec<TemplatePairing> = Vec::new();
    for inst in &selected {
        for pair_id in &inst.pairings {
            if !selected.iter().any(|other| &other.id == pair_id) {
                continue;
            }
            let pairing = TemplatePairing {
                from: inst.id.clone(),
                to: pair_id.clone(),
                note: None,
            };
            if !pairings.iter().any(|p| p.same_edge(&pairing)) {
                pairings.push(pairing);
            }
        }
    }

    Some(NewTemplate {
        name: name.to_string(),
        description: description.to_string(),
        tags: Vec::new(),
        instruments: selected.iter().map(|inst| inst.id.clone()).collect(),
        pairings,
        layout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::instrument;
    use crate::store::MemoryStorage;

    fn node(id: &str, partners: &[&str]) -> Instrument {
        let mut inst = instrument(id, &id.to_uppercase());
        inst.pairings = partners.iter().map(|p| p.to_string()).collect();
        inst
    }

    #[test]
    fn edges_are_deduplicated_by_id_order() {
        let instruments = vec![node("a", &["b", "c"]), node("b", &["a"]), node("c", &["a"])];
        let graph = CanvasGraph::project(&instruments, &[]);

        assert_eq!(graph.nodes.len(), 3);
        let edges: Vec<_> = graph
            .edges
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect();
        assert_eq!(edges, vec![("a", "b"), ("a", "c")]);
        assert_eq!(graph.edges[0].id, "ea-b");
    }

    #[test]
    fn groups_become_nodes() {
        let group = InstrumentGroup {
            id: "g".to_string(),
            name: "Strings".to_string(),
            description: String::new(),
            instruments: vec!["a".to_string()],
            position: Position::new(5.0, 5.0),
            color: "#3b82f6".to_string(),
            collapsed: false,
        };
        let graph = CanvasGraph::project(&[node("a", &[])], &[group]);

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.node("g").unwrap().kind, NodeKind::Group);
        assert_eq!(graph.node("a").unwrap().kind, NodeKind::Instrument);
    }

    #[test]
    fn click_selects_node_and_neighbors() {
        let instruments = vec![
            node("a", &["b"]),
            node("b", &["a", "c"]),
            node("c", &["b"]),
            node("d", &[]),
        ];
        let graph = CanvasGraph::project(&instruments, &[]);

        assert_eq!(graph.click_selection("b"), vec!["b", "a", "c"]);
        assert_eq!(graph.click_selection("d"), vec!["d"]);
    }

    #[test]
    fn drag_and_connect_go_through_the_catalog() {
        let mut catalog = Catalog::open(MemoryStorage::default()).unwrap();
        let new = |name: &str| crate::instrument::NewInstrument {
            name: name.to_string(),
            developer: "Dev".to_string(),
            host: crate::instrument::Host::AU,
            category: crate::instrument::Category::Keys,
            tags: vec![],
            notes: String::new(),
            color: None,
        };
        let a = catalog.add_instrument(new("A")).unwrap();
        let b = catalog.add_instrument(new("B")).unwrap();

        on_node_drag_stop(&mut catalog, &a, Position::new(12.0, 34.0)).unwrap();
        on_connect(&mut catalog, &a, &b).unwrap();

        let inst = catalog.instruments().get(&a).unwrap();
        assert_eq!(inst.position, Position::new(12.0, 34.0));
        assert!(inst.is_paired_with(&b));
    }

    #[test]
    fn template_capture_uses_relative_layout_and_unique_pairings() {
        let mut instruments = vec![node("a", &["b", "z"]), node("b", &["a", "c"]), node("c", &["b"])];
        instruments[0].position = Position::new(100.0, 100.0);
        instruments[1].position = Position::new(150.0, 80.0);
        let selection = vec!["b".to_string(), "a".to_string()];

        let template = capture_template(&instruments, &selection, "Duo", "").unwrap();

        assert_eq!(template.instruments, vec!["a", "b"]);
        assert_eq!(template.layout["a"], Position::new(0.0, 0.0));
        assert_eq!(template.layout["b"], Position::new(50.0, -20.0));
        assert_eq!(template.pairings.len(), 1);
        assert_eq!(template.pairings[0].from, "a");
        assert_eq!(template.pairings[0].to, "b");
        assert!(template.tags.is_empty());
    }

    #[test]
    fn template_capture_needs_a_selection() {
        let instruments = vec![node("a", &[])];
        assert!(capture_template(&instruments, &[], "Empty", "").is_none());
        assert!(capture_template(&instruments, &["group".to_string()], "Empty", "").is_none());
    }
}
