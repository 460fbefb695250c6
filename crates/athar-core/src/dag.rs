//! Table dependency graph and creation ordering

use crate::error::{CoreError, CoreResult};
use crate::ident::Ident;
use crate::schema::TableDef;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

/// A directed acyclic graph of foreign-key dependencies between tables.
///
/// Edges point from a referenced table to the table that references it, so a
/// topological sort yields referents first.
#[derive(Debug)]
pub struct TableDag {
    graph: DiGraph<Ident, ()>,
    node_map: HashMap<Ident, NodeIndex>,
    defs: HashMap<Ident, TableDef>,
}

impl TableDag {
    /// Build the DAG from a set of table definitions.
    ///
    /// Every referenced table must be part of the set. Self references are
    /// allowed and ignored for ordering.
    pub fn build(tables: Vec<TableDef>) -> CoreResult<Self> {
        let mut dag = Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
            defs: HashMap::new(),
        };

        // Insert nodes in declaration order so ties keep a stable order.
        for def in &tables {
            if dag.node_map.contains_key(&def.name) {
                return Err(CoreError::DuplicateTable {
                    name: def.name.to_string(),
                });
            }
            let idx = dag.graph.add_node(def.name.clone());
            dag.node_map.insert(def.name.clone(), idx);
        }

        for def in &tables {
            let to = dag.node_map[&def.name];
            for referenced in def.referenced_tables() {
                let from = *dag.node_map.get(referenced).ok_or_else(|| {
                    CoreError::UnknownReference {
                        table: def.name.to_string(),
                        referenced: referenced.to_string(),
                    }
                })?;
                dag.graph.update_edge(from, to, ());
            }
        }

        for def in tables {
            dag.defs.insert(def.name.clone(), def);
        }

        dag.validate()?;
        Ok(dag)
    }

    /// Validate the DAG has no cycles
    pub fn validate(&self) -> CoreResult<()> {
        self.order_indices().map(|_| ())
    }

    fn order_indices(&self) -> CoreResult<Vec<NodeIndex>> {
        toposort(&self.graph, None).map_err(|cycle| CoreError::CircularDependency {
            cycle: self.find_cycle_path(cycle.node_id()),
        })
    }

    /// Find a cycle path starting from a node for error reporting
    fn find_cycle_path(&self, start: NodeIndex) -> String {
        let mut path: Vec<String> = vec![self.graph[start].to_string()];
        let mut current = start;
        let mut visited = HashSet::new();
        visited.insert(current);

        while let Some(edge) = self.graph.edges(current).next() {
            let target = edge.target();
            path.push(self.graph[target].to_string());

            if target == start || visited.contains(&target) {
                break;
            }

            visited.insert(target);
            current = target;
        }

        path.join(" -> ")
    }

    /// Table definitions in creation order (referenced tables first)
    pub fn creation_order(&self) -> CoreResult<Vec<&TableDef>> {
        Ok(self
            .order_indices()?
            .into_iter()
            .map(|idx| &self.defs[&self.graph[idx]])
            .collect())
    }

    /// Table names in creation order
    pub fn creation_order_names(&self) -> CoreResult<Vec<Ident>> {
        Ok(self
            .order_indices()?
            .into_iter()
            .map(|idx| self.graph[idx].clone())
            .collect())
    }

    /// Direct referents of a table
    #[cfg(test)]
    fn dependencies(&self, table: &str) -> Vec<String> {
        match self.node_map.get(table) {
            Some(&idx) => self
                .graph
                .edges_directed(idx, petgraph::Direction::Incoming)
                .map(|e| self.graph[e.source()].to_string())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Tables that reference `table` directly
    #[cfg(test)]
    fn dependents(&self, table: &str) -> Vec<String> {
        match self.node_map.get(table) {
            Some(&idx) => self
                .graph
                .edges_directed(idx, petgraph::Direction::Outgoing)
                .map(|e| self.graph[e.target()].to_string())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Look up a definition by name
    #[cfg(test)]
    fn get(&self, table: &str) -> Option<&TableDef> {
        self.defs.get(table)
    }

    /// Check if a table is part of the DAG
    #[cfg(test)]
    fn contains(&self, table: &str) -> bool {
        self.node_map.contains_key(table)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

#[cfg(test)]
#[path = "dag_test.rs"]
mod tests;
