use super::{DateRule, StepKey};
use crate::schedule::ScheduleError;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

pub struct DependencyDag {
    pub graph: DiGraph<StepKey, ()>,
    pub index: HashMap<StepKey, NodeIndex>,
}

impl DependencyDag {
    pub fn build(rules: &[DateRule]) -> Result<Self, ScheduleError> {
        let mut graph: DiGraph<StepKey, ()> = DiGraph::with_capacity(rules.len(), rules.len());
        let mut index: HashMap<StepKey, NodeIndex> = HashMap::with_capacity(rules.len());

        // Add nodes first
        for rule in rules {
            let key = rule.key();
            if index.contains_key(&key) {
                return Err(ScheduleError::DuplicateRule {
                    department: rule.department,
                    step: rule.step,
                });
            }
            index.insert(key, graph.add_node(key));
        }

        // Add edges: dependency -> dependent
        for rule in rules {
            let target = index[&rule.key()];
            for dependency in rule.dependencies() {
                let Some(&source) = index.get(&dependency) else {
                    return Err(ScheduleError::MissingDependency {
                        department: rule.department,
                        step: rule.step,
                        requires: format!("{} / {}", dependency.0, dependency.1),
                    });
                };
                graph.add_edge(source, target, ());
            }
        }

        Ok(Self { graph, index })
    }

    /// Steps ordered so that every step follows the steps it is dated from.
    pub fn evaluation_order(&self) -> Result<Vec<StepKey>, ScheduleError> {
        let order = toposort(&self.graph, None).map_err(|cycle| {
            let (department, step) = self.graph[cycle.node_id()];
            ScheduleError::DependencyCycle { department, step }
        })?;
        Ok(order.into_iter().map(|node_ix| self.graph[node_ix]).collect())
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
