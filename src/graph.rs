//! Foreign key dependency graph between tables.
//!
//! An edge runs from the table holding a foreign key to the table it
//! references. Creation order never needs this graph because constraints are
//! added after every table exists; it only drives drop ordering and the
//! circular dependency advisory.

use crate::issue::CompileError;
use crate::model::{Schema, Table};
use std::collections::{HashMap, VecDeque};

#[derive(Debug)]
pub struct DependencyGraph<'a> {
    /// Tables in stable lexical order; indices below refer to this list.
    tables: Vec<&'a Table>,
    references: Vec<Vec<usize>>,
    referenced_by: Vec<Vec<usize>>,
}

impl<'a> DependencyGraph<'a> {
    pub fn build(schema: &'a Schema) -> Result<Self, CompileError> {
        let mut tables: Vec<&Table> = schema.tables.iter().collect();
        tables.sort_by(|a, b| {
            (a.name.to_lowercase(), &a.name, &a.id).cmp(&(b.name.to_lowercase(), &b.name, &b.id))
        });

        let index: HashMap<&str, usize> = tables
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.as_str(), i))
            .collect();

        let mut references = vec![Vec::new(); tables.len()];
        let mut referenced_by = vec![Vec::new(); tables.len()];

        for rel in &schema.relationships {
            let lookup = |id: &str| {
                index.get(id).copied().ok_or_else(|| {
                    CompileError::Internal(format!(
                        "relationship `{}` references unknown table `{}`",
                        rel.id, id
                    ))
                })
            };
            let from = lookup(&rel.target_table_id)?;
            let to = lookup(&rel.source_table_id)?;
            references[from].push(to);
            referenced_by[to].push(from);
        }

        for edges in references.iter_mut().chain(referenced_by.iter_mut()) {
            edges.sort_unstable();
            edges.dedup();
        }

        Ok(Self {
            tables,
            references,
            referenced_by,
        })
    }

    /// Stable, reproducible creation order.
    pub fn tables(&self) -> &[&'a Table] {
        &self.tables
    }

    /// Referenced tables before the tables that reference them, or `None`
    /// when the graph has a cycle. Self-references impose no order.
    ///
    /// Tables that reference nothing else sit at level 0; every other table
    /// sits one level below its deepest parent. Within a level, tables keep
    /// their lexical order.
    pub fn topological_order(&self) -> Option<Vec<&'a Table>> {
        let n = self.tables.len();
        let mut pending: Vec<usize> = (0..n)
            .map(|node| self.references[node].iter().filter(|&&p| p != node).count())
            .collect();
        let mut levels = vec![0usize; n];

        let mut ready: VecDeque<usize> = (0..n).filter(|&node| pending[node] == 0).collect();
        let mut order: Vec<(usize, usize)> = Vec::with_capacity(n);
        while let Some(node) = ready.pop_front() {
            order.push((levels[node], node));
            for &child in &self.referenced_by[node] {
                if child == node {
                    continue;
                }
                levels[child] = levels[child].max(levels[node] + 1);
                pending[child] -= 1;
                if pending[child] == 0 {
                    ready.push_back(child);
                }
            }
        }

        if order.len() < n {
            return None;
        }
        order.sort_unstable();
        Some(order.into_iter().map(|(_, node)| self.tables[node]).collect())
    }

    /// Groups of tables that reference each other, including single tables
    /// that reference themselves. Members and groups are in lexical order.
    pub fn cycles(&self) -> Vec<Vec<&'a Table>> {
        self.strongly_connected()
            .into_iter()
            .filter(|members| members.len() > 1 || self.references[members[0]].contains(&members[0]))
            .map(|members| members.into_iter().map(|i| self.tables[i]).collect())
            .collect()
    }

    /// Reverse topological order when acyclic, lexical order otherwise.
    pub fn drop_order(&self) -> Vec<&'a Table> {
        match self.topological_order() {
            Some(mut order) => {
                order.reverse();
                order
            }
            None => self.tables.clone(),
        }
    }

    fn strongly_connected(&self) -> Vec<Vec<usize>> {
        let n = self.tables.len();

        // First pass: finishing order on the forward graph.
        let mut visited = vec![false; n];
        let mut finished = Vec::with_capacity(n);
        for start in 0..n {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            let mut stack = vec![(start, 0usize)];
            while let Some(top) = stack.last_mut() {
                let (node, pos) = *top;
                match self.references[node].get(pos) {
                    Some(&next) => {
                        top.1 += 1;
                        if !visited[next] {
                            visited[next] = true;
                            stack.push((next, 0));
                        }
                    }
                    None => {
                        stack.pop();
                        finished.push(node);
                    }
                }
            }
        }

        // Second pass: components on the reversed graph.
        let mut assigned = vec![false; n];
        let mut components = Vec::new();
        for &start in finished.iter().rev() {
            if assigned[start] {
                continue;
            }
            assigned[start] = true;
            let mut members = Vec::new();
            let mut stack = vec![start];
            while let Some(node) = stack.pop() {
                members.push(node);
                for &prev in &self.referenced_by[node] {
                    if !assigned[prev] {
                        assigned[prev] = true;
                        stack.push(prev);
                    }
                }
            }
            members.sort_unstable();
            components.push(members);
        }

        components.sort_unstable_by_key(|members| members[0]);
        components
    }
}
