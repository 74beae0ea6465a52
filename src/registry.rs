//! One notification container per (target root, container class).

use std::collections::HashMap;

use crate::config::EffectiveOptions;
use crate::dom::{Document, Node, NodeId, Selector};

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
struct ContainerKey {
    root: NodeId,
    class: String,
}

#[derive(Debug)]
struct Entry {
    node: NodeId,
    target: Selector,
}

#[derive(Debug, Default)]
pub struct ContainerRegistry {
    containers: HashMap<ContainerKey, Entry>,
}

impl ContainerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Existing containers under every root matching the target.
    #[must_use]
    pub fn get(&self, doc: &Document, options: &EffectiveOptions) -> Vec<NodeId> {
        doc.select(&options.target)
            .into_iter()
            .filter_map(|root| self.lookup(doc, root, &options.container_id))
            .collect()
    }

    /// Containers for every matching root, creating the missing ones.
    ///
    /// New containers are appended to their root and announced to assistive
    /// technology as a polite live region.
    pub fn get_or_create(&mut self, doc: &mut Document, options: &EffectiveOptions) -> Vec<NodeId> {
        self.prune(doc);
        let roots = doc.select(&options.target);
        let mut found = Vec::with_capacity(roots.len());
        for root in roots {
            if let Some(existing) = self.lookup(doc, root, &options.container_id) {
                found.push(existing);
                continue;
            }
            let node = doc.create_element("div");
            doc.add_class(node, &options.container_id);
            doc.add_class(node, &options.position_class);
            doc.set_attribute(node, "aria-live", "polite");
            doc.set_attribute(node, "role", "alert");
            doc.append_child(root, node);
            self.containers.insert(
                ContainerKey {
                    root,
                    class: options.container_id.clone(),
                },
                Entry {
                    node,
                    target: options.target.clone(),
                },
            );
            tracing::debug!(container = %node, %root, target = %options.target, "container created");
            found.push(node);
        }
        found
    }

    /// Remove `container` if it holds no toasts.
    ///
    /// Returns the target it was created for, so callers can drop state keyed
    /// on it. A container that still has children, or that is already gone,
    /// is left alone and yields `None`.
    pub fn reclaim_if_empty(&mut self, doc: &mut Document, container: NodeId) -> Option<Selector> {
        if !doc.get(container)?.children().is_empty() {
            return None;
        }
        let key = self
            .containers
            .iter()
            .find(|(_, entry)| entry.node == container)
            .map(|(key, _)| key.clone())?;
        let entry = self.containers.remove(&key)?;
        doc.remove(container);
        tracing::debug!(%container, target = %entry.target, "container reclaimed");
        Some(entry.target)
    }

    /// Remove every known container along with the toasts inside.
    pub fn clear(&mut self, doc: &mut Document) -> usize {
        let mut removed = 0;
        for (_, entry) in self.containers.drain() {
            if doc.remove(entry.node) {
                removed += 1;
            }
        }
        removed
    }

    /// Live containers, in document order.
    #[must_use]
    pub fn containers(&self, doc: &Document) -> Vec<NodeId> {
        doc.walk()
            .into_iter()
            .filter(|node| self.containers.values().any(|entry| entry.node == *node))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    fn lookup(&self, doc: &Document, root: NodeId, class: &str) -> Option<NodeId> {
        let key = ContainerKey {
            root,
            class: class.to_string(),
        };
        self.containers
            .get(&key)
            .map(|entry| entry.node)
            .filter(|node| {
                doc.is_attached(*node) && doc.get(*node).and_then(Node::parent) == Some(root)
            })
    }

    /// Forget containers the host removed from the document.
    fn prune(&mut self, doc: &Document) {
        self.containers
            .retain(|_, entry| doc.is_attached(entry.node));
    }
}
