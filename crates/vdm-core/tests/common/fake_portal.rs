//! Scripted fake portal implementing the document capability.
//!
//! Pages are canned node tables: each node declares the selector strings
//! it matches, its text, attributes, and visibility. Clicks consume
//! scripted effect batches (URL changes, attribute updates, node
//! reveals, download-agent file writes), which is enough to drive every
//! workflow stage deterministically.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use vdm_core::dom::Dom;

pub type NodeId = usize;

/// A scripted consequence of clicking a node.
pub enum Effect {
    /// The browser ends up at a new URL.
    SetUrl(String),
    /// An attribute changes (e.g. aria-expanded, a select's value).
    SetAttr(NodeId, &'static str, String),
    /// A previously hidden node becomes visible.
    Show(NodeId),
    /// A previously unattached node enters the document.
    Attach(NodeId),
    /// The download agent writes `len` bytes to `path`.
    WriteFile(PathBuf, u64),
}

#[derive(Default)]
struct NodeData {
    selectors: Vec<String>,
    text: String,
    attrs: HashMap<String, String>,
    visible: bool,
    attached: bool,
    parent: Option<NodeId>,
}

/// Builder for one fixture node.
pub struct NodeSpec {
    data: NodeData,
}

impl NodeSpec {
    /// A visible, attached node matching `selector`.
    pub fn at(selector: &str) -> Self {
        Self {
            data: NodeData {
                selectors: vec![selector.to_string()],
                visible: true,
                attached: true,
                ..NodeData::default()
            },
        }
    }

    /// Also match an additional selector string.
    pub fn also(mut self, selector: &str) -> Self {
        self.data.selectors.push(selector.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.data.text = text.to_string();
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.data.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.data.visible = false;
        self
    }

    /// Not in the document until an `Attach` effect adds it.
    pub fn detached(mut self) -> Self {
        self.data.attached = false;
        self
    }

    /// Scope this node under `parent` for `find_all_in` lookups.
    pub fn under(mut self, parent: NodeId) -> Self {
        self.data.parent = Some(parent);
        self
    }
}

struct World {
    url: String,
    nodes: Vec<NodeData>,
    on_click: HashMap<NodeId, VecDeque<Vec<Effect>>>,
}

impl World {
    fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.nodes[node].parent;
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.nodes[id].parent;
        }
        false
    }

    fn apply(&mut self, effect: Effect) -> Result<()> {
        match effect {
            Effect::SetUrl(url) => self.url = url,
            Effect::SetAttr(id, name, value) => {
                self.nodes[id].attrs.insert(name.to_string(), value);
            }
            Effect::Show(id) => self.nodes[id].visible = true,
            Effect::Attach(id) => self.nodes[id].attached = true,
            Effect::WriteFile(path, len) => fs::write(path, vec![0u8; len as usize])?,
        }
        Ok(())
    }
}

pub struct FakePortal {
    inner: Mutex<World>,
}

impl FakePortal {
    pub fn new(url: &str) -> Self {
        Self {
            inner: Mutex::new(World {
                url: url.to_string(),
                nodes: Vec::new(),
                on_click: HashMap::new(),
            }),
        }
    }

    pub fn add_node(&self, spec: NodeSpec) -> NodeId {
        let mut world = self.inner.lock().unwrap();
        world.nodes.push(spec.data);
        world.nodes.len() - 1
    }

    /// Queue an effect batch for the next click on `node`. Batches are
    /// consumed in order, one per click; further clicks are no-ops.
    pub fn on_click(&self, node: NodeId, effects: Vec<Effect>) {
        let mut world = self.inner.lock().unwrap();
        world.on_click.entry(node).or_default().push_back(effects);
    }

    pub fn url(&self) -> String {
        self.inner.lock().unwrap().url.clone()
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.inner.lock().unwrap().nodes[node].attrs.get(name).cloned()
    }
}

#[async_trait]
impl Dom for FakePortal {
    type Node = NodeId;

    async fn navigate(&self, url: &str) -> Result<()> {
        self.inner.lock().unwrap().url = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.url())
    }

    async fn find_all(&self, xpath: &str) -> Result<Vec<NodeId>> {
        let world = self.inner.lock().unwrap();
        Ok((0..world.nodes.len())
            .filter(|&id| {
                world.nodes[id].attached
                    && world.nodes[id].selectors.iter().any(|s| s == xpath)
            })
            .collect())
    }

    async fn find_all_in(&self, scope: &NodeId, xpath: &str) -> Result<Vec<NodeId>> {
        let world = self.inner.lock().unwrap();
        Ok((0..world.nodes.len())
            .filter(|&id| {
                world.nodes[id].attached
                    && world.nodes[id].selectors.iter().any(|s| s == xpath)
                    && world.is_descendant_of(id, *scope)
            })
            .collect())
    }

    async fn click(&self, node: &NodeId) -> Result<()> {
        let mut world = self.inner.lock().unwrap();
        let batch = world
            .on_click
            .get_mut(node)
            .and_then(|queue| queue.pop_front());
        if let Some(effects) = batch {
            for effect in effects {
                world.apply(effect)?;
            }
        }
        Ok(())
    }

    async fn clear(&self, node: &NodeId) -> Result<()> {
        let mut world = self.inner.lock().unwrap();
        world.nodes[*node].attrs.insert("value".to_string(), String::new());
        Ok(())
    }

    async fn set_value(&self, node: &NodeId, text: &str) -> Result<()> {
        let mut world = self.inner.lock().unwrap();
        world.nodes[*node]
            .attrs
            .insert("value".to_string(), text.to_string());
        Ok(())
    }

    async fn get_attribute(&self, node: &NodeId, name: &str) -> Result<Option<String>> {
        Ok(self.attr(*node, name))
    }

    async fn text(&self, node: &NodeId) -> Result<String> {
        let world = self.inner.lock().unwrap();
        world
            .nodes
            .get(*node)
            .map(|n| n.text.clone())
            .ok_or_else(|| anyhow!("unknown node {node}"))
    }

    async fn is_visible(&self, node: &NodeId) -> Result<bool> {
        let world = self.inner.lock().unwrap();
        Ok(world.nodes[*node].attached && world.nodes[*node].visible)
    }
}
