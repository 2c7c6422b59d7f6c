//! ElementTree - the root of a mounted widget tree.
//!
//! One frame is `reconcile` followed by `render`. [`ElementTree::frame`]
//! does both with tight constraints for a viewport, which is what the frame
//! loop calls every tick.

use std::fmt::Write as _;

use crossterm::event::Event;
use tracing::debug;

use super::element::Element;
use super::reconcile::{self, ListenerCall};
use super::widget::Widget;
use crate::error::Result;
use crate::layout::{Constraints, Pos, Size};
use crate::renderer::Canvas;

/// Owner of the root element.
///
/// Dropping the tree destroys it, so every pending cleanup runs exactly once.
#[derive(Debug, Default)]
pub struct ElementTree {
    root: Element,
}

impl ElementTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Whether a widget has been built into the root.
    pub fn is_mounted(&self) -> bool {
        self.root.initialized
    }

    /// Reconcile the root against `widget`.
    pub fn reconcile(&mut self, widget: &Widget, constraints: Constraints) -> Result<()> {
        reconcile::rebuild(&mut self.root, widget, constraints)
    }

    /// Paint and composite the whole tree.
    pub fn render(&mut self) -> Result<Canvas> {
        reconcile::render(&mut self.root, Pos::ORIGIN)
    }

    /// Reconcile `widget` to exactly fill `viewport`, then render.
    pub fn frame(&mut self, widget: &Widget, viewport: Size) -> Result<Canvas> {
        self.reconcile(widget, viewport.tight())?;
        self.render()
    }

    /// Every listener in the tree with the context it should receive.
    ///
    /// Positions are those of the last render.
    pub fn listeners_for(&self, event: &Event) -> Vec<ListenerCall> {
        let mut calls = Vec::new();
        reconcile::collect_listeners(&self.root, event, &mut calls);
        calls
    }

    /// Call every listener synchronously. Returns how many were called.
    pub fn dispatch(&self, event: &Event) -> usize {
        let calls = self.listeners_for(event);
        for call in &calls {
            call.invoke();
        }
        calls.len()
    }

    /// Destroy the whole tree, running every cleanup.
    pub fn destroy(&mut self) {
        if self.root.initialized || !self.root.children.is_empty() {
            debug!(root = self.root.name(), "destroying element tree");
        }
        reconcile::destroy(&mut self.root);
    }

    /// Human-readable dump of the element tree.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        describe_element(&self.root, 0, &mut out);
        out
    }
}

impl Drop for ElementTree {
    fn drop(&mut self) {
        reconcile::destroy(&mut self.root);
    }
}

fn describe_element(element: &Element, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let _ = writeln!(out, "{indent}widget: {}", element.name());
    let _ = writeln!(out, "{indent}size: {}", element.size);
    let _ = writeln!(out, "{indent}position: {}", element.pos);
    let _ = writeln!(out, "{indent}constraints: {}", element.constraints);
    if let Some(widget) = &element.widget {
        let _ = writeln!(out, "{indent}props: {}", widget.props());
    }
    for (key, child) in &element.children {
        let _ = writeln!(out, "{indent}child {key}:");
        describe_element(child, depth + 1, out);
    }
}
