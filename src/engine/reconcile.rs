//! Reconciliation - bringing an element in line with a widget.
//!
//! # Algorithm
//!
//! [`rebuild`] decides, in order:
//!
//! 1. Element never built: build it.
//! 2. Widget type differs from the stored one: destroy the subtree, then
//!    build fresh.
//! 3. Element marked dirty by a state change: build it.
//! 4. Widget value differs: schedule a repaint and build it.
//! 5. Constraints differ: build it (re-layout).
//! 6. Otherwise skip this element and let each child check itself against
//!    its stored widget and constraints.
//!
//! A failed build leaves the element marked dirty, so the next pass builds it
//! again even when nothing else changed.
//!
//! "Build" means calling `build` for a stateful widget (its single child is
//! then reconciled under the same constraints) or `layout` for a render
//! widget (which reconciles each child it asks for).
//!
//! [`render`] then walks the tree, repaints render elements whose cached
//! canvas is stale, and composites children over their parent in layout
//! order.

use std::collections::BTreeMap;

use crossterm::event::Event;
use tracing::{debug, trace};

use super::element::Element;
use super::hooks::{self, EventContext, Listener};
use super::widget::{LayoutContext, PaintContext, RenderWidget, StatefulWidget, Widget, WidgetIdentity};
use crate::error::{Error, Result};
use crate::layout::{Constraints, Pos};
use crate::renderer::Canvas;

// =============================================================================
// Rebuild
// =============================================================================

/// Reconcile `element` against `widget` under `constraints`.
pub(crate) fn rebuild(element: &mut Element, widget: &Widget, constraints: Constraints) -> Result<()> {
    let dirty = element.hooks.take_needs_build();

    if element.initialized {
        if let Some(stored) = element.widget.clone() {
            if !stored.same_type(widget) {
                debug!(from = stored.name(), to = widget.name(), "widget type changed, replacing subtree");
                destroy(element);
                return build_or_retry(element, widget, constraints);
            }

            if !dirty {
                if stored != *widget {
                    element.needs_paint = true;
                } else if constraints == element.constraints {
                    for (_, child) in element.children.iter_mut() {
                        let (Some(child_widget), child_constraints) = (child.widget.clone(), child.constraints) else {
                            continue;
                        };
                        rebuild(child, &child_widget, child_constraints)?;
                    }
                    return Ok(());
                }
            }
        }
    }

    build_or_retry(element, widget, constraints)
}

fn build_or_retry(element: &mut Element, widget: &Widget, constraints: Constraints) -> Result<()> {
    let result = build(element, widget, constraints);
    if result.is_err() {
        element.hooks.mark_needs_build();
    }
    result
}

fn build(element: &mut Element, widget: &Widget, constraints: Constraints) -> Result<()> {
    element.widget = Some(widget.clone());
    element.constraints = constraints;
    match widget {
        Widget::Stateful(stateful) => build_stateful(element, stateful.as_ref(), constraints),
        Widget::Render(render) => layout_render(element, render.as_ref(), constraints),
    }
}

fn build_stateful(element: &mut Element, widget: &dyn StatefulWidget, constraints: Constraints) -> Result<()> {
    let name = widget.widget_name();
    trace!(widget = name, "build");

    let (child_widget, declared) = hooks::with_hooks(&element.hooks, || widget.build());
    let child_widget = child_widget?;

    element.listeners = declared.listeners;
    hooks::reconcile_effects(&mut element.effects, declared.effects, !element.initialized, name)?;
    element.initialized = true;

    if element.children.is_empty() {
        element.children.push((0, Element::default()));
    }
    let (_, child) = &mut element.children[0];
    rebuild(child, &child_widget, constraints)?;
    element.size = child.size;
    Ok(())
}

fn layout_render(element: &mut Element, widget: &dyn RenderWidget, constraints: Constraints) -> Result<()> {
    let name = widget.widget_name();
    trace!(widget = name, %constraints, "layout");

    let previous: BTreeMap<usize, Element> = element.children.drain(..).collect();
    let mut ctx = LayoutContext::new(name, constraints, previous);
    let result = widget.layout(&mut ctx).and_then(|size| {
        if constraints.is_satisfied_by(size) {
            Ok(size)
        } else {
            Err(Error::ConstraintViolation {
                widget: name,
                constraints,
                actual: size,
            })
        }
    });
    let (laid_out, leftover) = ctx.into_parts();

    let size = match result {
        Ok(size) => size,
        Err(err) => {
            // Nothing is pruned on failure
            element.children = laid_out;
            element.children.extend(leftover);
            return Err(err);
        }
    };

    for (key, mut child) in leftover {
        debug!(widget = name, key, child = child.name(), "pruning child");
        destroy(&mut child);
    }

    element.children = laid_out;
    element.size = size;
    element.needs_paint = true;
    element.initialized = true;
    Ok(())
}

// =============================================================================
// Destroy
// =============================================================================

/// Tear down a subtree: children first, then this element's cleanups, then
/// reset the element to a fresh default.
pub(crate) fn destroy(element: &mut Element) {
    for (_, child) in element.children.iter_mut() {
        destroy(child);
    }
    hooks::run_cleanups(&mut element.effects);
    *element = Element::default();
}

// =============================================================================
// Render
// =============================================================================

/// Paint stale render elements and composite the subtree at `origin`.
pub(crate) fn render(element: &mut Element, origin: Pos) -> Result<Canvas> {
    element.abs_pos = origin;

    let Some(widget) = element.widget.clone() else {
        return Ok(Canvas::default());
    };

    match widget {
        Widget::Stateful(_) => match element.children.first_mut() {
            Some((_, child)) => {
                let at = origin + child.pos;
                render(child, at)
            }
            None => Ok(Canvas::default()),
        },
        Widget::Render(render_widget) => {
            if element.needs_paint || element.painted.is_none() {
                let painted = paint(element, render_widget.as_ref())?;
                element.painted = Some(painted);
                element.needs_paint = false;
            }
            let mut canvas = element.painted.clone().unwrap_or_default();

            for (_, child) in element.children.iter_mut() {
                let at = child.pos;
                let child_canvas = render(child, origin + at)?;
                canvas.overlay(at, &child_canvas);
            }
            Ok(canvas)
        }
    }
}

fn paint(element: &Element, widget: &dyn RenderWidget) -> Result<Canvas> {
    let name = widget.widget_name();
    let mut canvas = Canvas::for_size(element.size).ok_or(Error::UnboundedCanvas {
        widget: name,
        size: element.size,
    })?;
    trace!(widget = name, size = %element.size, "paint");
    widget.paint(&mut PaintContext::new(&mut canvas, element.size))?;
    Ok(canvas)
}

// =============================================================================
// Events
// =============================================================================

/// A listener paired with the context it will be called with.
#[derive(Clone)]
pub struct ListenerCall {
    listener: Listener,
    context: EventContext,
}

impl ListenerCall {
    pub fn context(&self) -> &EventContext {
        &self.context
    }

    pub fn invoke(&self) {
        (self.listener)(&self.context);
    }
}

/// Collect every listener of the subtree, parents before children.
pub(crate) fn collect_listeners(element: &Element, event: &Event, out: &mut Vec<ListenerCall>) {
    for listener in &element.listeners {
        out.push(ListenerCall {
            listener: listener.clone(),
            context: EventContext {
                event: event.clone(),
                position: element.abs_pos,
                size: element.size,
            },
        });
    }
    for (_, child) in &element.children {
        collect_listeners(child, event, out);
    }
}
