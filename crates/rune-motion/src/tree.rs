//! Node capabilities and an in-memory element tree.
//!
//! The engine needs three things from a host tree: ordered children, an
//! optional pre-parsed marker per node, and somewhere to write the composed
//! transform. [`MotionNode`] and [`StyleSink`] describe exactly that.
//! [`Element`] is a small reference-counted implementation used by the demo and
//! by tests.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::state::PartialState;
use crate::transform::ComposedTransform;
use crate::variant::AnimationTarget;

/// A node's animation marker: a variant name or literal geometry.
///
/// Only geometry (x, y, scale, rotate) is consumed during propagation.
pub type Marker = AnimationTarget;

/// Receives every composed transform for one node.
pub trait StyleSink {
    fn write_style(&self, transform: &ComposedTransform);
}

/// What the engine requires of a host tree node.
pub trait MotionNode: Clone + 'static {
    /// Direct children, in document order.
    fn children(&self) -> Vec<Self>;

    /// The node's marker, if it has one.
    fn marker(&self) -> Option<Marker>;

    /// Where composed transforms for this node are written.
    fn style_sink(&self) -> Rc<dyn StyleSink>;
}

struct ElementInner {
    id: String,
    children: RefCell<Vec<Element>>,
    marker: RefCell<Option<Marker>>,
    style: Cell<Option<ComposedTransform>>,
    writes: Cell<usize>,
}

/// A reference-counted element. Cloning shares the node.
#[derive(Clone)]
pub struct Element {
    inner: Rc<ElementInner>,
}

impl Element {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(ElementInner {
                id: id.into(),
                children: RefCell::new(Vec::new()),
                marker: RefCell::new(None),
                style: Cell::new(None),
                writes: Cell::new(0),
            }),
        }
    }

    pub fn with_marker(self, marker: impl Into<Marker>) -> Self {
        self.set_marker(Some(marker.into()));
        self
    }

    pub fn with_child(self, child: Element) -> Self {
        self.append_child(child);
        self
    }

    pub fn append_child(&self, child: Element) {
        self.inner.children.borrow_mut().push(child);
    }

    pub fn set_marker(&self, marker: Option<Marker>) {
        *self.inner.marker.borrow_mut() = marker;
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// The last transform written to this element.
    pub fn style(&self) -> Option<ComposedTransform> {
        self.inner.style.get()
    }

    /// Number of style writes received.
    pub fn style_writes(&self) -> usize {
        self.inner.writes.get()
    }

    /// Depth-first search of this subtree by id.
    pub fn find(&self, id: &str) -> Option<Element> {
        if self.id() == id {
            return Some(self.clone());
        }
        self.inner
            .children
            .borrow()
            .iter()
            .find_map(|child| child.find(id))
    }

    pub fn ptr_eq(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.inner.id)
            .field("children", &self.inner.children.borrow().len())
            .field("marker", &*self.inner.marker.borrow())
            .finish()
    }
}

impl StyleSink for Element {
    fn write_style(&self, transform: &ComposedTransform) {
        self.inner.style.set(Some(*transform));
        self.inner.writes.set(self.inner.writes.get() + 1);
    }
}

impl MotionNode for Element {
    fn children(&self) -> Vec<Self> {
        self.inner.children.borrow().clone()
    }

    fn marker(&self) -> Option<Marker> {
        self.inner.marker.borrow().clone()
    }

    fn style_sink(&self) -> Rc<dyn StyleSink> {
        Rc::new(self.clone())
    }
}

/// Literal geometry marker.
pub fn geometry_marker(state: PartialState) -> Marker {
    AnimationTarget::Literal(state.geometry())
}
