use std::fmt;

use pm_ui_types::FieldRules;

/// A markup tree the field manager can operate on.
///
/// Lookups never fail loudly: a missing element is `None`. Mutations report
/// host failures through `Self::Error`.
pub trait FieldHost {
    type Node: Clone;
    type Fragment;
    type Error: fmt::Display;

    /// Live element with the given `id`. Template content is not searched.
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Deep copy of a template's content, or `None` if `template` is not a
    /// template element.
    fn instantiate(&mut self, template: &Self::Node) -> Result<Option<Self::Fragment>, Self::Error>;

    /// Direct element children, in order.
    fn children(&self, container: &Self::Node) -> Vec<Self::Node>;

    fn child_count(&self, container: &Self::Node) -> usize {
        self.children(container).len()
    }

    /// Input-capable descendants of a fragment, in document order.
    fn fragment_fields(&self, fragment: &Self::Fragment, rules: &FieldRules) -> Vec<Self::Node>;

    /// Input-capable elements under a live element, the element itself
    /// included, in document order.
    fn element_fields(&self, element: &Self::Node, rules: &FieldRules) -> Vec<Self::Node>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str) -> Result<(), Self::Error>;

    /// Move the fragment's top-level nodes to the end of `container`.
    fn append(&mut self, container: &Self::Node, fragment: Self::Fragment) -> Result<(), Self::Error>;

    /// Nearest inclusive ancestor carrying the group class.
    fn closest_group(&self, node: &Self::Node, rules: &FieldRules) -> Option<Self::Node>;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Detach `node` from its parent and release it.
    fn detach(&mut self, node: &Self::Node) -> Result<(), Self::Error>;
}
