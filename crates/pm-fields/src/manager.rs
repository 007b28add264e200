use pm_ui_types::FieldRules;
use tracing::{debug, warn};

use crate::error::FieldError;
use crate::host::FieldHost;
use crate::path::FieldPath;

/// Result of a successful add.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Added {
    /// Index written into the new group's field names.
    pub index: usize,
    /// Field names that carried a bracketed index.
    pub reindexed: usize,
}

/// Result of a successful remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removed {
    /// Field names reindexed by renumbering; zero unless enabled.
    pub reindexed: usize,
}

/// Adds and removes repeatable field groups on a host tree.
pub struct FieldManager<H> {
    host: H,
    rules: FieldRules,
}

impl<H> FieldManager<H>
where
    H: FieldHost,
{
    pub fn new(host: H, rules: FieldRules) -> Self {
        Self { host, rules }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn rules(&self) -> &FieldRules {
        &self.rules
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Instantiate `template_id` at the end of `container_id`.
    ///
    /// Both ids are resolved and the copy is fully renamed before anything is
    /// appended, so an error never leaves the tree half-modified.
    pub fn try_add(&mut self, container_id: &str, template_id: &str) -> Result<Added, FieldError> {
        let container = self
            .host
            .element_by_id(container_id)
            .ok_or_else(|| FieldError::ContainerNotFound(container_id.to_owned()))?;
        let template = self
            .host
            .element_by_id(template_id)
            .ok_or_else(|| FieldError::TemplateNotFound(template_id.to_owned()))?;

        let fragment = self
            .host
            .instantiate(&template)
            .map_err(host_error)?
            .ok_or_else(|| FieldError::NotATemplate(template_id.to_owned()))?;

        let index = self.host.child_count(&container);
        let mut renamed = 0;
        for field in self.host.fragment_fields(&fragment, &self.rules) {
            if rename_field(&mut self.host, &field, index)? {
                renamed += 1;
            }
        }

        self.host.append(&container, fragment).map_err(host_error)?;
        Ok(Added { index, reindexed: renamed })
    }

    /// Quiet form of [`try_add`](Self::try_add): failures are only logged.
    pub fn add(&mut self, container_id: &str, template_id: &str) -> Option<Added> {
        match self.try_add(container_id, template_id) {
            Ok(added) => {
                debug!(
                    container_id,
                    index = added.index,
                    reindexed = added.reindexed,
                    "form field added"
                );
                Some(added)
            }
            Err(err @ FieldError::Host(_)) => {
                warn!(container_id, template_id, %err, "add form field failed");
                None
            }
            Err(err) => {
                debug!(container_id, template_id, %err, "add form field skipped");
                None
            }
        }
    }

    /// Detach the field group enclosing `node` (inclusive).
    pub fn try_remove(&mut self, node: &H::Node) -> Result<Removed, FieldError> {
        let group = self
            .host
            .closest_group(node, &self.rules)
            .ok_or(FieldError::NoEnclosingGroup)?;
        let container = self.host.parent(&group);

        self.host.detach(&group).map_err(host_error)?;

        let renamed = match container {
            Some(container) if self.rules.renumber_on_remove => self.renumber_node(&container)?,
            _ => 0,
        };
        Ok(Removed { reindexed: renamed })
    }

    pub fn remove(&mut self, node: &H::Node) -> Option<Removed> {
        match self.try_remove(node) {
            Ok(removed) => {
                debug!(reindexed = removed.reindexed, "form field removed");
                Some(removed)
            }
            Err(err @ FieldError::Host(_)) => {
                warn!(%err, "remove form field failed");
                None
            }
            Err(err) => {
                debug!(%err, "remove form field skipped");
                None
            }
        }
    }

    /// Reindex every direct child of `container_id` to its position.
    pub fn try_renumber(&mut self, container_id: &str) -> Result<usize, FieldError> {
        let container = self
            .host
            .element_by_id(container_id)
            .ok_or_else(|| FieldError::ContainerNotFound(container_id.to_owned()))?;
        self.renumber_node(&container)
    }

    pub fn renumber(&mut self, container_id: &str) -> Option<usize> {
        match self.try_renumber(container_id) {
            Ok(renamed) => {
                debug!(container_id, reindexed = renamed, "form fields renumbered");
                Some(renamed)
            }
            Err(err @ FieldError::Host(_)) => {
                warn!(container_id, %err, "renumber form fields failed");
                None
            }
            Err(err) => {
                debug!(container_id, %err, "renumber form fields skipped");
                None
            }
        }
    }

    fn renumber_node(&mut self, container: &H::Node) -> Result<usize, FieldError> {
        let mut renamed = 0;
        for (index, group) in self.host.children(container).iter().enumerate() {
            for field in self.host.element_fields(group, &self.rules) {
                if rename_field(&mut self.host, &field, index)? {
                    renamed += 1;
                }
            }
        }
        Ok(renamed)
    }
}

/// Point an indexed field name at `index`. Returns whether the name carried
/// a bracketed index at all.
fn rename_field<H: FieldHost>(host: &mut H, field: &H::Node, index: usize) -> Result<bool, FieldError> {
    let Some(name) = host.attribute(field, "name") else {
        return Ok(false);
    };
    let Some(path) = FieldPath::parse(&name) else {
        return Ok(false);
    };
    let renamed = path.with_index(index);
    if renamed != name {
        host.set_attribute(field, "name", &renamed).map_err(host_error)?;
    }
    Ok(true)
}

fn host_error(err: impl std::fmt::Display) -> FieldError {
    FieldError::Host(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Fragment, MemoryTree, NodeId};
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer};
    use tracing_subscriber::prelude::*;

    /// Page with an empty `#items` container and an `#item-tpl` template
    /// whose group holds one input per name.
    fn page(names: &[&str]) -> (FieldManager<MemoryTree>, NodeId) {
        page_with_rules(names, FieldRules::default())
    }

    fn page_with_rules(names: &[&str], rules: FieldRules) -> (FieldManager<MemoryTree>, NodeId) {
        let mut tree = MemoryTree::new();
        let root = tree.root();

        let container = tree.element("div", &[("id", "items")]);
        tree.append_child(root, container).unwrap();

        let tpl = tree.create_template();
        tree.set_attr(tpl, "id", "item-tpl").unwrap();
        let group = tree.element("div", &[("class", "form-group")]);
        for name in names {
            let input = tree.element("input", &[("name", *name)]);
            tree.append_child(group, input).unwrap();
        }
        let button = tree.element("button", &[("class", "btn-remove")]);
        tree.append_child(group, button).unwrap();
        tree.append_to_template(tpl, group).unwrap();
        tree.append_child(root, tpl).unwrap();

        (FieldManager::new(tree, rules), container)
    }

    fn names_in(tree: &MemoryTree, group: NodeId) -> Vec<String> {
        tree.element_fields(&group, &FieldRules::default())
            .into_iter()
            .filter_map(|f| tree.attr(f, "name").map(str::to_owned))
            .collect()
    }

    fn groups(m: &FieldManager<MemoryTree>, container: NodeId) -> Vec<NodeId> {
        m.host().element_children(container)
    }

    #[test]
    fn add_indexes_at_child_count() {
        let (mut m, items) = page(&["price[0]"]);

        let first = m.add("items", "item-tpl").unwrap();
        let second = m.add("items", "item-tpl").unwrap();

        assert_eq!(first, Added { index: 0, reindexed: 1 });
        assert_eq!(second, Added { index: 1, reindexed: 1 });
        let g = groups(&m, items);
        assert_eq!(g.len(), 2);
        assert_eq!(names_in(m.host(), g[0]), vec!["price[0]"]);
        assert_eq!(names_in(m.host(), g[1]), vec!["price[1]"]);
    }

    #[test]
    fn add_counts_existing_server_rendered_children() {
        let (mut m, items) = page(&["specs[0].key", "specs[0].value", "note"]);
        for _ in 0..3 {
            let tree = m.host_mut();
            let existing = tree.element("div", &[("class", "form-group")]);
            tree.append_child(items, existing).unwrap();
        }

        let added = m.add("items", "item-tpl").unwrap();

        assert_eq!(added, Added { index: 3, reindexed: 2 });
        let g = groups(&m, items);
        assert_eq!(g.len(), 4);
        assert_eq!(names_in(m.host(), g[3]), vec!["specs[3].key", "specs[3].value", "note"]);
    }

    #[test]
    fn add_leaves_template_untouched() {
        let (mut m, _) = page(&["price[0]"]);
        m.add("items", "item-tpl").unwrap();
        m.add("items", "item-tpl").unwrap();

        let tpl = m.host().get_element_by_id("item-tpl").unwrap();
        assert!(m.host().inner_html(tpl).contains(r#"name="price[0]""#));
    }

    #[test]
    fn add_rewrites_select_and_textarea_but_not_other_tags() {
        let mut tree = MemoryTree::new();
        let root = tree.root();
        let items = tree.element("div", &[("id", "items")]);
        tree.append_child(root, items).unwrap();
        let tpl = tree.create_template();
        tree.set_attr(tpl, "id", "tpl").unwrap();
        let group = tree.element("div", &[("class", "form-group")]);
        for tag in ["select", "textarea", "output"] {
            let el = tree.element(tag, &[("name", "rows[0].x")]);
            tree.append_child(group, el).unwrap();
        }
        tree.append_to_template(tpl, group).unwrap();
        tree.append_child(root, tpl).unwrap();
        let existing = tree.element("div", &[("class", "form-group")]);
        tree.append_child(items, existing).unwrap();

        let mut m = FieldManager::new(tree, FieldRules::default());
        assert_eq!(m.add("items", "tpl"), Some(Added { index: 1, reindexed: 2 }));

        let html = m.host().inner_html(items);
        assert!(html.contains(r#"<select name="rows[1].x">"#));
        assert!(html.contains(r#"<textarea name="rows[1].x">"#));
        assert!(html.contains(r#"<output name="rows[0].x">"#));
    }

    #[test]
    fn add_with_unknown_ids_changes_nothing() {
        let (mut m, items) = page(&["price[0]"]);
        m.add("items", "item-tpl").unwrap();
        let before = m.host().to_html(m.host().root());
        let live = m.host().live_nodes();

        assert_eq!(
            m.try_add("missing", "item-tpl"),
            Err(FieldError::ContainerNotFound("missing".into()))
        );
        assert_eq!(
            m.try_add("items", "missing"),
            Err(FieldError::TemplateNotFound("missing".into()))
        );
        assert_eq!(m.add("nope", "nope"), None);

        assert_eq!(m.host().to_html(m.host().root()), before);
        assert_eq!(m.host().live_nodes(), live);
        assert_eq!(groups(&m, items).len(), 1);
    }

    #[test]
    fn add_with_non_template_is_rejected() {
        let (mut m, _) = page(&["price[0]"]);
        assert_eq!(
            m.try_add("items", "items"),
            Err(FieldError::NotATemplate("items".into()))
        );
    }

    #[test]
    fn remove_from_nested_input_drops_whole_group() {
        let (mut m, items) = page(&["price[0]"]);
        m.add("items", "item-tpl").unwrap();
        m.add("items", "item-tpl").unwrap();
        let first = groups(&m, items)[0];
        let input = m.host().element_fields(&first, &FieldRules::default())[0];

        assert_eq!(m.remove(&input), Some(Removed { reindexed: 0 }));

        let g = groups(&m, items);
        assert_eq!(g.len(), 1);
        assert_eq!(names_in(m.host(), g[0]), vec!["price[1]"]);
        assert!(!m.host().contains(first));
        assert!(!m.host().contains(input));
    }

    #[test]
    fn remove_from_button_inside_group() {
        let (mut m, items) = page(&["price[0]"]);
        m.add("items", "item-tpl").unwrap();
        let group = groups(&m, items)[0];
        let button = *m.host().element_children(group).last().unwrap();
        assert_eq!(m.host().tag(button), Some("button"));

        assert!(m.remove(&button).is_some());
        assert!(groups(&m, items).is_empty());
    }

    #[test]
    fn remove_outside_any_group_is_noop() {
        let (mut m, items) = page(&["price[0]"]);
        m.add("items", "item-tpl").unwrap();
        let root = m.host().root();
        let unrelated = m.host_mut().element("span", &[]);
        m.host_mut().append_child(root, unrelated).unwrap();
        let before = m.host().to_html(root);

        assert_eq!(m.try_remove(&items), Err(FieldError::NoEnclosingGroup));
        assert_eq!(m.remove(&unrelated), None);
        assert_eq!(m.host().to_html(root), before);
    }

    #[test]
    fn removal_keeps_sparse_indices_by_default() {
        let (mut m, items) = page(&["price[0]"]);
        for _ in 0..3 {
            m.add("items", "item-tpl").unwrap();
        }
        let middle = groups(&m, items)[1];
        m.remove(&middle).unwrap();

        let g = groups(&m, items);
        assert_eq!(names_in(m.host(), g[0]), vec!["price[0]"]);
        assert_eq!(names_in(m.host(), g[1]), vec!["price[2]"]);

        // Next add uses the child count, colliding with the survivor.
        assert_eq!(m.add("items", "item-tpl").unwrap().index, 2);
    }

    #[test]
    fn removal_renumbers_when_enabled() {
        let rules = FieldRules {
            renumber_on_remove: true,
            ..FieldRules::default()
        };
        let (mut m, items) = page_with_rules(&["price[0]"], rules);
        m.add("items", "item-tpl").unwrap();
        m.add("items", "item-tpl").unwrap();
        let first_input = {
            let first = groups(&m, items)[0];
            m.host().element_fields(&first, &FieldRules::default())[0]
        };

        assert_eq!(m.remove(&first_input), Some(Removed { reindexed: 1 }));

        let g = groups(&m, items);
        assert_eq!(g.len(), 1);
        assert_eq!(names_in(m.host(), g[0]), vec!["price[0]"]);
    }

    #[test]
    fn renumber_closes_gaps() {
        let (mut m, items) = page(&["a[0]", "b[0][0]"]);
        for _ in 0..4 {
            m.add("items", "item-tpl").unwrap();
        }
        let g = groups(&m, items);
        m.remove(&g[0]).unwrap();
        m.remove(&g[2]).unwrap();

        assert_eq!(m.renumber("items"), Some(4));
        let g = groups(&m, items);
        assert_eq!(names_in(m.host(), g[0]), vec!["a[0]", "b[0][0]"]);
        assert_eq!(names_in(m.host(), g[1]), vec!["a[1]", "b[1][0]"]);
        assert_eq!(m.renumber("missing"), None);
    }

    #[test]
    fn add_add_remove_first_keeps_second_index() {
        let (mut m, items) = page(&["price[0]"]);
        m.add("items", "item-tpl").unwrap();
        assert_eq!(names_in(m.host(), groups(&m, items)[0]), vec!["price[0]"]);
        m.add("items", "item-tpl").unwrap();
        assert_eq!(names_in(m.host(), groups(&m, items)[1]), vec!["price[1]"]);

        let first = groups(&m, items)[0];
        let input = m.host().element_fields(&first, &FieldRules::default())[0];
        m.remove(&input).unwrap();

        let g = groups(&m, items);
        assert_eq!(g.len(), 1);
        assert_eq!(names_in(m.host(), g[0]), vec!["price[1]"]);
    }

    #[test]
    fn remove_never_escapes_template_content() {
        // A template nested in a live group, holding a bare input.
        let mut tree = MemoryTree::new();
        let root = tree.root();
        let outer = tree.element("div", &[("class", "form-group")]);
        tree.append_child(root, outer).unwrap();
        let tpl = tree.create_template();
        tree.set_attr(tpl, "id", "tpl").unwrap();
        let input = tree.element("input", &[("name", "price[0]")]);
        tree.append_to_template(tpl, input).unwrap();
        tree.append_child(outer, tpl).unwrap();

        let mut m = FieldManager::new(tree, FieldRules::default());
        assert_eq!(m.try_remove(&input), Err(FieldError::NoEnclosingGroup));
        assert!(m.host().contains(outer));
        assert_eq!(m.host().template_content(tpl), vec![input]);
    }

    #[test]
    fn removing_a_template_group_keeps_adds_working() {
        let (mut m, items) = page(&["price[0]"]);
        let tpl = m.host().get_element_by_id("item-tpl").unwrap();
        let group = m.host().template_content(tpl)[0];

        assert!(m.remove(&group).is_some());
        assert_eq!(m.host().inner_html(tpl), "");
        assert_eq!(
            m.try_add("items", "item-tpl"),
            Ok(Added {
                index: 0,
                reindexed: 0
            })
        );
        assert!(groups(&m, items).is_empty());
    }

    /// Records the level and message of every event.
    #[derive(Clone, Default)]
    struct Recorded(Arc<Mutex<Vec<(Level, String)>>>);

    struct Message(String);

    impl Visit for Message {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{value:?}");
            }
        }
    }

    impl<S: Subscriber> Layer<S> for Recorded {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut message = Message(String::new());
            event.record(&mut message);
            self.0.lock().unwrap().push((*event.metadata().level(), message.0));
        }
    }

    impl Recorded {
        fn events(&self) -> Vec<(Level, String)> {
            self.0.lock().unwrap().clone()
        }
    }

    /// Rejects every attribute write.
    struct ReadOnly(MemoryTree);

    impl FieldHost for ReadOnly {
        type Node = NodeId;
        type Fragment = Fragment;
        type Error = String;

        fn element_by_id(&self, id: &str) -> Option<NodeId> {
            self.0.element_by_id(id)
        }

        fn instantiate(&mut self, template: &NodeId) -> Result<Option<Fragment>, String> {
            self.0.instantiate(template).map_err(|e| e.to_string())
        }

        fn children(&self, container: &NodeId) -> Vec<NodeId> {
            self.0.children(container)
        }

        fn fragment_fields(&self, fragment: &Fragment, rules: &FieldRules) -> Vec<NodeId> {
            self.0.fragment_fields(fragment, rules)
        }

        fn element_fields(&self, element: &NodeId, rules: &FieldRules) -> Vec<NodeId> {
            self.0.element_fields(element, rules)
        }

        fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
            self.0.attribute(node, name)
        }

        fn set_attribute(&mut self, _: &NodeId, _: &str, _: &str) -> Result<(), String> {
            Err("read-only".to_owned())
        }

        fn append(&mut self, container: &NodeId, fragment: Fragment) -> Result<(), String> {
            self.0.append(container, fragment).map_err(|e| e.to_string())
        }

        fn closest_group(&self, node: &NodeId, rules: &FieldRules) -> Option<NodeId> {
            self.0.closest_group(node, rules)
        }

        fn parent(&self, node: &NodeId) -> Option<NodeId> {
            self.0.parent(node)
        }

        fn detach(&mut self, node: &NodeId) -> Result<(), String> {
            self.0.detach(node).map_err(|e| e.to_string())
        }
    }

    #[test]
    fn quiet_forms_report_through_tracing() {
        let recorded = Recorded::default();
        let subscriber = tracing_subscriber::registry().with(recorded.clone());

        tracing::subscriber::with_default(subscriber, || {
            let (mut m, items) = page(&["price[0]"]);
            m.add("items", "item-tpl");
            m.add("missing", "item-tpl");
            let group = groups(&m, items)[0];
            m.remove(&group);
            m.remove(&items);
            m.renumber("items");
        });

        assert_eq!(
            recorded.events(),
            vec![
                (Level::DEBUG, "form field added".to_owned()),
                (Level::DEBUG, "add form field skipped".to_owned()),
                (Level::DEBUG, "form field removed".to_owned()),
                (Level::DEBUG, "remove form field skipped".to_owned()),
                (Level::DEBUG, "form fields renumbered".to_owned()),
            ]
        );
    }

    #[test]
    fn host_failure_warns_and_appends_nothing() {
        let (m, items) = page(&["price[0]"]);
        let mut m = FieldManager::new(ReadOnly(m.into_host()), FieldRules::default());
        let recorded = Recorded::default();
        let subscriber = tracing_subscriber::registry().with(recorded.clone());

        let added = tracing::subscriber::with_default(subscriber, || m.add("items", "item-tpl"));

        assert_eq!(added, None);
        assert_eq!(
            recorded.events(),
            vec![(Level::WARN, "add form field failed".to_owned())]
        );
        assert_eq!(
            m.try_add("items", "item-tpl"),
            Err(FieldError::Host("read-only".to_owned()))
        );
        assert!(m.host().0.element_children(items).is_empty());
    }

    #[test]
    fn custom_group_class() {
        let rules = FieldRules {
            group_class: "attr-row".into(),
            ..FieldRules::default()
        };
        let mut tree = MemoryTree::new();
        let root = tree.root();
        let row = tree.element("tr", &[("class", "attr-row")]);
        let cell = tree.element("td", &[]);
        let input = tree.element("input", &[("name", "attrs[0]")]);
        tree.append_child(root, row).unwrap();
        tree.append_child(row, cell).unwrap();
        tree.append_child(cell, input).unwrap();

        let mut m = FieldManager::new(tree, rules);
        assert!(m.remove(&input).is_some());
        assert!(m.host().element_children(root).is_empty());
    }
}
