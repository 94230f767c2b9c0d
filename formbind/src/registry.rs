//! Form registry: named form descriptors and where their state lives.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::FormsConfig;
use crate::descriptor::FormDescriptor;
use crate::error::ConfigError;
use crate::path::StorePath;

/// A registered form and its location in the store.
#[derive(Debug, Clone)]
pub struct RegisteredForm {
    pub form: Arc<FormDescriptor>,
    pub store: StorePath,
}

/// Registry node: either a form or a group of nested names.
#[derive(Debug, Clone)]
enum Node {
    Form(RegisteredForm),
    Group(BTreeMap<String, Node>),
}

/// Table of forms keyed by dotted name (`"login"`, `"settings.profile"`).
///
/// The registry is an ordinary value. Build it at startup and hand it to
/// whatever needs form lookup, usually through
/// [`Services`](crate::services::Services).
#[derive(Debug, Clone, Default)]
pub struct FormRegistry {
    root: BTreeMap<String, Node>,
    config: FormsConfig,
}

fn split_name(name: &str) -> Result<Vec<&str>, ConfigError> {
    let segments: Vec<&str> = name.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(ConfigError::InvalidFormName {
            name: name.to_string(),
        });
    }
    Ok(segments)
}

impl FormRegistry {
    /// Create an empty registry with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with the given configuration.
    pub fn with_config(config: FormsConfig) -> Self {
        Self {
            root: BTreeMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &FormsConfig {
        &self.config
    }

    /// Register a form, replacing any form already registered under `name`.
    ///
    /// Every connector is checked against the configured required
    /// capabilities first; all gaps are reported in one error.
    pub fn register(
        &mut self,
        name: &str,
        form: impl Into<Arc<FormDescriptor>>,
        store: impl Into<StorePath>,
    ) -> Result<(), ConfigError> {
        let segments = split_name(name)?;
        let form = form.into();

        let missing = form.missing_capabilities(&self.config.required_capabilities);
        if !missing.is_empty() {
            return Err(ConfigError::MissingCapabilities {
                form: name.to_string(),
                fields: missing,
            });
        }

        let entry = RegisteredForm {
            form,
            store: store.into(),
        };

        let Some((last, parents)) = segments.split_last() else {
            return Err(ConfigError::InvalidFormName {
                name: name.to_string(),
            });
        };
        let mut group = &mut self.root;
        for segment in parents {
            let node = group
                .entry(segment.to_string())
                .or_insert_with(|| Node::Group(BTreeMap::new()));
            if let Node::Form(_) = node {
                log::warn!("Form \"{}\" replaced by a group while registering \"{}\"", segment, name);
                *node = Node::Group(BTreeMap::new());
            }
            group = match node {
                Node::Group(children) => children,
                Node::Form(_) => unreachable!("node was just replaced by a group"),
            };
        }
        if let Some(Node::Group(_)) = group.insert(last.to_string(), Node::Form(entry)) {
            log::warn!("Group \"{}\" replaced by a form", name);
        }

        log::info!("Registered form \"{}\"", name);
        Ok(())
    }

    /// Retrieve a registered form.
    pub fn get(&self, name: &str) -> Result<&RegisteredForm, ConfigError> {
        let not_found = || ConfigError::form_not_found(name);
        let segments = split_name(name).map_err(|_| not_found())?;

        let Some((last, parents)) = segments.split_last() else {
            return Err(not_found());
        };
        let mut group = &self.root;
        for segment in parents {
            match group.get(*segment) {
                Some(Node::Group(children)) => group = children,
                _ => return Err(not_found()),
            }
        }

        match group.get(*last) {
            Some(Node::Form(entry)) => Ok(entry),
            _ => Err(not_found()),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }

    /// Unregister one form, or every form when `name` is `None`.
    pub fn unregister(&mut self, name: Option<&str>) -> Result<(), ConfigError> {
        let Some(name) = name else {
            log::warn!("Unregistering all forms");
            self.root.clear();
            return Ok(());
        };

        self.get(name)?;
        let segments = split_name(name)?;
        remove_path(&mut self.root, &segments);
        log::debug!("Unregistered form \"{}\"", name);
        Ok(())
    }

    /// All registered dotted names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names = Vec::new();
        collect_names(&self.root, "", &mut names);
        names
    }

    pub fn len(&self) -> usize {
        self.names().len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

/// Remove the leaf at `segments`, pruning groups left empty.
fn remove_path(group: &mut BTreeMap<String, Node>, segments: &[&str]) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };
    if rest.is_empty() {
        group.remove(*first);
        return;
    }
    if let Some(Node::Group(children)) = group.get_mut(*first) {
        remove_path(children, rest);
        if children.is_empty() {
            group.remove(*first);
        }
    }
}

fn collect_names(group: &BTreeMap<String, Node>, prefix: &str, out: &mut Vec<String>) {
    for (key, node) in group {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match node {
            Node::Form(_) => out.push(name),
            Node::Group(children) => collect_names(children, &name, out),
        }
    }
}
