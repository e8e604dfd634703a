//! The translation catalog tree: Project → Package → Container → Key → Translation.
//!
//! Every parent owns its children in declaration order and indexes them by
//! their lower-cased name, so scoped lookups are plain case-insensitive
//! equality. Setting a translation to an empty string deletes it, and any
//! node left without children is removed from its parent.

use std::collections::HashMap;

use serde::{Serialize, Serializer};

use crate::error::Error;

/// The reserved language tag holding the untranslated source text of a key.
pub const ORIGINAL: &str = "Original";

/// Project name used when a document does not carry one.
pub const DEFAULT_PROJECT_NAME: &str = "My Project";

fn normalize(name: &str) -> String {
    name.to_lowercase()
}

/// Ordered children of one tree node, indexed by normalized name.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Children<T> {
    items: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for Children<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> Children<T> {
    fn get(&self, name: &str) -> Option<&T> {
        self.index.get(&normalize(name)).map(|&i| &self.items[i])
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        match self.index.get(&normalize(name)) {
            Some(&i) => self.items.get_mut(i),
            None => None,
        }
    }

    fn get_or_insert_with(&mut self, name: &str, create: impl FnOnce() -> T) -> &mut T {
        let key = normalize(name);
        let i = match self.index.get(&key) {
            Some(&i) => i,
            None => {
                self.items.push(create());
                let i = self.items.len() - 1;
                self.index.insert(key, i);
                i
            }
        };
        &mut self.items[i]
    }

    fn remove(&mut self, name: &str) -> Option<T> {
        let i = self.index.remove(&normalize(name))?;
        let item = self.items.remove(i);
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        Some(item)
    }

    fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    fn as_slice(&self) -> &[T] {
        &self.items
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Serialize> Serialize for Children<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

/// Root of the catalog, corresponds to the `<Project>` element of a stringtable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    name: String,
    packages: Children<Package>,
}

impl Default for Project {
    fn default() -> Self {
        Project::new(DEFAULT_PROJECT_NAME)
    }
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Project {
            name: name.into(),
            packages: Children::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.iter()
    }

    pub fn package(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Returns `true` if at least one key below this project has an
    /// [`ORIGINAL`] translation.
    pub fn is_exportable(&self) -> bool {
        self.packages().any(Package::is_exportable)
    }

    /// Number of keys in the whole project.
    pub fn key_count(&self) -> usize {
        self.packages()
            .flat_map(Package::containers)
            .map(|c| c.keys().count())
            .sum()
    }

    /// Distinct language tags in first-seen order.
    pub fn languages(&self) -> Vec<String> {
        let mut seen = Vec::<String>::new();
        for key in self.packages().flat_map(Package::containers).flat_map(Container::keys) {
            for translation in key.translations() {
                if !seen
                    .iter()
                    .any(|l| l.eq_ignore_ascii_case(translation.language()))
                {
                    seen.push(translation.language().to_string());
                }
            }
        }
        seen
    }

    /// Creates, updates or deletes the translation addressed by the path.
    ///
    /// Missing packages, containers and keys are created on the way down.
    /// An empty `text` deletes the translation instead and prunes every
    /// node that becomes empty, so it never creates nodes.
    pub fn set_translation(
        &mut self,
        package: &str,
        container: &str,
        key: &str,
        language: &str,
        text: &str,
    ) {
        if text.is_empty() {
            self.remove_translation(package, container, key, language);
            return;
        }
        self.packages
            .get_or_insert_with(package, || {
                tracing::debug!(package, "creating package");
                Package::new(package)
            })
            .set_translation(container, key, language, text);
    }

    /// Removes one translation, pruning any node left empty.
    pub fn remove_translation(
        &mut self,
        package: &str,
        container: &str,
        key: &str,
        language: &str,
    ) -> Option<Translation> {
        let p = self.packages.get_mut(package)?;
        let removed = p.remove_translation(container, key, language);
        if p.is_empty() {
            self.packages.remove(package);
        }
        removed
    }

    pub fn get_translation(
        &self,
        package: &str,
        container: &str,
        key: &str,
        language: &str,
    ) -> Option<&Translation> {
        self.packages
            .get(package)?
            .get_translation(container, key, language)
    }

    /// All translations of a key, empty if any path segment is absent.
    pub fn get_all_translations(&self, package: &str, container: &str, key: &str) -> &[Translation] {
        self.packages
            .get(package)
            .map(|p| p.get_all_translations(container, key))
            .unwrap_or_default()
    }

    /// Searches the whole project for a key with the given id, returning the
    /// first match in declaration order along with its owning path.
    pub fn find_key_recursive(&self, id: &str) -> Option<KeyMatch<'_>> {
        self.packages().find_map(|p| p.find_key_recursive(id))
    }

    /// Pretty-printed JSON of the whole tree.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A key located by a recursive search, together with the names of the
/// package and container that own it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMatch<'a> {
    pub package: &'a str,
    pub container: &'a str,
    pub key: &'a Key,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    name: String,
    containers: Children<Container>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Package {
            name: name.into(),
            containers: Children::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn containers(&self) -> impl Iterator<Item = &Container> {
        self.containers.iter()
    }

    pub fn container(&self, name: &str) -> Option<&Container> {
        self.containers.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    pub fn is_exportable(&self) -> bool {
        self.containers().any(Container::is_exportable)
    }

    pub fn set_translation(&mut self, container: &str, key: &str, language: &str, text: &str) {
        if text.is_empty() {
            self.remove_translation(container, key, language);
            return;
        }
        self.containers
            .get_or_insert_with(container, || {
                tracing::debug!(container, "creating container");
                Container::new(container)
            })
            .set_translation(key, language, text);
    }

    pub fn remove_translation(
        &mut self,
        container: &str,
        key: &str,
        language: &str,
    ) -> Option<Translation> {
        let c = self.containers.get_mut(container)?;
        let removed = c.remove_translation(key, language);
        if c.is_empty() {
            self.containers.remove(container);
        }
        removed
    }

    pub fn get_translation(&self, container: &str, key: &str, language: &str) -> Option<&Translation> {
        self.containers.get(container)?.get_translation(key, language)
    }

    pub fn get_all_translations(&self, container: &str, key: &str) -> &[Translation] {
        self.containers
            .get(container)
            .map(|c| c.get_all_translations(key))
            .unwrap_or_default()
    }

    pub fn find_key_recursive(&self, id: &str) -> Option<KeyMatch<'_>> {
        self.containers().find_map(|c| {
            c.key(id).map(|key| KeyMatch {
                package: &self.name,
                container: &c.name,
                key,
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Container {
    name: String,
    keys: Children<Key>,
}

impl Container {
    pub fn new(name: impl Into<String>) -> Self {
        Container {
            name: name.into(),
            keys: Children::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter()
    }

    /// Scoped lookup of a direct child key.
    pub fn key(&self, id: &str) -> Option<&Key> {
        self.keys.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn is_exportable(&self) -> bool {
        self.keys().any(Key::is_exportable)
    }

    pub fn set_translation(&mut self, key: &str, language: &str, text: &str) {
        if text.is_empty() {
            self.remove_translation(key, language);
            return;
        }
        self.keys
            .get_or_insert_with(key, || {
                tracing::debug!(key, "creating key");
                Key::new(key)
            })
            .set_translation(language, text);
    }

    pub fn remove_translation(&mut self, key: &str, language: &str) -> Option<Translation> {
        let k = self.keys.get_mut(key)?;
        let removed = k.remove_translation(language);
        if k.is_empty() {
            self.keys.remove(key);
        }
        removed
    }

    pub fn get_translation(&self, key: &str, language: &str) -> Option<&Translation> {
        self.keys.get(key)?.translation(language)
    }

    pub fn get_all_translations(&self, key: &str) -> &[Translation] {
        self.keys
            .get(key)
            .map(Key::all_translations)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Key {
    id: String,
    translations: Children<Translation>,
}

impl Key {
    pub fn new(id: impl Into<String>) -> Self {
        Key {
            id: id.into(),
            translations: Children::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn translations(&self) -> impl Iterator<Item = &Translation> {
        self.translations.iter()
    }

    pub fn all_translations(&self) -> &[Translation] {
        self.translations.as_slice()
    }

    pub fn translation(&self, language: &str) -> Option<&Translation> {
        self.translations.get(language)
    }

    /// The source text of this key, if any.
    pub fn original(&self) -> Option<&Translation> {
        self.translation(ORIGINAL)
    }

    pub fn len(&self) -> usize {
        self.translations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translations.is_empty()
    }

    /// Only keys with source text are written to XLIFF.
    pub fn is_exportable(&self) -> bool {
        self.original().is_some()
    }

    pub fn set_translation(&mut self, language: &str, text: &str) {
        if text.is_empty() {
            self.remove_translation(language);
            return;
        }
        self.translations
            .get_or_insert_with(language, || Translation::new(language, ""))
            .text = text.to_string();
    }

    pub fn remove_translation(&mut self, language: &str) -> Option<Translation> {
        self.translations.remove(language)
    }
}

/// The text of one key in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Translation {
    language: String,
    text: String,
}

impl Translation {
    pub fn new(language: impl Into<String>, text: impl Into<String>) -> Self {
        Translation {
            language: language.into(),
            text: text.into(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_original(&self) -> bool {
        self.language.eq_ignore_ascii_case(ORIGINAL)
    }
}
