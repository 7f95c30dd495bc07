// Copyright 2025 The Drasi Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Store key derivation.
//!
//! A field's key is the chain of its ancestors' key segments joined with the
//! separator, optionally placed under a folder:
//!
//! ```text
//! [folder/]ancestor1[.ancestor2...].leaf
//! ```
//!
//! A segment is the field's key override when one is declared, otherwise its
//! name in lowercase.

use std::borrow::Cow;

/// Separator placed between key segments unless configured otherwise.
pub const DEFAULT_SEPARATOR: &str = ".";

/// A field's position in the structure being hydrated.
///
/// Descriptors only live for one hydration pass; each one borrows its parent.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor<'p> {
    name: &'p str,
    key: Option<&'p str>,
    parent: Option<&'p FieldDescriptor<'p>>,
}

impl<'p> FieldDescriptor<'p> {
    /// Descriptor for a field declared directly on the hydrated value.
    pub fn root(name: &'p str, key: Option<&'p str>) -> Self {
        Self {
            name,
            key,
            parent: None,
        }
    }

    /// Descriptor for a field declared on the aggregate described by `self`.
    pub fn child(&'p self, name: &'p str, key: Option<&'p str>) -> FieldDescriptor<'p> {
        FieldDescriptor {
            name,
            key,
            parent: Some(self),
        }
    }

    pub fn name(&self) -> &'p str {
        self.name
    }

    pub fn key_override(&self) -> Option<&'p str> {
        self.key
    }

    pub fn parent(&self) -> Option<&'p FieldDescriptor<'p>> {
        self.parent
    }

    /// This field's own key segment.
    pub fn segment(&self) -> Cow<'p, str> {
        match self.key {
            Some(key) if !key.is_empty() => Cow::Borrowed(key),
            _ => Cow::Owned(self.name.to_lowercase()),
        }
    }
}

/// Joins descriptor chains into store keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPathResolver {
    folder: String,
    separator: String,
}

impl Default for KeyPathResolver {
    fn default() -> Self {
        Self {
            folder: String::new(),
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl KeyPathResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn set_folder(&mut self, folder: impl Into<String>) {
        self.folder = folder.into();
    }

    pub fn set_separator(&mut self, separator: impl Into<String>) {
        self.separator = separator.into();
    }

    /// Full store key for `field`, including the folder.
    pub fn resolve(&self, field: &FieldDescriptor<'_>) -> String {
        let path = self.field_path(field);
        if self.folder.is_empty() {
            path
        } else {
            format!("{}/{path}", self.folder)
        }
    }

    /// Key for `field` relative to the folder.
    pub fn field_path(&self, field: &FieldDescriptor<'_>) -> String {
        match field.parent() {
            None => field.segment().into_owned(),
            Some(parent) => format!(
                "{}{}{}",
                self.field_path(parent),
                self.separator,
                field.segment()
            ),
        }
    }

    /// Resolve a chain of `(name, key override)` pairs, outermost first.
    ///
    /// Returns `None` for an empty chain: the hydrated value itself has no key.
    pub fn resolve_chain(&self, chain: &[(&str, Option<&str>)]) -> Option<String> {
        self.resolve_below(None, chain)
    }

    fn resolve_below(
        &self,
        parent: Option<&FieldDescriptor<'_>>,
        chain: &[(&str, Option<&str>)],
    ) -> Option<String> {
        let ((name, key), rest) = chain.split_first()?;
        let descriptor = match parent {
            Some(parent) => parent.child(*name, *key),
            None => FieldDescriptor::root(*name, *key),
        };

        if rest.is_empty() {
            Some(self.resolve(&descriptor))
        } else {
            self.resolve_below(Some(&descriptor), rest)
        }
    }
}
