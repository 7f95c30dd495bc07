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

//! Shared fixtures for hydration tests.

use etcd_hydrator::{hydrate_fields, Diagnostics, MemoryStore};
use std::sync::Mutex;

pub const TEST_FOLDER: &str = "testing";

/// Store contents every scenario test starts from.
pub const FIXTURES: &[(&str, &str)] = &[
    ("/testing/string", "foo"),
    ("/testing/struct.string", "qux"),
    ("/testing/bool", "true"),
    ("/testing/float32", "42.24"),
    ("/testing/integer", "42"),
];

pub fn fixture_store() -> MemoryStore {
    MemoryStore::from_entries(FIXTURES.iter().copied()).recording()
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Inner {
    pub string: String,
}

/// One field of every supported kind, plus aliases reusing other keys.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Example {
    pub string: String,
    pub bytes: Vec<u8>,
    pub aliased: String,
    pub bool: bool,
    pub integer: isize,
    pub integer8: i8,
    pub integer16: i16,
    pub integer32: i32,
    pub integer64: i64,
    pub uinteger: usize,
    pub uinteger8: u8,
    pub uinteger16: u16,
    pub uinteger32: u32,
    pub uinteger64: u64,
    pub float32: f32,
    pub float64: f64,
    pub nested: Inner,
}

hydrate_fields!(Inner { value string });

hydrate_fields!(Example {
    value string,
    value bytes => "string",
    value aliased => "string",
    value bool,
    value integer,
    value integer8 => "integer",
    value integer16 => "integer",
    value integer32 => "integer",
    value integer64 => "integer",
    value uinteger => "integer",
    value uinteger8 => "integer",
    value uinteger16 => "integer",
    value uinteger32 => "integer",
    value uinteger64 => "integer",
    value float32,
    value float64 => "float32",
    nested nested => "struct",
});

/// Check every field of an Example hydrated from [`FIXTURES`].
pub fn assert_hydrated(value: &Example) {
    assert_eq!(value.string, "foo");
    assert_eq!(value.aliased, "foo");
    assert_eq!(value.bytes, b"foo".to_vec());
    assert_eq!(value.nested.string, "qux");
    assert_eq!(value.integer, 42);
    assert_eq!(value.integer8, 42i8);
    assert_eq!(value.integer16, 42i16);
    assert_eq!(value.integer32, 42i32);
    assert_eq!(value.integer64, 42i64);
    assert_eq!(value.uinteger, 42usize);
    assert_eq!(value.uinteger8, 42u8);
    assert_eq!(value.uinteger16, 42u16);
    assert_eq!(value.uinteger32, 42u32);
    assert_eq!(value.uinteger64, 42u64);
    assert_eq!(value.float32, 42.24f32);
    assert_eq!(value.float64, 42.24f64);
    assert!(value.bool);
}

/// Diagnostics sink that keeps every line it is given.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    lines: Mutex<Vec<String>>,
}

impl RecordingDiagnostics {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn hydrating(&self, type_name: &str) {
        self.lines
            .lock()
            .unwrap()
            .push(format!("hydrating {type_name}"));
    }

    fn recovered(&self, key: &str, value: &str) {
        self.lines
            .lock()
            .unwrap()
            .push(format!("recovered {key}={value}"));
    }
}
