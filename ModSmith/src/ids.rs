//! GUIDs and localization handles
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! Stable variants derive the id from a namespace and a name (UUID v5), so
//! rebuilding a mod produces the same ids and the same output files.

use uuid::Uuid;

fn namespace_uuid(namespace: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, namespace.as_bytes())
}

/// A random lowercase hyphenated GUID.
#[must_use]
pub fn new_guid() -> String {
    Uuid::new_v4().to_string()
}

/// A GUID derived from `namespace` and `name`.
#[must_use]
pub fn stable_guid(namespace: &str, name: &str) -> String {
    Uuid::new_v5(&namespace_uuid(namespace), name.as_bytes()).to_string()
}

/// Localization handle form: `h` followed by the GUID with `g` separators.
fn handle_from(uuid: Uuid) -> String {
    format!("h{}", uuid.hyphenated().to_string().replace('-', "g"))
}

/// A random localization handle.
#[must_use]
pub fn new_handle() -> String {
    handle_from(Uuid::new_v4())
}

/// A localization handle derived from `namespace` and `name`.
#[must_use]
pub fn stable_handle(namespace: &str, name: &str) -> String {
    // Separate the handle space from the GUID space for the same inputs
    let namespace = namespace_uuid(&format!("{namespace}/handles"));
    handle_from(Uuid::new_v5(&namespace, name.as_bytes()))
}
