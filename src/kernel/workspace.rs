//! Named workspaces, each holding the last persisted tree snapshot.

use rustc_hash::FxHashMap;
use std::fmt;

use crate::models::file_tree::{self, Node, NodeId, Snapshot};

pub const DEFAULT_WORKSPACE: &str = "default_workspace";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceError {
    EmptyName,
    DuplicateName(String),
    NotFound(String),
}

impl fmt::Display for WorkspaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkspaceError::EmptyName => write!(f, "workspace name must not be empty"),
            WorkspaceError::DuplicateName(name) => {
                write!(f, "workspace '{}' already exists", name)
            }
            WorkspaceError::NotFound(name) => write!(f, "workspace '{}' not found", name),
        }
    }
}

impl std::error::Error for WorkspaceError {}

#[derive(Debug, Clone)]
pub struct WorkspaceRegistry {
    /// Registration order, used for listing.
    order: Vec<String>,
    stored: FxHashMap<String, Snapshot>,
    active: String,
}

impl WorkspaceRegistry {
    pub fn new(name: &str, snapshot: Snapshot) -> Self {
        let mut stored = FxHashMap::default();
        stored.insert(name.to_string(), snapshot);
        Self {
            order: vec![name.to_string()],
            stored,
            active: name.to_string(),
        }
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.stored.contains_key(name)
    }

    pub fn snapshot(&self, name: &str) -> Option<&Snapshot> {
        self.stored.get(name)
    }

    /// Stores `snapshot` under the active workspace.
    pub fn persist(&mut self, snapshot: Snapshot) {
        self.stored.insert(self.active.clone(), snapshot);
    }

    /// Registers a seeded workspace and makes it active, persisting `outgoing`
    /// under the previously active name. Nothing changes on error.
    pub fn create(&mut self, name: &str, outgoing: Snapshot) -> Result<Snapshot, WorkspaceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WorkspaceError::EmptyName);
        }
        if self.contains(name) {
            return Err(WorkspaceError::DuplicateName(name.to_string()));
        }

        self.persist(outgoing);
        let snapshot = Snapshot::new(seed_tree(name));
        self.order.push(name.to_string());
        self.stored.insert(name.to_string(), snapshot.clone());
        self.active = name.to_string();
        Ok(snapshot)
    }

    /// Moves the stored snapshot to `to` and renames its root folder. File ids are
    /// kept. Returns the renamed snapshot.
    pub fn rename(&mut self, from: &str, to: &str) -> Result<Snapshot, WorkspaceError> {
        let to = to.trim();
        if to.is_empty() {
            return Err(WorkspaceError::EmptyName);
        }
        let Some(current) = self.stored.get(from).cloned() else {
            return Err(WorkspaceError::NotFound(from.to_string()));
        };
        if from == to {
            return Ok(current);
        }
        if self.contains(to) {
            return Err(WorkspaceError::DuplicateName(to.to_string()));
        }

        let renamed = Snapshot::new(rename_root(&current, to));
        self.stored.remove(from);
        self.stored.insert(to.to_string(), renamed.clone());
        if let Some(slot) = self.order.iter_mut().find(|n| n.as_str() == from) {
            *slot = to.to_string();
        }
        if self.active == from {
            self.active = to.to_string();
        }
        Ok(renamed)
    }

    /// Persists `outgoing` under the active workspace and returns the target's
    /// stored snapshot. Unknown targets change nothing.
    pub fn switch(&mut self, name: &str, outgoing: Snapshot) -> Option<Snapshot> {
        let incoming = self.stored.get(name)?.clone();
        self.persist(outgoing);
        self.active = name.to_string();
        Some(incoming)
    }
}

fn rename_root(tree: &[Node], name: &str) -> Vec<Node> {
    match tree.first() {
        Some(root) if root.is_folder() => file_tree::rename(tree, &root.id, name),
        _ => tree.to_vec(),
    }
}

/// A single root folder named after the workspace with a readme.
pub fn seed_tree(name: &str) -> Vec<Node> {
    vec![Node::folder(
        "root",
        name,
        vec![Node::file(
            "README.md",
            "README.md",
            format!("# {}\n\nNew workspace created.", name),
        )],
    )]
}

pub const SAMPLE_CONTRACT: &str = r#"#![no_std]
#![no_main]

extern crate alloc;

use alloc::string::String;
use casper_contract::contract_api::{runtime, storage};
use casper_types::Key;

const KEY_NAME: &str = "my_value";

#[no_mangle]
pub extern "C" fn call() {
    let message: String = runtime::get_named_arg("message");
    let uref = storage::new_uref(message);
    runtime::put_key(KEY_NAME, Key::URef(uref));
}
"#;

const SAMPLE_MANIFEST: &str = r#"[package]
name = "caspier_contract"
version = "0.1.0"
edition = "2021"

[dependencies]
casper-contract = "1.4.4"
casper-types = "1.5.0"

[lib]
crate-type = ["cdylib"]
"#;

const SAMPLE_MAKEFILE: &str = "prepare:\n\trustup target add wasm32-unknown-unknown\n\n\
build-contract:\n\tcargo build --release -p caspier_contract --target wasm32-unknown-unknown\n";

/// Starting tree of the default workspace.
pub fn default_tree() -> Vec<Node> {
    vec![Node::folder(
        "root",
        DEFAULT_WORKSPACE,
        vec![
            Node::folder(
                "contract",
                "contract",
                vec![
                    Node::file("Cargo.toml", "Cargo.toml", SAMPLE_MANIFEST),
                    Node::file("Makefile", "Makefile", SAMPLE_MAKEFILE),
                    Node::folder(
                        "src",
                        "src",
                        vec![Node::file("main.rs", "main.rs", SAMPLE_CONTRACT)],
                    ),
                ],
            ),
            Node::folder("tests", "tests", Vec::new()),
            Node::file(
                "README.txt",
                "README.txt",
                "Welcome to Caspier.\n\ncontract/ holds the Rust smart contract source.\n",
            ),
        ],
    )]
}

/// Id of the file opened when the default workspace loads.
pub fn default_open_file() -> NodeId {
    NodeId::from("main.rs")
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/workspace.rs"]
mod tests;
