//! 文件树数据模型
//!
//! 整棵树用根节点序列表示。所有变更函数都是纯函数：输入树不被修改，
//! 返回新的树；目标 id 不存在（或节点类型不符）时返回结构相等的副本。

use compact_str::CompactString;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use super::ids::unique_id;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(CompactString);

impl NodeId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(CompactString::new(id.as_ref()))
    }

    /// 由名称和时间戳生成新 id，重命名后保持不变
    pub fn generate(name: &str) -> Self {
        Self(CompactString::from(unique_id(name)))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(CompactString::from(value))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

impl NodeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
        }
    }
}

/// 文件有内容没有子节点，文件夹有子节点没有内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeBody {
    File {
        content: String,
        language: CompactString,
    },
    Folder {
        children: Vec<Node>,
        #[serde(default, rename = "isOpen")]
        is_open: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    #[serde(flatten)]
    pub body: NodeBody,
}

impl Node {
    /// 语言标签在创建时由扩展名推导，重命名不会重新推导
    pub fn file(id: impl Into<NodeId>, name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        let language = CompactString::new(language_for_name(&name));
        Self {
            id: id.into(),
            name,
            body: NodeBody::File {
                content: content.into(),
                language,
            },
        }
    }

    pub fn folder(id: impl Into<NodeId>, name: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            body: NodeBody::Folder {
                children,
                is_open: false,
            },
        }
    }

    /// 新建空节点并分配唯一 id
    pub fn create(kind: NodeKind, name: &str) -> Self {
        let id = NodeId::generate(name);
        match kind {
            NodeKind::File => Self::file(id, name, String::new()),
            NodeKind::Folder => Self::folder(id, name, Vec::new()),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self.body {
            NodeBody::File { .. } => NodeKind::File,
            NodeBody::Folder { .. } => NodeKind::Folder,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind() == NodeKind::File
    }

    pub fn is_folder(&self) -> bool {
        self.kind() == NodeKind::Folder
    }

    pub fn content(&self) -> Option<&str> {
        match &self.body {
            NodeBody::File { content, .. } => Some(content),
            NodeBody::Folder { .. } => None,
        }
    }

    pub fn language(&self) -> Option<&str> {
        match &self.body {
            NodeBody::File { language, .. } => Some(language),
            NodeBody::Folder { .. } => None,
        }
    }

    pub fn children(&self) -> Option<&[Node]> {
        match &self.body {
            NodeBody::File { .. } => None,
            NodeBody::Folder { children, .. } => Some(children),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.body, NodeBody::Folder { is_open: true, .. })
    }
}

pub fn language_for_name(name: &str) -> &'static str {
    let extension = name.rsplit('.').next().unwrap_or(name);
    match extension {
        "sol" => "sol",
        "rs" => "rust",
        "ts" => "typescript",
        "js" => "javascript",
        "toml" => "toml",
        "md" => "markdown",
        "json" => "json",
        _ => "plaintext",
    }
}

/// 不可变整树快照，克隆只增加引用计数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(Arc<[Node]>);

impl Snapshot {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self(Arc::from(nodes))
    }

    pub fn nodes(&self) -> &[Node] {
        &self.0
    }

    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Deref for Snapshot {
    type Target = [Node];

    fn deref(&self) -> &[Node] {
        &self.0
    }
}

impl From<Vec<Node>> for Snapshot {
    fn from(nodes: Vec<Node>) -> Self {
        Self::new(nodes)
    }
}

/// 前序深度优先查找，返回第一个匹配
pub fn find<'a>(tree: &'a [Node], id: &NodeId) -> Option<&'a Node> {
    for node in tree {
        if &node.id == id {
            return Some(node);
        }
        if let Some(found) = node.children().and_then(|children| find(children, id)) {
            return Some(found);
        }
    }
    None
}

pub fn collect_subtree_ids(node: &Node) -> FxHashSet<NodeId> {
    let mut ids = FxHashSet::default();
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        ids.insert(current.id.clone());
        if let Some(children) = current.children() {
            stack.extend(children.iter());
        }
    }
    ids
}

/// 追加到父文件夹末尾并展开父文件夹；父节点不存在或是文件时原样返回
pub fn insert_child(tree: &[Node], parent: &NodeId, child: Node) -> Vec<Node> {
    if !find(tree, parent).is_some_and(Node::is_folder) {
        return tree.to_vec();
    }

    map_matching(tree, parent, &|node| {
        let mut node = node.clone();
        if let NodeBody::Folder { children, is_open } = &mut node.body {
            children.push(child.clone());
            *is_open = true;
        }
        node
    })
}

/// 不检查同级重名
pub fn rename(tree: &[Node], id: &NodeId, new_name: &str) -> Vec<Node> {
    map_matching(tree, id, &|node| Node {
        id: node.id.clone(),
        name: new_name.to_string(),
        body: node.body.clone(),
    })
}

/// 删除节点及其全部后代，可位于任意深度
pub fn delete(tree: &[Node], id: &NodeId) -> Vec<Node> {
    tree.iter()
        .filter(|node| &node.id != id)
        .map(|node| match &node.body {
            NodeBody::Folder { children, is_open } => Node {
                id: node.id.clone(),
                name: node.name.clone(),
                body: NodeBody::Folder {
                    children: delete(children, id),
                    is_open: *is_open,
                },
            },
            NodeBody::File { .. } => node.clone(),
        })
        .collect()
}

/// 只对文件生效
pub fn update_content(tree: &[Node], id: &NodeId, new_content: &str) -> Vec<Node> {
    map_matching(tree, id, &|node| {
        let mut node = node.clone();
        if let NodeBody::File { content, .. } = &mut node.body {
            *content = new_content.to_string();
        }
        node
    })
}

/// 前序遍历的全部文件节点
pub fn files(tree: &[Node]) -> Vec<&Node> {
    let mut out = Vec::new();
    collect_files(tree, &mut out);
    out
}

fn collect_files<'a>(tree: &'a [Node], out: &mut Vec<&'a Node>) {
    for node in tree {
        match node.children() {
            Some(children) => collect_files(children, out),
            None => out.push(node),
        }
    }
}

pub fn find_file_by_name<'a>(tree: &'a [Node], name: &str) -> Option<&'a Node> {
    files(tree).into_iter().find(|node| node.name == name)
}

pub fn count_nodes(tree: &[Node]) -> usize {
    tree.iter()
        .map(|node| 1 + node.children().map(count_nodes).unwrap_or(0))
        .sum()
}

fn map_matching(tree: &[Node], id: &NodeId, apply: &impl Fn(&Node) -> Node) -> Vec<Node> {
    tree.iter()
        .map(|node| {
            if &node.id == id {
                return apply(node);
            }
            match &node.body {
                NodeBody::Folder { children, is_open } => Node {
                    id: node.id.clone(),
                    name: node.name.clone(),
                    body: NodeBody::Folder {
                        children: map_matching(children, id, apply),
                        is_open: *is_open,
                    },
                },
                NodeBody::File { .. } => node.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/models/file_tree.rs"]
mod tests;
