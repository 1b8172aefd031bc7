//! 整树快照历史（线性模型）
//!
//! - 每次结构变更（新建/重命名/删除）追加一个快照
//! - 游标之后存在快照时，新提交会丢弃它们（不保留分支）
//! - 内容编辑只替换当前快照，避免每次按键都产生一条历史

use super::file_tree::Snapshot;

#[derive(Debug, Clone)]
pub struct TreeHistory {
    snapshots: Vec<Snapshot>,
    /// 始终满足 `cursor < snapshots.len()`
    cursor: usize,
}

impl TreeHistory {
    pub fn new(initial: Snapshot) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
        }
    }

    pub fn current(&self) -> &Snapshot {
        &self.snapshots[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// 截断游标之后的快照，追加新快照并移动游标到末尾
    pub fn commit(&mut self, snapshot: Snapshot) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot);
        self.cursor = self.snapshots.len() - 1;
    }

    /// 原地替换当前快照，游标和长度都不变
    pub fn patch_current(&mut self, snapshot: Snapshot) {
        self.snapshots[self.cursor] = snapshot;
    }

    /// 丢弃全部历史，只保留给定快照
    pub fn reset(&mut self, snapshot: Snapshot) {
        self.snapshots.clear();
        self.snapshots.push(snapshot);
        self.cursor = 0;
    }

    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }
}

impl Default for TreeHistory {
    fn default() -> Self {
        Self::new(Snapshot::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/tree_history.rs"]
mod tests;
