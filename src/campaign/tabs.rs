//! 标签页：9 个固定策略分类，各自独立的生成状态
//!
//! TabId 是封闭枚举，显示元数据（标签、图标）在静态表中一次性解析；
//! TabCollection 始终恰好包含每个标识的一条记录，不会增删。

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// 标签页标识（声明顺序即显示顺序）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TabId {
    Orchestration,
    Icp,
    ContentStrategy,
    LeadMagnet,
    Seo,
    Ads,
    Email,
    Social,
    Pr,
}

/// 静态显示元数据
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TabMeta {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

const TAB_META: [TabMeta; 9] = [
    TabMeta {
        key: "orchestration",
        label: "Orchestration",
        icon: "▦",
    },
    TabMeta {
        key: "icp",
        label: "Messaging",
        icon: "☺",
    },
    TabMeta {
        key: "content",
        label: "Content",
        icon: "≡",
    },
    TabMeta {
        key: "lead-magnet",
        label: "Lead Magnets",
        icon: "◆",
    },
    TabMeta {
        key: "seo",
        label: "SEO",
        icon: "⌕",
    },
    TabMeta {
        key: "ads",
        label: "Ads",
        icon: "◉",
    },
    TabMeta {
        key: "email",
        label: "Email",
        icon: "✉",
    },
    TabMeta {
        key: "social",
        label: "Social",
        icon: "⇄",
    },
    TabMeta {
        key: "pr",
        label: "PR",
        icon: "▤",
    },
];

impl TabId {
    pub const ALL: [TabId; 9] = [
        TabId::Orchestration,
        TabId::Icp,
        TabId::ContentStrategy,
        TabId::LeadMagnet,
        TabId::Seo,
        TabId::Ads,
        TabId::Email,
        TabId::Social,
        TabId::Pr,
    ];

    /// 在 ALL / TAB_META 中的下标
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn meta(&self) -> &'static TabMeta {
        &TAB_META[self.index()]
    }

    pub fn key(&self) -> &'static str {
        self.meta().key
    }

    pub fn label(&self) -> &'static str {
        self.meta().label
    }

    pub fn icon(&self) -> &'static str {
        self.meta().icon
    }

    /// 显示顺序中的下一个，末尾回绕
    pub fn next(&self) -> TabId {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> TabId {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// 1 起始的序号（对应数字快捷键）
    pub fn from_ordinal(n: usize) -> Option<TabId> {
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown tab identifier: {0}")]
pub struct UnknownTab(pub String);

impl FromStr for TabId {
    type Err = UnknownTab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        TabId::ALL
            .into_iter()
            .find(|id| id.key() == key)
            .ok_or_else(|| UnknownTab(key.to_string()))
    }
}

/// 单个标签页的生成状态
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TabStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// 标签页记录：静态元数据 + 生成结果
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TabRecord {
    pub id: TabId,
    pub label: &'static str,
    pub icon: &'static str,
    pub content: String,
    pub status: TabStatus,
    /// 仅在 status == Error 时存在
    pub error: Option<String>,
}

impl TabRecord {
    pub fn new(id: TabId) -> Self {
        let meta = id.meta();
        Self {
            id,
            label: meta.label,
            icon: meta.icon,
            content: String::new(),
            status: TabStatus::Idle,
            error: None,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.status = TabStatus::Idle;
        self.content.clear();
        self.error = None;
    }

    pub(crate) fn start_loading(&mut self) {
        self.status = TabStatus::Loading;
        self.error = None;
    }

    pub(crate) fn succeed(&mut self, content: String) {
        self.status = TabStatus::Success;
        self.content = content;
        self.error = None;
    }

    /// 失败不动 content（保留空值或上一次的结果）
    pub(crate) fn fail(&mut self, message: String) {
        self.status = TabStatus::Error;
        self.error = Some(message);
    }
}

/// 9 条记录，按显示顺序排列
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TabCollection {
    records: [TabRecord; 9],
}

impl Default for TabCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl TabCollection {
    pub fn new() -> Self {
        Self {
            records: TabId::ALL.map(TabRecord::new),
        }
    }

    pub fn get(&self, id: TabId) -> &TabRecord {
        &self.records[id.index()]
    }

    pub(crate) fn get_mut(&mut self, id: TabId) -> &mut TabRecord {
        &mut self.records[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &TabRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn reset_all(&mut self) {
        for record in self.records.iter_mut() {
            record.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_roundtrip_and_unique() {
        for id in TabId::ALL {
            assert_eq!(id.key().parse::<TabId>(), Ok(id));
        }
        let mut keys: Vec<&str> = TabId::ALL.iter().map(|id| id.key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 9);
    }

    #[test]
    fn test_unknown_key() {
        let err = "billboards".parse::<TabId>().unwrap_err();
        assert_eq!(err, UnknownTab("billboards".to_string()));
        assert!(err.to_string().contains("billboards"));
    }

    #[test]
    fn test_labels_follow_display_order() {
        assert_eq!(TabId::Icp.label(), "Messaging");
        assert_eq!(TabId::LeadMagnet.key(), "lead-magnet");
        assert_eq!(TabId::ContentStrategy.key(), "content");
        assert_eq!(TabId::Pr.next(), TabId::Orchestration);
        assert_eq!(TabId::Orchestration.prev(), TabId::Pr);
        assert_eq!(TabId::from_ordinal(1), Some(TabId::Orchestration));
        assert_eq!(TabId::from_ordinal(9), Some(TabId::Pr));
        assert_eq!(TabId::from_ordinal(0), None);
        assert_eq!(TabId::from_ordinal(10), None);
    }

    #[test]
    fn test_collection_has_one_record_per_id() {
        let tabs = TabCollection::new();
        assert_eq!(tabs.len(), 9);
        for (record, id) in tabs.iter().zip(TabId::ALL) {
            assert_eq!(record.id, id);
            assert_eq!(record.status, TabStatus::Idle);
            assert!(record.content.is_empty());
            assert!(record.error.is_none());
        }
    }

    #[test]
    fn test_fail_keeps_content() {
        let mut record = TabRecord::new(TabId::Seo);
        record.succeed("old plan".to_string());
        record.start_loading();
        record.fail("boom".to_string());
        assert_eq!(record.status, TabStatus::Error);
        assert_eq!(record.content, "old plan");
        assert_eq!(record.error.as_deref(), Some("boom"));

        record.start_loading();
        assert!(record.error.is_none());
    }

    #[test]
    fn test_reset_all() {
        let mut tabs = TabCollection::new();
        tabs.get_mut(TabId::Ads).succeed("ads".to_string());
        tabs.get_mut(TabId::Email).fail("nope".to_string());
        tabs.reset_all();
        assert!(tabs
            .iter()
            .all(|r| r.status == TabStatus::Idle && r.content.is_empty() && r.error.is_none()));
    }
}
