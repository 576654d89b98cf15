//! 状态定义：UiState 投影
//!
//! UI 只持有 UiState 快照（参数、9 个标签页记录、当前标签、是否已提交、提示信息）；
//! 完整状态由 TabOrchestrator 维护，每次变更后投影一次。

use serde::Serialize;

use crate::campaign::{CampaignParameters, TabCollection, TabId, TabRecord};

/// UI 看到的「投影」状态
#[derive(Clone, Debug, Serialize)]
pub struct UiState {
    pub params: CampaignParameters,
    pub tabs: TabCollection,
    pub active: TabId,
    /// 至少成功提交过一次
    pub submitted: bool,
    /// 校验提示（如缺少目标行业），下次编辑或成功提交时清除
    pub notice: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            params: CampaignParameters::default(),
            tabs: TabCollection::new(),
            active: TabId::Orchestration,
            submitted: false,
            notice: None,
        }
    }
}

impl UiState {
    pub fn active_record(&self) -> &TabRecord {
        self.tabs.get(self.active)
    }
}
