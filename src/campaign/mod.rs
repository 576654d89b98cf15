//! 营销活动输入与标签页数据模型
//!
//! - **CampaignParameters**: 表单五个自由文本字段，只有目标行业是生成的前置条件
//! - **tabs**: 9 个固定标签页的标识、静态元数据与状态记录

pub mod tabs;

use serde::{Deserialize, Serialize};

pub use tabs::{TabCollection, TabId, TabMeta, TabRecord, TabStatus, UnknownTab};

/// 活动参数：整体由编排器持有，只能按字段整体替换
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignParameters {
    pub target_industries: String,
    pub pain_points: String,
    pub solutions: String,
    pub geographies: String,
    pub budget: String,
}

impl CampaignParameters {
    /// 目标行业非空（忽略首尾空白）才允许生成
    pub fn is_ready(&self) -> bool {
        !self.target_industries.trim().is_empty()
    }

    pub fn get(&self, field: CampaignField) -> &str {
        match field {
            CampaignField::TargetIndustries => &self.target_industries,
            CampaignField::PainPoints => &self.pain_points,
            CampaignField::Solutions => &self.solutions,
            CampaignField::Geographies => &self.geographies,
            CampaignField::Budget => &self.budget,
        }
    }

    /// 字段级替换
    pub fn set(&mut self, field: CampaignField, value: impl Into<String>) {
        let slot = match field {
            CampaignField::TargetIndustries => &mut self.target_industries,
            CampaignField::PainPoints => &mut self.pain_points,
            CampaignField::Solutions => &mut self.solutions,
            CampaignField::Geographies => &mut self.geographies,
            CampaignField::Budget => &mut self.budget,
        };
        *slot = value.into();
    }
}

/// 表单字段（按表单显示顺序）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CampaignField {
    TargetIndustries,
    PainPoints,
    Solutions,
    Geographies,
    Budget,
}

impl CampaignField {
    pub const ALL: [CampaignField; 5] = [
        CampaignField::TargetIndustries,
        CampaignField::PainPoints,
        CampaignField::Solutions,
        CampaignField::Geographies,
        CampaignField::Budget,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CampaignField::TargetIndustries => "Target Industries",
            CampaignField::PainPoints => "Business Pain Points",
            CampaignField::Solutions => "Services / Solutions",
            CampaignField::Geographies => "Target Geographies",
            CampaignField::Budget => "Budget",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            CampaignField::TargetIndustries => "e.g. SaaS, Fintech, Healthcare",
            CampaignField::PainPoints => "e.g. Low lead quality, long sales cycles",
            CampaignField::Solutions => "e.g. AI-driven analytics platform",
            CampaignField::Geographies => "e.g. North America, DACH",
            CampaignField::Budget => "e.g. $50k / quarter",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, CampaignField::TargetIndustries)
    }

    /// 表单内的下一个字段；最后一个返回 None
    pub fn next(&self) -> Option<CampaignField> {
        let idx = Self::ALL.iter().position(|f| f == self)?;
        Self::ALL.get(idx + 1).copied()
    }

    pub fn prev(&self) -> Option<CampaignField> {
        let idx = Self::ALL.iter().position(|f| f == self)?;
        idx.checked_sub(1).map(|i| Self::ALL[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_requires_target_industries() {
        let mut params = CampaignParameters::default();
        assert!(!params.is_ready());

        params.set(CampaignField::Budget, "$10k");
        assert!(!params.is_ready());

        params.set(CampaignField::TargetIndustries, "   ");
        assert!(!params.is_ready());

        params.set(CampaignField::TargetIndustries, "SaaS");
        assert!(params.is_ready());
    }

    #[test]
    fn test_field_replace() {
        let mut params = CampaignParameters::default();
        params.set(CampaignField::Geographies, "EMEA");
        params.set(CampaignField::Geographies, "APAC");
        assert_eq!(params.get(CampaignField::Geographies), "APAC");
        assert_eq!(params.get(CampaignField::PainPoints), "");
    }

    #[test]
    fn test_field_order() {
        assert_eq!(
            CampaignField::TargetIndustries.next(),
            Some(CampaignField::PainPoints)
        );
        assert_eq!(CampaignField::Budget.next(), None);
        assert_eq!(CampaignField::TargetIndustries.prev(), None);
        assert!(CampaignField::TargetIndustries.is_required());
        assert!(!CampaignField::Solutions.is_required());
    }
}
