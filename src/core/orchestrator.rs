//! 标签页编排器：每个标签页独立的生成状态机
//!
//! 状态：Idle → Loading → {Success | Error}；Error 经重试回到 Loading；Success 只有强制触发（重试 / 重新提交）才会回到 Loading。
//!
//! 编排器本身不做 I/O：所有变更入口返回需要发起的 GenerationRequest，由 runtime 派发并把结果以 Completion 送回。
//! 每次触发签发一张 Ticket，只有持有当前 Ticket 的结果会被应用；Loading 中的标签页不再重复触发（单飞）。

use crate::campaign::{CampaignField, CampaignParameters, TabCollection, TabId, TabRecord, TabStatus};
use crate::core::{UiState, ValidationError};
use crate::generation::GenerationError;

/// 失败信息为空时的兜底文案
pub const GENERIC_FAILURE: &str = "Failed to generate content.";

/// 单次触发的凭据
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// 需要派发给生成客户端的请求（参数为触发时刻的快照）
#[derive(Clone, Debug)]
pub struct GenerationRequest {
    pub tab: TabId,
    pub ticket: Ticket,
    pub params: CampaignParameters,
}

/// 生成结果回执
#[derive(Debug)]
pub struct Completion {
    pub tab: TabId,
    pub ticket: Ticket,
    pub result: Result<String, GenerationError>,
}

/// 编排器：唯一持有标签页集合、当前标签、活动参数
#[derive(Debug)]
pub struct TabOrchestrator {
    params: CampaignParameters,
    tabs: TabCollection,
    active: TabId,
    submitted: bool,
    /// 每个标签页当前有效的 Ticket；None 表示没有在途请求
    in_flight: [Option<Ticket>; 9],
    next_ticket: u64,
}

impl Default for TabOrchestrator {
    fn default() -> Self {
        Self::new(TabId::Orchestration)
    }
}

impl TabOrchestrator {
    pub fn new(initial_tab: TabId) -> Self {
        Self {
            params: CampaignParameters::default(),
            tabs: TabCollection::new(),
            active: initial_tab,
            submitted: false,
            in_flight: [None; 9],
            next_ticket: 0,
        }
    }

    pub fn params(&self) -> &CampaignParameters {
        &self.params
    }

    pub fn tabs(&self) -> &TabCollection {
        &self.tabs
    }

    pub fn active(&self) -> TabId {
        self.active
    }

    pub fn active_record(&self) -> &TabRecord {
        self.tabs.get(self.active)
    }

    pub fn has_submitted(&self) -> bool {
        self.submitted
    }

    /// 有在途请求的标签页
    pub fn in_flight(&self) -> impl Iterator<Item = TabId> + '_ {
        TabId::ALL
            .into_iter()
            .filter(|id| self.in_flight[id.index()].is_some())
    }

    /// 字段级替换；不影响任何标签页
    pub fn set_field(&mut self, field: CampaignField, value: impl Into<String>) {
        self.params.set(field, value);
    }

    /// 提交活动：所有标签页重置为 Idle，只为当前标签页强制生成
    pub fn submit(&mut self) -> Result<Option<GenerationRequest>, ValidationError> {
        if !self.params.is_ready() {
            return Err(ValidationError::MissingTargetIndustries);
        }

        self.submitted = true;
        self.tabs.reset_all();
        // 重置前发出的请求全部作废
        self.in_flight = [None; 9];
        tracing::info!(tab = %self.active, "Campaign submitted");

        Ok(self.trigger(self.active, true))
    }

    /// 切换标签页；已提交过且目标仍为 Idle 时懒加载
    pub fn select_tab(&mut self, id: TabId) -> Option<GenerationRequest> {
        self.active = id;
        if self.submitted && self.tabs.get(id).status == TabStatus::Idle {
            return self.trigger(id, false);
        }
        None
    }

    /// 重试当前标签页（强制，跳过 Success 检查）
    pub fn retry_active(&mut self) -> Option<GenerationRequest> {
        if !self.submitted {
            tracing::debug!("Retry ignored: campaign not submitted yet");
            return None;
        }
        self.trigger(self.active, true)
    }

    /// 触发生成，带守卫：
    /// - 目标行业为空 → 不触发
    /// - 非强制且已 Success → 不触发
    /// - 已在 Loading → 不触发（单飞）
    fn trigger(&mut self, id: TabId, force: bool) -> Option<GenerationRequest> {
        if !self.params.is_ready() {
            tracing::debug!(tab = %id, "Trigger skipped: target industries empty");
            return None;
        }

        let record = self.tabs.get_mut(id);
        match record.status {
            TabStatus::Success if !force => {
                tracing::debug!(tab = %id, "Trigger skipped: already generated");
                return None;
            }
            TabStatus::Loading => {
                tracing::debug!(tab = %id, "Trigger skipped: generation in flight");
                return None;
            }
            _ => {}
        }

        record.start_loading();
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight[id.index()] = Some(ticket);

        Some(GenerationRequest {
            tab: id,
            ticket,
            params: self.params.clone(),
        })
    }

    /// 应用生成结果；Ticket 已失效（被重新提交作废）时丢弃并返回 false
    pub fn complete(&mut self, completion: Completion) -> bool {
        let Completion {
            tab,
            ticket,
            result,
        } = completion;

        let slot = &mut self.in_flight[tab.index()];
        if *slot != Some(ticket) {
            tracing::warn!(tab = %tab, ?ticket, "Dropping stale generation result");
            return false;
        }
        *slot = None;

        let record = self.tabs.get_mut(tab);
        match result {
            Ok(content) => {
                tracing::info!(tab = %tab, chars = content.len(), "Tab content generated");
                record.succeed(content);
            }
            Err(e) => {
                let message = e.to_string();
                let message = if message.trim().is_empty() {
                    GENERIC_FAILURE.to_string()
                } else {
                    message
                };
                tracing::warn!(tab = %tab, "Generation failed: {}", message);
                record.fail(message);
            }
        }
        true
    }

    /// 投影为 UI 快照
    pub fn snapshot(&self, notice: Option<String>) -> UiState {
        UiState {
            params: self.params.clone(),
            tabs: self.tabs.clone(),
            active: self.active,
            submitted: self.submitted,
            notice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready() -> TabOrchestrator {
        let mut orch = TabOrchestrator::default();
        orch.set_field(CampaignField::TargetIndustries, "SaaS");
        orch
    }

    fn ok(req: &GenerationRequest, text: &str) -> Completion {
        Completion {
            tab: req.tab,
            ticket: req.ticket,
            result: Ok(text.to_string()),
        }
    }

    fn err(req: &GenerationRequest, e: GenerationError) -> Completion {
        Completion {
            tab: req.tab,
            ticket: req.ticket,
            result: Err(e),
        }
    }

    #[test]
    fn test_submit_without_industries_is_rejected() {
        let mut orch = TabOrchestrator::default();
        orch.set_field(CampaignField::Budget, "$10k");
        let before = orch.tabs().clone();

        assert_eq!(orch.submit().unwrap_err(), ValidationError::MissingTargetIndustries);
        assert_eq!(orch.tabs(), &before);
        assert!(!orch.has_submitted());
        assert_eq!(orch.in_flight().count(), 0);
    }

    #[test]
    fn test_submit_loads_only_active_tab() {
        let mut orch = ready();
        let req = orch.submit().unwrap().expect("request for active tab");
        assert_eq!(req.tab, TabId::Orchestration);
        assert_eq!(req.params.target_industries, "SaaS");

        for record in orch.tabs().iter() {
            if record.id == TabId::Orchestration {
                assert_eq!(record.status, TabStatus::Loading);
            } else {
                assert_eq!(record.status, TabStatus::Idle);
                assert!(record.content.is_empty());
            }
        }
    }

    #[test]
    fn test_success_then_revisit_does_not_refetch() {
        let mut orch = ready();
        let req = orch.submit().unwrap().unwrap();
        assert!(orch.complete(ok(&req, "plan")));
        assert_eq!(orch.active_record().status, TabStatus::Success);
        assert_eq!(orch.active_record().content, "plan");

        let seo = orch.select_tab(TabId::Seo).expect("lazy fetch for idle tab");
        assert_eq!(seo.tab, TabId::Seo);
        assert_eq!(orch.tabs().get(TabId::Seo).status, TabStatus::Loading);

        assert!(orch.select_tab(TabId::Orchestration).is_none());
        assert_eq!(orch.active_record().status, TabStatus::Success);
    }

    #[test]
    fn test_select_before_submit_does_nothing() {
        let mut orch = ready();
        assert!(orch.select_tab(TabId::Email).is_none());
        assert_eq!(orch.active(), TabId::Email);
        assert_eq!(orch.active_record().status, TabStatus::Idle);
    }

    #[test]
    fn test_lazy_fetch_skipped_when_industries_cleared() {
        let mut orch = ready();
        orch.submit().unwrap();
        orch.set_field(CampaignField::TargetIndustries, "");
        assert!(orch.select_tab(TabId::Ads).is_none());
        assert_eq!(orch.tabs().get(TabId::Ads).status, TabStatus::Idle);
    }

    #[test]
    fn test_failure_keeps_content_and_sets_message() {
        let mut orch = ready();
        let req = orch.submit().unwrap().unwrap();
        orch.complete(err(
            &req,
            GenerationError::Upstream("upstream quota exceeded".to_string()),
        ));
        let record = orch.active_record();
        assert_eq!(record.status, TabStatus::Error);
        assert_eq!(record.error.as_deref(), Some("upstream quota exceeded"));
        assert!(record.content.is_empty());
    }

    #[test]
    fn test_blank_failure_message_falls_back() {
        let mut orch = ready();
        let req = orch.submit().unwrap().unwrap();
        orch.complete(err(&req, GenerationError::Upstream("  ".to_string())));
        assert_eq!(orch.active_record().error.as_deref(), Some(GENERIC_FAILURE));
    }

    #[test]
    fn test_retry_from_error_overwrites() {
        let mut orch = ready();
        let first = orch.submit().unwrap().unwrap();
        orch.complete(err(&first, GenerationError::EmptyResponse));

        let retry = orch.retry_active().expect("retry from error");
        assert_eq!(orch.active_record().status, TabStatus::Loading);
        assert!(orch.active_record().error.is_none());
        assert_ne!(retry.ticket, first.ticket);

        orch.complete(ok(&retry, "fresh plan"));
        assert_eq!(orch.active_record().status, TabStatus::Success);
        assert_eq!(orch.active_record().content, "fresh plan");
    }

    #[test]
    fn test_retry_regenerates_success() {
        let mut orch = ready();
        let req = orch.submit().unwrap().unwrap();
        orch.complete(ok(&req, "v1"));
        let again = orch.retry_active().expect("forced regeneration");
        orch.complete(ok(&again, "v2"));
        assert_eq!(orch.active_record().content, "v2");
    }

    #[test]
    fn test_duplicate_trigger_while_loading_is_noop() {
        let mut orch = ready();
        orch.submit().unwrap().unwrap();
        assert!(orch.retry_active().is_none());
        assert_eq!(orch.in_flight().collect::<Vec<_>>(), vec![TabId::Orchestration]);
    }

    #[test]
    fn test_retry_before_submit_is_ignored() {
        let mut orch = ready();
        assert!(orch.retry_active().is_none());
        assert_eq!(orch.active_record().status, TabStatus::Idle);
    }

    #[test]
    fn test_resubmit_drops_stale_results() {
        let mut orch = ready();
        let first = orch.submit().unwrap().unwrap();
        let seo = orch.select_tab(TabId::Seo).unwrap();

        orch.select_tab(TabId::Orchestration);
        orch.set_field(CampaignField::TargetIndustries, "Healthcare");
        let second = orch.submit().unwrap().unwrap();
        assert_eq!(second.params.target_industries, "Healthcare");

        assert!(!orch.complete(ok(&first, "stale")));
        assert!(!orch.complete(ok(&seo, "stale seo")));
        assert_eq!(orch.active_record().status, TabStatus::Loading);
        assert_eq!(orch.tabs().get(TabId::Seo).status, TabStatus::Idle);
        assert!(orch.tabs().get(TabId::Seo).content.is_empty());

        assert!(orch.complete(ok(&second, "current")));
        assert_eq!(orch.active_record().content, "current");
    }

    #[test]
    fn test_result_lands_on_background_tab() {
        let mut orch = ready();
        let req = orch.submit().unwrap().unwrap();
        orch.select_tab(TabId::Social);
        orch.complete(ok(&req, "landed"));
        assert_eq!(orch.active(), TabId::Social);
        assert_eq!(orch.tabs().get(TabId::Orchestration).content, "landed");
    }

    #[test]
    fn test_snapshot_projects_state() {
        let mut orch = ready();
        orch.submit().unwrap();
        let snap = orch.snapshot(Some("note".to_string()));
        assert!(snap.submitted);
        assert_eq!(snap.active, TabId::Orchestration);
        assert_eq!(snap.active_record().status, TabStatus::Loading);
        assert_eq!(snap.notice.as_deref(), Some("note"));
    }
}
