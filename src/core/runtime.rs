//! 工作台运行时：主控循环
//!
//! 建立 cmd / state 两条通道，在后台任务中串行处理用户命令与生成回执：
//! 命令交给 TabOrchestrator，得到的 GenerationRequest 各自 spawn 一个任务调用 GenerationClient，
//! 结果经内部通道送回后再应用。每次变更后向 UI 推送一次 UiState 快照。
//! 切走标签页不会取消在途请求；关闭（Quit / 通道关闭 / shutdown token）时在途任务直接丢弃。

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::campaign::{CampaignField, TabId};
use crate::core::orchestrator::{Completion, GenerationRequest, TabOrchestrator};
use crate::core::UiState;
use crate::generation::GenerationClient;

/// 从 UI 发往运行时的用户意图
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 字段级替换活动参数
    SetField(CampaignField, String),
    /// 提交活动（重置全部标签页并生成当前标签页）
    Submit,
    /// 切换标签页（懒加载）
    SelectTab(TabId),
    /// 重试当前标签页
    RetryActive,
    /// 退出
    Quit,
}

/// 启动运行时：返回命令发送端与状态接收端
pub fn spawn_studio(
    generator: Arc<dyn GenerationClient>,
    initial_tab: TabId,
    shutdown: CancellationToken,
) -> (mpsc::UnboundedSender<Command>, watch::Receiver<UiState>) {
    let orchestrator = TabOrchestrator::new(initial_tab);
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<Command>();
    let (state_tx, state_rx) = watch::channel(orchestrator.snapshot(None));

    tokio::spawn(async move {
        let mut orchestrator = orchestrator;
        let mut notice: Option<String> = None;
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                cmd = cmd_rx.recv() => {
                    let Some(cmd) = cmd else { break };  // cmd_tx 全部关闭
                    let request = match cmd {
                        Command::Quit => break,
                        Command::SetField(field, value) => {
                            notice = None;
                            orchestrator.set_field(field, value);
                            None
                        }
                        Command::Submit => match orchestrator.submit() {
                            Ok(request) => {
                                notice = None;
                                request
                            }
                            Err(e) => {
                                tracing::info!("Submit rejected: {}", e);
                                notice = Some(e.to_string());
                                None
                            }
                        },
                        Command::SelectTab(id) => orchestrator.select_tab(id),
                        Command::RetryActive => orchestrator.retry_active(),
                    };
                    if let Some(request) = request {
                        dispatch(&generator, request, &done_tx);
                    }
                }
                Some(done) = done_rx.recv() => {
                    orchestrator.complete(done);
                }
            }

            let _ = state_tx.send(orchestrator.snapshot(notice.clone()));
        }

        tracing::info!("Studio runtime stopped");
    });

    (cmd_tx, state_rx)
}

/// 每个请求一个独立任务，结果经 done_tx 送回主循环
fn dispatch(
    generator: &Arc<dyn GenerationClient>,
    request: GenerationRequest,
    done_tx: &mpsc::UnboundedSender<Completion>,
) {
    let generator = Arc::clone(generator);
    let done_tx = done_tx.clone();
    tokio::spawn(async move {
        let GenerationRequest {
            tab,
            ticket,
            params,
        } = request;
        let result = generator.generate(tab, &params).await;
        let _ = done_tx.send(Completion {
            tab,
            ticket,
            result,
        });
    });
}
