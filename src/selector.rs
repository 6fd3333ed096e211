//! Primary-endpoint election.
//!
//! Documentation for the same resource often describes several routes for one
//! logical operation (a short canonical route plus legacy or specialized
//! variants). Election scores every candidate and picks one primary
//! deterministically; losers are retained for observability only and never
//! invoked automatically.
//!
//! Scoring (higher wins):
//! - length: `1000 - min(len(path), 1000)`, shorter paths look more canonical;
//! - keywords: +30 when the title contains an operation synonym, +8 when the
//!   path does (case-insensitive substring, localized synonyms included);
//! - method: +20 for read/GET, +15 for write-or-workflow/POST.
//!
//! Ties break on shorter path, then lexicographically smaller title, so the
//! result is total and independent of input ordering.

use crate::endpoint::{EndpointDescriptor, Method, Operation};
use std::cmp::Ordering as CmpOrdering;

/// Operation synonyms, localized forms first as they appear in source docs.
fn keywords(op: Operation) -> &'static [&'static str] {
    match op {
        Operation::ReadList => &["列表", "查询", "检索", "list", "query", "search"],
        Operation::ReadDetail => &["详情", "明细", "detail", "get"],
        Operation::WriteUpsert => &["保存", "save"],
        Operation::WriteCreate => &["新增", "创建", "create", "add"],
        Operation::WriteUpdate => &["修改", "更新", "update", "edit"],
        Operation::WriteDelete => &["删除", "delete", "remove"],
        Operation::WorkflowSubmit => &["提交", "submit"],
        Operation::WorkflowAudit => &["审核", "audit", "approve"],
        Operation::WorkflowUnaudit => &["反审核", "unaudit", "unapprove"],
        Operation::WorkflowCancel => &["取消", "作废", "cancel", "void"],
        Operation::WorkflowClose => &["关闭", "close"],
        Operation::WorkflowOpen => &["反关闭", "open", "reopen"],
        Operation::WorkflowEnable => &["启用", "enable"],
        Operation::WorkflowDisable => &["禁用", "disable"],
    }
}

/// Score one candidate for an operation.
pub fn score_endpoint(ep: &EndpointDescriptor, op: Operation) -> i64 {
    let title = ep.title.to_lowercase();
    let path = ep.path_or_url.to_lowercase();

    let length_score = 1000 - ep.path_or_url.len().min(1000) as i64;

    let mut keyword_score = 0;
    for keyword in keywords(op) {
        if title.contains(keyword) {
            keyword_score += 30;
        }
        if path.contains(keyword) {
            keyword_score += 8;
        }
    }

    let method_score = if op.is_read() && ep.method == Method::Get {
        20
    } else if op.is_write_or_workflow() && ep.method == Method::Post {
        15
    } else {
        0
    };

    length_score + keyword_score + method_score
}

/// Election result for one operation.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// The elected endpoint, `None` when no candidate exists.
    pub primary: Option<EndpointDescriptor>,
    /// All candidates in rank order, primary first.
    pub candidates: Vec<EndpointDescriptor>,
}

/// Elect the primary endpoint among candidates claiming `op`.
///
/// Deterministic: repeated calls and reordered input return the same primary.
pub fn choose_primary(endpoints: &[EndpointDescriptor], op: Operation) -> Selection {
    let mut scored: Vec<(i64, &EndpointDescriptor)> = endpoints
        .iter()
        .filter(|ep| ep.operation == op)
        .map(|ep| (score_endpoint(ep, op), ep))
        .collect();

    if scored.is_empty() {
        return Selection::default();
    }

    scored.sort_by(|a, b| rank(a, b));

    Selection {
        primary: Some(scored[0].1.clone()),
        candidates: scored.into_iter().map(|(_, ep)| ep.clone()).collect(),
    }
}

fn rank(a: &(i64, &EndpointDescriptor), b: &(i64, &EndpointDescriptor)) -> CmpOrdering {
    b.0.cmp(&a.0)
        .then_with(|| a.1.path_or_url.len().cmp(&b.1.path_or_url.len()))
        .then_with(|| a.1.title.cmp(&b.1.title))
}
