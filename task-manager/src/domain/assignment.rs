// src/domain/assignment.rs

//! タスク担当者の変更判定
//!
//! タスクの作成・更新時に同期的に呼ばれ、`assigned_date` をどう書き換えるかを決める。
//! I/O は一切行わない純粋関数のみで構成する。

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 更新リクエストに含まれる担当者フィールドの指定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssigneeUpdate {
    /// フィールド省略（担当者は変更しない）
    Keep,
    /// 明示的な null（担当者を外す）
    Clear,
    /// 指定ユーザーを担当者にする
    Assign(Uuid),
}

impl From<Option<Option<Uuid>>> for AssigneeUpdate {
    fn from(value: Option<Option<Uuid>>) -> Self {
        match value {
            None => Self::Keep,
            Some(None) => Self::Clear,
            Some(Some(user_id)) => Self::Assign(user_id),
        }
    }
}

impl AssigneeUpdate {
    /// 比較に使う「入力された担当者」。省略と null はどちらも None
    pub fn incoming(&self) -> Option<Uuid> {
        match self {
            Self::Assign(user_id) => Some(*user_id),
            Self::Keep | Self::Clear => None,
        }
    }
}

/// 担当者の変化の種類（ログ出力用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentChange {
    /// 担当者フィールドが指定されなかった
    Untouched,
    /// 担当者が外された
    Cleared,
    /// 同じユーザーが再指定された
    Unchanged,
    /// 別のユーザー（または未割り当てから）へ割り当てられた
    Reassigned { from: Option<Uuid>, to: Uuid },
}

impl AssignmentChange {
    pub fn is_reassigned(&self) -> bool {
        matches!(self, Self::Reassigned { .. })
    }
}

/// 担当者更新を適用した結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentOutcome {
    pub assignee_id: Option<Uuid>,
    pub assigned_date: Option<DateTime<Utc>>,
    pub change: AssignmentChange,
}

/// 新しい `assigned_date` を計算する
///
/// - 入力が null / 省略: 以前の値をそのまま返す
/// - 以前と同じユーザー: 以前の値をそのまま返す
/// - 以前と異なる非nullユーザー（以前が null の作成時を含む）: `now`
///
/// 担当者を外しても `assigned_date` はクリアしない（過去の割り当て時刻が残る）。
pub fn compute_assigned_date(
    previous_assignee: Option<Uuid>,
    incoming_assignee: Option<Uuid>,
    previous_assigned_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match incoming_assignee {
        Some(incoming) if previous_assignee != Some(incoming) => Some(now),
        _ => previous_assigned_date,
    }
}

/// 担当者フィールドの更新を適用し、新しい担当者と `assigned_date` を返す
pub fn apply_assignee_update(
    previous_assignee: Option<Uuid>,
    previous_assigned_date: Option<DateTime<Utc>>,
    update: AssigneeUpdate,
    now: DateTime<Utc>,
) -> AssignmentOutcome {
    let assigned_date = compute_assigned_date(
        previous_assignee,
        update.incoming(),
        previous_assigned_date,
        now,
    );

    let (assignee_id, change) = match update {
        AssigneeUpdate::Keep => (previous_assignee, AssignmentChange::Untouched),
        AssigneeUpdate::Clear => (None, AssignmentChange::Cleared),
        AssigneeUpdate::Assign(user_id) if previous_assignee == Some(user_id) => {
            (previous_assignee, AssignmentChange::Unchanged)
        }
        AssigneeUpdate::Assign(user_id) => (
            Some(user_id),
            AssignmentChange::Reassigned {
                from: previous_assignee,
                to: user_id,
            },
        ),
    };

    AssignmentOutcome {
        assignee_id,
        assigned_date,
        change,
    }
}

/// タスク作成時の担当者と `assigned_date` を決める
pub fn assign_on_create(assignee: Option<Uuid>, now: DateTime<Utc>) -> AssignmentOutcome {
    let update = match assignee {
        Some(user_id) => AssigneeUpdate::Assign(user_id),
        None => AssigneeUpdate::Keep,
    };
    apply_assignee_update(None, None, update, now)
}
