// src/types/patch.rs

//! 部分更新リクエスト用の serde ヘルパー

use serde::{Deserialize, Deserializer};

/// `Option<Option<T>>` フィールド用のデシリアライザ
///
/// `#[serde(default, deserialize_with = "deserialize_some")]` と組み合わせると
/// フィールド省略は `None`、明示的な `null` は `Some(None)` になる。
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
