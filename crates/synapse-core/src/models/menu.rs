//! 내비게이션 메뉴 모델.
//!
//! `GET /api/v1/menus` 응답. 항목이 리모트를 가리키면 셸 라우터가 마운트한다.

use serde::{Deserialize, Serialize};

/// 메뉴 항목
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// 메뉴 ID
    pub id: String,
    /// 표시 레이블
    pub label: String,
    /// 라우트 경로
    pub path: String,
    /// 아이콘 이름
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// 이 경로를 담당하는 리모트 이름
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
    /// 하위 메뉴
    #[serde(default)]
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    /// 하위 메뉴를 포함해 리모트 이름 수집 (중복 제거, 등장 순서 유지)
    pub fn collect_remotes(items: &[MenuItem]) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let mut stack: Vec<&MenuItem> = items.iter().rev().collect();
        while let Some(item) = stack.pop() {
            if let Some(remote) = &item.remote {
                if !out.contains(remote) {
                    out.push(remote.clone());
                }
            }
            stack.extend(item.children.iter().rev());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, remote: Option<&str>, children: Vec<MenuItem>) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            label: id.to_string(),
            path: format!("/{id}"),
            icon: None,
            remote: remote.map(str::to_string),
            children,
        }
    }

    #[test]
    fn collect_remotes_walks_children_in_order() {
        let menus = vec![
            item("home", None, vec![]),
            item(
                "analytics",
                None,
                vec![
                    item("reports", Some("reportsMfe"), vec![]),
                    item("dash", Some("dashboardMfe"), vec![]),
                ],
            ),
            item("reports-2", Some("reportsMfe"), vec![]),
        ];

        assert_eq!(
            MenuItem::collect_remotes(&menus),
            vec!["reportsMfe".to_string(), "dashboardMfe".to_string()]
        );
    }

    #[test]
    fn children_default_to_empty() {
        let json = r#"{"id":"a","label":"A","path":"/a"}"#;
        let item: MenuItem = serde_json::from_str(json).unwrap();
        assert!(item.children.is_empty());
        assert!(item.remote.is_none());
    }
}
