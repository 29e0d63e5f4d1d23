pub mod protocol;
pub mod server;
pub mod stdio;
pub mod tools;

pub use server::McpServer;
pub use stdio::run_stdio;

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use revu_bitbucket::{CommentAnchor, PullRequestHost};
    use revu_core::{PullRequestRef, Result};
    use revu_review::ReviewEngine;
    use std::sync::Mutex;
    use tools::{call_tool, list_tools};

    struct FakeHost {
        prs: Vec<PullRequestRef>,
        diff: String,
        existing: Vec<String>,
        posted: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PullRequestHost for FakeHost {
        async fn list_open_prs(&self) -> Result<Vec<PullRequestRef>> {
            Ok(self.prs.clone())
        }

        async fn pr_diff(&self, _repository: &str, _pr_id: u64) -> Result<String> {
            Ok(self.diff.clone())
        }

        async fn pr_comments(&self, _repository: &str, _pr_id: u64) -> Result<Vec<String>> {
            Ok(self.existing.clone())
        }

        async fn post_comment(
            &self,
            _repository: &str,
            _pr_id: u64,
            body: &str,
            _anchor: Option<CommentAnchor>,
        ) -> Result<()> {
            self.posted.lock().unwrap().push(body.to_string());
            Ok(())
        }
    }

    const DIFF: &str = "\
diff --git a/src/api.rs b/src/api.rs
--- a/src/api.rs
+++ b/src/api.rs
@@ -1,1 +1,2 @@
 fn handle() {}
+fn refund() {}
";

    fn test_server() -> McpServer<FakeHost> {
        let host = FakeHost {
            prs: vec![
                PullRequestRef::new(12, "Refund flow", "billing-api"),
                PullRequestRef::new(3, "Dark mode", "android-app"),
            ],
            diff: DIFF.to_string(),
            existing: Vec::new(),
            posted: Mutex::new(Vec::new()),
        };
        McpServer::new(ReviewEngine::new(host))
    }

    #[test]
    fn test_list_tools() {
        let tools_json = list_tools();
        let tools = tools_json["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 6);

        let tool_names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
        assert!(tool_names.contains(&"revu_prs_list"));
        assert!(tool_names.contains(&"revu_pr_preview_comments"));
        assert!(tool_names.contains(&"revu_pr_post_comments"));
        assert!(tool_names.contains(&"revu_pr_auto_review"));
    }

    #[tokio::test]
    async fn test_prs_list_groups_by_repo() {
        let server = test_server();
        let params = serde_json::json!({ "name": "revu_prs_list", "arguments": {} });

        let result = call_tool(&server, &params).await.unwrap();
        assert_eq!(result["total"], 2);
        assert_eq!(result["pending"], 2);
        assert_eq!(result["repositories"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_pr_review_returns_package() {
        let server = test_server();
        let params = serde_json::json!({
            "name": "revu_pr_review",
            "arguments": { "identifier": "refund" }
        });

        let result = call_tool(&server, &params).await.unwrap();
        assert_eq!(result["status"], "ready");
        assert!(result["package"]["sanitized_diff"].is_string());
        assert!(result["package"]["instructions"].is_string());
    }

    #[tokio::test]
    async fn test_pr_review_not_found() {
        let server = test_server();
        let params = serde_json::json!({
            "name": "revu_pr_review",
            "arguments": { "identifier": "nonexistent" }
        });

        let result = call_tool(&server, &params).await.unwrap();
        assert_eq!(result["status"], "not_found");
    }

    #[tokio::test]
    async fn test_post_without_confirm_posts_nothing() {
        let server = test_server();
        let params = serde_json::json!({
            "name": "revu_pr_post_comments",
            "arguments": {
                "identifier": "12",
                "feedback": "src/api.rs:2: P0: refund path unaudited"
            }
        });

        let result = call_tool(&server, &params).await.unwrap();
        assert_eq!(result["status"], "confirmation_required");
        assert!(server.engine.host().posted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_post_with_confirm() {
        let server = test_server();
        let params = serde_json::json!({
            "name": "revu_pr_post_comments",
            "arguments": {
                "identifier": "12",
                "feedback": "src/api.rs:2: P0: refund path unaudited",
                "confirm": true
            }
        });

        let result = call_tool(&server, &params).await.unwrap();
        assert_eq!(result["status"], "posted");
        let posted = server.engine.host().posted.lock().unwrap();
        assert_eq!(posted.len(), 1);
        assert!(posted[0].starts_with("[AI - Review] P0:"));
    }

    #[tokio::test]
    async fn test_call_tool_unknown() {
        let server = test_server();
        let params = serde_json::json!({ "name": "unknown_tool", "arguments": {} });
        assert!(call_tool(&server, &params).await.is_err());
    }
}
