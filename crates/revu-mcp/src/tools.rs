use revu_bitbucket::PullRequestHost;
use revu_core::{Intent, PullRequestRef, ReviewMode};
use revu_review::{IntentDispatch, ResolveOutcome};
use serde_json::json;

use crate::server::{McpServer, grouped_pr_listing};

pub async fn call_tool<H: PullRequestHost>(
    server: &McpServer<H>,
    params: &serde_json::Value,
) -> anyhow::Result<serde_json::Value> {
    let tool_name = params["name"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("Missing tool name"))?;
    let args = &params["arguments"];

    match tool_name {
        "revu_prs_list" => match server.engine.dispatch(&Intent::List, "").await? {
            IntentDispatch::Listing { statuses } => Ok(grouped_pr_listing(&statuses)),
            other => anyhow::bail!("unexpected dispatch result: {:?}", other),
        },
        "revu_pr_review" => {
            let identifier = required_str(args, "identifier")?;
            let pr = match resolve(server, identifier).await? {
                Resolved::Done(value) => return Ok(value),
                Resolved::Pr(pr) => pr,
            };
            if server.engine.is_reviewed(&pr).await? {
                return Ok(json!({ "status": "already_reviewed", "pr": pr }));
            }
            let package = server.engine.prepare(&pr).await?;
            Ok(json!({ "status": "ready", "package": package }))
        }
        "revu_pr_preview_comments" => {
            let identifier = required_str(args, "identifier")?;
            let feedback = required_str(args, "feedback")?;
            let intent = Intent::ReviewOneConfirm {
                identifier: identifier.to_string(),
            };
            match server.engine.dispatch(&intent, feedback).await? {
                IntentDispatch::Preview {
                    resolution: ResolveOutcome::One(_),
                    decision: Some(decision),
                } => Ok(json!({ "status": "preview", "decision": decision })),
                IntentDispatch::Preview { resolution, .. } => {
                    Ok(render_resolution(identifier, &resolution))
                }
                other => anyhow::bail!("unexpected dispatch result: {:?}", other),
            }
        }
        "revu_pr_post_comments" => {
            let identifier = required_str(args, "identifier")?;
            let feedback = required_str(args, "feedback")?;
            let confirm = args["confirm"].as_bool().unwrap_or(false);

            let pr = match resolve(server, identifier).await? {
                Resolved::Done(value) => return Ok(value),
                Resolved::Pr(pr) => pr,
            };
            if server.engine.is_reviewed(&pr).await? {
                return Ok(json!({ "status": "already_reviewed", "pr": pr }));
            }
            let decision = server
                .engine
                .decide(&pr, feedback, ReviewMode::ManualConfirm)
                .await?;
            if !confirm {
                return Ok(json!({
                    "status": "confirmation_required",
                    "decision": decision,
                }));
            }
            let report = server.engine.post(&pr, &decision, true).await?;
            Ok(json!({ "status": "posted", "decision": decision, "report": report }))
        }
        "revu_pr_auto_review" => {
            let identifier = required_str(args, "identifier")?;
            let feedback = args["feedback"].as_str().unwrap_or_default();
            let intent = Intent::ReviewOneAuto {
                identifier: identifier.to_string(),
            };
            match server.engine.dispatch(&intent, feedback).await? {
                IntentDispatch::Single { outcome } => Ok(serde_json::to_value(outcome)?),
                other => anyhow::bail!("unexpected dispatch result: {:?}", other),
            }
        }
        "revu_prs_auto_review_all" => {
            let feedback = args["feedback"].as_str().unwrap_or_default();
            match server.engine.dispatch(&Intent::ReviewAllAuto, feedback).await? {
                IntentDispatch::Batch { outcomes } => {
                    Ok(json!({ "results": serde_json::to_value(outcomes)? }))
                }
                other => anyhow::bail!("unexpected dispatch result: {:?}", other),
            }
        }
        _ => anyhow::bail!("Unknown tool: {}", tool_name),
    }
}

enum Resolved {
    Pr(PullRequestRef),
    Done(serde_json::Value),
}

async fn resolve<H: PullRequestHost>(
    server: &McpServer<H>,
    identifier: &str,
) -> anyhow::Result<Resolved> {
    Ok(match server.engine.resolve(identifier).await? {
        ResolveOutcome::One(pr) => Resolved::Pr(pr),
        other => Resolved::Done(render_resolution(identifier, &other)),
    })
}

fn render_resolution(identifier: &str, resolution: &ResolveOutcome) -> serde_json::Value {
    match resolution {
        ResolveOutcome::NotFound => json!({
            "status": "not_found",
            "identifier": identifier,
        }),
        ResolveOutcome::Many(candidates) => json!({
            "status": "ambiguous",
            "candidates": candidates,
        }),
        ResolveOutcome::One(pr) => json!({ "status": "resolved", "pr": pr }),
    }
}

fn required_str<'a>(args: &'a serde_json::Value, key: &str) -> anyhow::Result<&'a str> {
    args[key]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("Missing {} parameter", key))
}

pub fn list_tools() -> serde_json::Value {
    let tools = vec![
        tool_schema(
            "revu_prs_list",
            "List open pull requests grouped by repository, with review status",
            json!({ "type": "object", "properties": {} }),
        ),
        tool_schema(
            "revu_pr_review",
            "Build the sanitized review package (diff, platform checklist, instructions) for one PR",
            json!({
                "type": "object",
                "properties": {
                    "identifier": {"type": "string", "description": "PR id, title fragment, branch fragment, or 'all'"}
                },
                "required": ["identifier"]
            }),
        ),
        tool_schema(
            "revu_pr_preview_comments",
            "Classify review feedback into post/skip sets without posting anything",
            json!({
                "type": "object",
                "properties": {
                    "identifier": {"type": "string"},
                    "feedback": {"type": "string", "description": "Review findings, one per line: file:line: P0|P1|P2: message"}
                },
                "required": ["identifier", "feedback"]
            }),
        ),
        tool_schema(
            "revu_pr_post_comments",
            "Post classified review comments; requires confirm=true",
            json!({
                "type": "object",
                "properties": {
                    "identifier": {"type": "string"},
                    "feedback": {"type": "string"},
                    "confirm": {"type": "boolean", "default": false}
                },
                "required": ["identifier", "feedback"]
            }),
        ),
        tool_schema(
            "revu_pr_auto_review",
            "Review one PR end to end and post the surviving comments without confirmation",
            json!({
                "type": "object",
                "properties": {
                    "identifier": {"type": "string"},
                    "feedback": {"type": "string"}
                },
                "required": ["identifier"]
            }),
        ),
        tool_schema(
            "revu_prs_auto_review_all",
            "Auto-review every open PR that has not been reviewed yet",
            json!({
                "type": "object",
                "properties": {
                    "feedback": {"type": "string"}
                }
            }),
        ),
    ];

    json!({ "tools": tools })
}

fn tool_schema(
    name: &str,
    description: &str,
    input_schema: serde_json::Value,
) -> serde_json::Value {
    json!({
        "name": name,
        "description": description,
        "inputSchema": input_schema
    })
}
