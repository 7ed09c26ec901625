//! Live-messaging endpoint detection
//!
//! Two independent literal-pattern matchers run over a project's call
//! expressions:
//! - **mount**: `MapHub<THub>("/path")` yields the hub type and mount path
//! - **send**: `.Group("topic").SendAsync("Callback", ..)` or
//!   `.All.SendAsync("Callback", ..)` yields the callback and optional topic
//!
//! An endpoint exists only when both match. Computed paths, topics or callback
//! names never match.

use autobench_model::syntax::{CallExpr, Expr};
use serde::{Deserialize, Serialize};

/// Method and member names the matchers look for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointPatterns {
    /// Generic mount call (`MapHub`)
    pub mount_method: String,
    /// Client send call (`SendAsync`)
    pub send_method: String,
    /// Group selector call (`Group`)
    pub group_method: String,
    /// Broadcast member (`All`)
    pub broadcast_member: String,
}

impl Default for EndpointPatterns {
    fn default() -> Self {
        Self {
            mount_method: "MapHub".to_string(),
            send_method: "SendAsync".to_string(),
            group_method: "Group".to_string(),
            broadcast_member: "All".to_string(),
        }
    }
}

/// Result of the mount matcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountMatch {
    /// Hub type argument as written
    pub hub_type: String,
    /// Literal mount path
    pub path: String,
}

/// Result of the send matcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMatch {
    /// Literal callback method name
    pub callback: String,
    /// Literal group topic; `None` for broadcast
    pub topic: Option<String>,
}

/// First `MapHub<T>("literal")` call
pub fn find_mount<'a>(
    calls: impl IntoIterator<Item = &'a CallExpr>,
    patterns: &EndpointPatterns,
) -> Option<MountMatch> {
    calls.into_iter().find_map(|call| {
        if call.method != patterns.mount_method || call.type_args.len() != 1 {
            return None;
        }
        let path = call.literal_arg(0).filter(|path| !path.is_empty())?;
        Some(MountMatch {
            hub_type: call.type_args[0].clone(),
            path: path.to_string(),
        })
    })
}

/// First `SendAsync("literal", ..)` on a group or broadcast receiver
pub fn find_send<'a>(
    calls: impl IntoIterator<Item = &'a CallExpr>,
    patterns: &EndpointPatterns,
) -> Option<SendMatch> {
    calls.into_iter().find_map(|call| {
        if call.method != patterns.send_method {
            return None;
        }
        let callback = call.literal_arg(0).filter(|name| !name.is_empty())?;
        let topic = match call.receiver.as_deref()? {
            Expr::Call(selector) if selector.method == patterns.group_method => {
                Some(selector.literal_arg(0)?.to_string())
            }
            Expr::Member { name, .. } if *name == patterns.broadcast_member => None,
            _ => return None,
        };
        Some(SendMatch {
            callback: callback.to_string(),
            topic,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn clients() -> Expr {
        Expr::member(Expr::ident("_hubContext"), "Clients")
    }

    fn map_hub(path: Expr) -> CallExpr {
        CallExpr::new("MapHub")
            .on(Expr::ident("app"))
            .with_type_arg("TelemetryHub")
            .with_arg(path)
    }

    #[test]
    fn mount_requires_literal_path() {
        let patterns = EndpointPatterns::default();
        let computed = map_hub(Expr::ident("hubPath"));
        let literal = map_hub(Expr::literal("/hubs/telemetry"));

        assert_eq!(find_mount([&computed], &patterns), None);
        assert_eq!(
            find_mount([&computed, &literal], &patterns),
            Some(MountMatch {
                hub_type: "TelemetryHub".to_string(),
                path: "/hubs/telemetry".to_string(),
            })
        );
    }

    #[test]
    fn first_mount_wins() {
        let patterns = EndpointPatterns::default();
        let first = map_hub(Expr::literal("/hubs/a"));
        let second = map_hub(Expr::literal("/hubs/b"));
        let found = find_mount([&first, &second], &patterns).map(|m| m.path);
        assert_eq!(found.as_deref(), Some("/hubs/a"));
    }

    #[test]
    fn send_to_group_captures_topic() {
        let group = CallExpr::new("Group")
            .on(clients())
            .with_arg(Expr::literal("radiation"));
        let send = CallExpr::new("SendAsync")
            .on(Expr::Call(group))
            .with_arg(Expr::literal("RadiationUpdate"))
            .with_arg(Expr::ident("payload"));

        assert_eq!(
            find_send([&send], &EndpointPatterns::default()),
            Some(SendMatch {
                callback: "RadiationUpdate".to_string(),
                topic: Some("radiation".to_string()),
            })
        );
    }

    #[test]
    fn send_to_all_is_broadcast() {
        let send = CallExpr::new("SendAsync")
            .on(Expr::member(clients(), "All"))
            .with_arg(Expr::literal("TelemetryEvent"));

        let found = find_send([&send], &EndpointPatterns::default()).expect("broadcast send");
        assert_eq!(found.topic, None);
    }

    #[test]
    fn send_with_computed_topic_does_not_match() {
        let group = CallExpr::new("Group").on(clients()).with_arg(Expr::ident("topic"));
        let send = CallExpr::new("SendAsync")
            .on(Expr::Call(group))
            .with_arg(Expr::literal("Update"));
        assert_eq!(find_send([&send], &EndpointPatterns::default()), None);
    }

    #[test]
    fn send_on_caller_does_not_match() {
        let send = CallExpr::new("SendAsync")
            .on(Expr::member(Expr::ident("Clients"), "Caller"))
            .with_arg(Expr::literal("Pong"));
        assert_eq!(find_send([&send], &EndpointPatterns::default()), None);
    }

    #[test]
    fn patterns_are_configurable() {
        let patterns = EndpointPatterns {
            mount_method: "MapStream".to_string(),
            ..EndpointPatterns::default()
        };
        let call = CallExpr::new("MapStream")
            .with_type_arg("StreamHub")
            .with_arg(Expr::literal("/streams"));
        assert!(find_mount([&call], &patterns).is_some());
        assert!(find_mount([&call], &EndpointPatterns::default()).is_none());
    }
}
