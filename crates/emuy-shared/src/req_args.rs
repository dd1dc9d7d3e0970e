//! This module stores the expected format of the arguments for the requests
//! that carry a body or query. Requests whose only input is in the path do not
//! have an entry here.

use crate::uac::RoleId;

/// For requests that carry no data. Serializes as `{}` in a json body and
/// as nothing in a query string.
#[derive(Debug, Default, Clone, Copy, serde::Serialize)]
pub struct NoArgs {}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRoleReqArgs {
    pub role_id: RoleId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ActivityReqArgs {
    pub limit: u16,
}

/// Body of `POST /repos/{repo}/actions/workflows/{id}/dispatches`
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DispatchReqArgs {
    #[serde(rename = "ref")]
    pub git_ref: String,
}

/// Body of `POST /repos/{repo}/merges`
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MergeReqArgs {
    pub base: String,
    pub head: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
}

impl MergeReqArgs {
    pub fn new(base: impl Into<String>, head: impl Into<String>) -> Self {
        let base = base.into();
        let head = head.into();
        let commit_message = Some(format!("Merge {head} into {base}"));
        Self {
            base,
            head,
            commit_message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_args_is_empty_object() {
        assert_eq!(serde_json::to_string(&NoArgs {}).unwrap(), "{}");
    }

    #[test]
    fn dispatch_uses_ref_key() {
        let args = DispatchReqArgs {
            git_ref: "main".to_string(),
        };
        assert_eq!(serde_json::to_string(&args).unwrap(), r#"{"ref":"main"}"#);
    }

    #[test]
    fn merge_has_default_message() {
        let args = MergeReqArgs::new("main", "dev");
        assert_eq!(args.commit_message.as_deref(), Some("Merge dev into main"));
    }
}
