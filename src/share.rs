use crate::feed::Match;

/// Deep link to a match on the public site: `{origin}/{id}`.
pub fn share_url(origin: &str, m: &Match) -> String {
    format!("{}/{}", origin.trim_end_matches('/'), m.id)
}

/// Text attached to a shared link.
pub fn share_text(m: &Match) -> String {
    format!("Watch {} live on GOVOET!", m.title())
}

/// Swap the primary streaming domain for its backup in a mirror URL.
/// Plain host-string substitution; URLs on other domains pass through
/// untouched. Used by the manual "fix stream" action when the primary
/// embed host is blocked or down.
pub fn swap_stream_domain(url: &str, primary: &str, backup: &str) -> String {
    if primary.is_empty() || backup.is_empty() {
        return url.to_string();
    }
    url.replace(primary, backup)
}
