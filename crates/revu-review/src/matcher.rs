//! PR identifier matching
//!
//! Resolves a user-supplied identifier against the open PRs: a numeric id
//! short-circuits to an exact match, the literal "all" selects everything,
//! anything else is a case-insensitive substring match over title and source
//! branch, ranked by match position then shorter title. Ambiguity is
//! returned, never silently resolved; the presentation layer prompts.

use revu_core::PullRequestRef;

pub fn match_prs(identifier: &str, candidates: &[PullRequestRef]) -> Vec<PullRequestRef> {
    let ident = identifier.trim();
    if ident.is_empty() {
        return Vec::new();
    }

    if ident.eq_ignore_ascii_case("all") {
        return candidates.to_vec();
    }

    if let Ok(id) = ident.parse::<u64>() {
        if let Some(pr) = candidates.iter().find(|pr| pr.id == id) {
            return vec![pr.clone()];
        }
        // Numeric but unknown id: fall through, the digits may be part of a
        // title ("JIRA-2407").
    }

    let needle = ident.to_lowercase();
    let mut ranked: Vec<(usize, usize, &PullRequestRef)> = candidates
        .iter()
        .filter_map(|pr| {
            let title = pr.title.to_lowercase();
            let branch = pr
                .source_branch
                .as_deref()
                .unwrap_or_default()
                .to_lowercase();
            let pos = title.find(&needle).or_else(|| branch.find(&needle))?;
            Some((pos, pr.title.len(), pr))
        })
        .collect();

    // Stable sort keeps equally-ranked candidates in listing order.
    ranked.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
    ranked.into_iter().map(|(_, _, pr)| pr.clone()).collect()
}
