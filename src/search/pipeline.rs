//! Search pipeline / 搜索流程
//!
//! query → candidates → verify → group by subtitle → order → paginate → enrich
//!
//! Limitation: every candidate row the store returns is held in memory and
//! grouped before the requested page is cut, so a broad substring query
//! (`e`, `the`) costs time and memory proportional to all matching dialogs,
//! not to the page size. That is fine for a catalog of a few thousand
//! subtitles; a larger catalog needs a store that groups, counts and pages
//! in SQL (`GROUP BY subtitle_id ... LIMIT/OFFSET`) and only verifies the
//! dialogs of the returned page.

use std::collections::{HashMap, HashSet};

use super::schema::{
    DialogHit, MatchGroup, MatchMode, ResultDialog, SearchPage, SearchParams, SearchResultGroup,
    SubtitleInfo,
};
use super::store::{CandidateFilter, DialogStore};
use super::tokenizer::{normalize_for_search, normalized_words};
use super::index_text;
use crate::error::CatalogResult;
use crate::pagination::PageMetadata;
use crate::render::{plain_text, render_dialog, HighlightOptions, Highlighter};

/// Store filter for a query / 构建候选过滤条件
fn candidate_filter(query: &str, mode: MatchMode) -> CandidateFilter {
    match mode {
        MatchMode::Substring => CandidateFilter::Contains(normalize_for_search(query)),
        MatchMode::Exact => CandidateFilter::Words(normalized_words(query)),
    }
}

/// Whether raw dialog text matches a query / 判断对白是否匹配
///
/// Substring: the lowercased displayed text contains the trimmed, lowercased
/// query. Exact: every query word equals some dialog word, both stripped of
/// punctuation and lowercased. A query with no words matches nothing in
/// exact mode.
pub fn dialog_matches(text: &str, query: &str, mode: MatchMode) -> bool {
    match mode {
        MatchMode::Substring => {
            let needle = normalize_for_search(query);
            !needle.is_empty() && index_text(text).contains(&needle)
        }
        MatchMode::Exact => {
            let wanted = normalized_words(query);
            if wanted.is_empty() {
                return false;
            }
            let words: HashSet<String> = normalized_words(&plain_text(text)).into_iter().collect();
            wanted.iter().all(|w| words.contains(w))
        }
    }
}

/// Group matches by subtitle, largest group first / 按字幕分组
///
/// Dialogs keep their input order inside a group. Groups with the same
/// count are ordered by subtitle id so paging is deterministic.
pub fn group_matches(hits: Vec<DialogHit>) -> Vec<MatchGroup> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<MatchGroup> = Vec::new();

    for hit in hits {
        match index.get(&hit.subtitle_id) {
            Some(&i) => groups[i].dialogs.push(hit),
            None => {
                index.insert(hit.subtitle_id.clone(), groups.len());
                groups.push(MatchGroup {
                    subtitle_id: hit.subtitle_id.clone(),
                    dialogs: vec![hit],
                });
            }
        }
    }

    groups.sort_by(|a, b| {
        b.match_count()
            .cmp(&a.match_count())
            .then_with(|| a.subtitle_id.cmp(&b.subtitle_id))
    });
    groups
}

fn to_result_group(
    group: MatchGroup,
    info: &SubtitleInfo,
    highlighter: Option<&Highlighter>,
) -> SearchResultGroup {
    let match_count = group.match_count();
    let dialogs = group
        .dialogs
        .into_iter()
        .map(|hit| ResultDialog {
            segments: render_dialog(&hit.text, highlighter),
            id: hit.id,
            text: hit.text,
            start_time: hit.start_time,
            end_time: hit.end_time,
        })
        .collect();

    SearchResultGroup {
        id: info.id.clone(),
        show_name: info.show_name.clone(),
        season: info.season,
        episode: info.episode,
        language: info.language.clone(),
        filler: info.filler,
        filename: info.filename.clone(),
        dialogs,
        match_count,
    }
}

/// Run a dialog search and build one page of grouped results / 执行对白搜索
///
/// `totalResults` counts groups, not dialogs. A group whose subtitle cannot
/// be found is logged and left out of the page; it still counts toward the
/// total. The store is read, never written.
pub async fn search_dialogs(
    store: &dyn DialogStore,
    params: &SearchParams,
    base_path: &str,
) -> CatalogResult<SearchPage> {
    let filter = candidate_filter(&params.query, params.match_mode);
    let candidates = store.find_candidates(&filter).await?;

    let hits: Vec<DialogHit> = candidates
        .into_iter()
        .filter(|hit| dialog_matches(&hit.text, &params.query, params.match_mode))
        .collect();
    let groups = group_matches(hits);
    let total_results = groups.len() as u64;

    let page_groups: Vec<MatchGroup> = groups
        .into_iter()
        .skip(params.page.offset())
        .take(params.page.limit as usize)
        .collect();

    let ids: Vec<String> = page_groups.iter().map(|g| g.subtitle_id.clone()).collect();
    let subtitles: HashMap<String, SubtitleInfo> = store
        .subtitles_by_ids(&ids)
        .await?
        .into_iter()
        .map(|s| (s.id.clone(), s))
        .collect();

    let highlighter = Highlighter::new(
        &params.query,
        HighlightOptions {
            mode: params.match_mode,
            case_sensitive: false,
        },
    );

    let mut results = Vec::with_capacity(page_groups.len());
    for group in page_groups {
        match subtitles.get(&group.subtitle_id) {
            Some(info) => results.push(to_result_group(group, info, highlighter.as_ref())),
            None => tracing::warn!(
                "Subtitle {} not found for {} matching dialogs, omitting group",
                group.subtitle_id,
                group.match_count()
            ),
        }
    }

    let metadata = PageMetadata::new(total_results, params.page, base_path, &params.link_params());
    tracing::debug!(
        "Search {:?} ({}) page {}: {} groups total",
        params.query,
        params.match_mode.as_str(),
        params.page.page,
        total_results
    );

    Ok(SearchPage { metadata, results })
}
