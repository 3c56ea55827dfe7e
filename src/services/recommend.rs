use std::collections::HashSet;

use crate::{
    error::{AppError, AppResult},
    models::{Recommendation, TasteCategory},
    services::providers::MovieCatalog,
};

/// Default number of recommendations returned to the client
pub const DEFAULT_TARGET_COUNT: usize = 5;

/// Pages fetched per genre before moving on. Bounds worst-case upstream
/// calls for sparse genres.
const MAX_PAGES_PER_GENRE: u32 = 5;

/// Aggregation parameters for one recommendation request
#[derive(Debug, Clone)]
pub struct RecommendParams {
    pub category: TasteCategory,
    pub locale: String,
    /// Second-chance locale when the primary under-fills the set. Skipped
    /// when equal to the primary.
    pub fallback_locale: Option<String>,
    pub region: String,
    pub target_count: usize,
}

/// Counts page fetch outcomes across one aggregation
#[derive(Debug, Default)]
struct FetchStats {
    succeeded: u32,
    failed: u32,
}

/// Assembles an ordered, deduplicated result set for a taste category
///
/// Genres are queried in the category's fixed order, pages ascending, items
/// in page order, so the result is reproducible for a given catalog state.
/// Items already seen or lacking a poster are skipped; fetching stops the
/// moment `target_count` items are picked. If the primary locale comes up
/// short, one fallback-locale pass appends further items without touching
/// the primary picks or their order.
///
/// A failed page fetch is swallowed: it ends paging for that genre and the
/// aggregation carries on, so one bad genre cannot abort an otherwise
/// satisfiable request. Only when every fetch failed and nothing was picked
/// does the caller see an upstream error; an empty list over healthy fetches
/// is a legitimate result, not a failure.
pub async fn recommend(
    catalog: &dyn MovieCatalog,
    params: &RecommendParams,
) -> AppResult<Vec<Recommendation>> {
    let mut seen: HashSet<u64> = HashSet::new();
    let mut picked: Vec<Recommendation> = Vec::new();
    let mut stats = FetchStats::default();

    collect_for_locale(
        catalog,
        params,
        &params.locale,
        &mut seen,
        &mut picked,
        &mut stats,
    )
    .await;

    if picked.len() < params.target_count {
        if let Some(fallback) = params.fallback_locale.as_deref() {
            if fallback != params.locale {
                collect_for_locale(catalog, params, fallback, &mut seen, &mut picked, &mut stats)
                    .await;
            }
        }
    }

    if picked.is_empty() && stats.failed > 0 && stats.succeeded == 0 {
        return Err(AppError::Upstream(
            "Catalog unavailable: every discover page fetch failed".to_string(),
        ));
    }

    picked.truncate(params.target_count);

    tracing::info!(
        category = ?params.category,
        locale = %params.locale,
        picked = picked.len(),
        target = params.target_count,
        pages_ok = stats.succeeded,
        pages_failed = stats.failed,
        "Recommendation aggregation finished"
    );

    Ok(picked)
}

/// One locale pass over every genre of the category
///
/// Appends into `picked` and returns early once the target is reached.
async fn collect_for_locale(
    catalog: &dyn MovieCatalog,
    params: &RecommendParams,
    locale: &str,
    seen: &mut HashSet<u64>,
    picked: &mut Vec<Recommendation>,
    stats: &mut FetchStats,
) {
    for &genre_id in params.category.genre_ids() {
        for page in 1..=MAX_PAGES_PER_GENRE {
            if picked.len() >= params.target_count {
                return;
            }

            let movies = match catalog
                .discover_page(locale, &params.region, genre_id, page)
                .await
            {
                Ok(movies) => {
                    stats.succeeded += 1;
                    movies
                }
                Err(e) => {
                    stats.failed += 1;
                    tracing::warn!(
                        locale = %locale,
                        genre_id = genre_id,
                        page = page,
                        error = %e,
                        "Discover page fetch failed, moving to next genre"
                    );
                    break;
                }
            };

            if movies.is_empty() {
                // No more results upstream for this genre.
                break;
            }

            for movie in movies {
                if seen.contains(&movie.id) {
                    continue;
                }

                // Poster filter is a hard exclusion, never a down-rank.
                let rec = match Recommendation::from_catalog(movie, params.category) {
                    Some(rec) => rec,
                    None => continue,
                };

                seen.insert(rec.id);
                picked.push(rec);

                if picked.len() >= params.target_count {
                    return;
                }
            }
        }
    }
}

/// Overlays localized details and trailer links onto picked items
///
/// Best effort: a failed detail lookup leaves that item as picked and is
/// only logged.
pub async fn enrich(catalog: &dyn MovieCatalog, locale: &str, picks: &mut [Recommendation]) {
    for rec in picks.iter_mut() {
        match catalog.movie_details(locale, rec.id).await {
            Ok(details) => rec.apply_details(&details),
            Err(e) => {
                tracing::warn!(movie_id = rec.id, error = %e, "Detail enrichment failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CatalogMovie;
    use crate::services::providers::MockMovieCatalog;

    fn movie(id: u64) -> CatalogMovie {
        CatalogMovie {
            id,
            title: format!("Movie {}", id),
            vote_average: 7.0,
            overview: Some("synopsis".to_string()),
            poster_path: Some(format!("/{}.jpg", id)),
        }
    }

    fn posterless(id: u64) -> CatalogMovie {
        CatalogMovie {
            poster_path: None,
            ..movie(id)
        }
    }

    fn params(category: TasteCategory) -> RecommendParams {
        RecommendParams {
            category,
            locale: "ko-KR".to_string(),
            fallback_locale: Some("en-US".to_string()),
            region: "KR".to_string(),
            target_count: 5,
        }
    }

    fn ids(picks: &[Recommendation]) -> Vec<u64> {
        picks.iter().map(|r| r.id).collect()
    }

    /// Any (genre, page) combination not explicitly expected returns an
    /// empty page, ending that genre's paging.
    fn default_empty(mock: &mut MockMovieCatalog) {
        mock.expect_discover_page()
            .returning(|_, _, _, _| Ok(Vec::new()));
    }

    #[tokio::test]
    async fn test_short_circuits_after_target_reached() {
        let mut mock = MockMovieCatalog::new();

        // First genre, first page already fills the set; nothing else may
        // be fetched.
        mock.expect_discover_page()
            .withf(|locale, _, genre, page| locale == "ko-KR" && *genre == 10749 && *page == 1)
            .times(1)
            .returning(|_, _, _, _| {
                Ok(vec![movie(1), movie(2), movie(3), movie(4), movie(5), movie(6)])
            });

        let picks = recommend(&mock, &params(TasteCategory::RomanceDrama))
            .await
            .unwrap();

        assert_eq!(ids(&picks), vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_blended_category_merges_genres_in_order() {
        // Genre 10749 yields 3 qualifying items (2 posterless skipped)
        // across two pages; genre 18 yields 4 qualifying. Target 5 takes
        // the first 3 from genre 10749 then 2 from genre 18.
        let mut mock = MockMovieCatalog::new();

        mock.expect_discover_page()
            .withf(|l, _, genre, page| l == "ko-KR" && *genre == 10749 && *page == 1)
            .times(1)
            .returning(|_, _, _, _| Ok(vec![movie(1), posterless(90), movie(2)]));
        mock.expect_discover_page()
            .withf(|l, _, genre, page| l == "ko-KR" && *genre == 10749 && *page == 2)
            .times(1)
            .returning(|_, _, _, _| Ok(vec![posterless(91), movie(3)]));
        mock.expect_discover_page()
            .withf(|l, _, genre, page| l == "ko-KR" && *genre == 10749 && *page == 3)
            .times(1)
            .returning(|_, _, _, _| Ok(Vec::new()));
        mock.expect_discover_page()
            .withf(|l, _, genre, page| l == "ko-KR" && *genre == 18 && *page == 1)
            .times(1)
            .returning(|_, _, _, _| Ok(vec![movie(10), movie(11), movie(12), movie(13)]));

        let picks = recommend(&mock, &params(TasteCategory::RomanceDrama))
            .await
            .unwrap();

        assert_eq!(ids(&picks), vec![1, 2, 3, 10, 11]);
    }

    #[tokio::test]
    async fn test_duplicates_across_genres_are_skipped() {
        let mut mock = MockMovieCatalog::new();

        mock.expect_discover_page()
            .withf(|l, _, genre, page| l == "ko-KR" && *genre == 10749 && *page == 1)
            .times(1)
            .returning(|_, _, _, _| Ok(vec![movie(1), movie(2)]));
        mock.expect_discover_page()
            .withf(|l, _, genre, page| l == "ko-KR" && *genre == 10749 && *page == 2)
            .times(1)
            .returning(|_, _, _, _| Ok(Vec::new()));
        // Genre 18 repeats id 2; only the fresh ids count.
        mock.expect_discover_page()
            .withf(|l, _, genre, page| l == "ko-KR" && *genre == 18 && *page == 1)
            .times(1)
            .returning(|_, _, _, _| Ok(vec![movie(2), movie(3), movie(4), movie(5)]));

        let picks = recommend(&mock, &params(TasteCategory::RomanceDrama))
            .await
            .unwrap();

        assert_eq!(ids(&picks), vec![1, 2, 3, 4, 5]);

        let mut unique = ids(&picks);
        unique.dedup();
        assert_eq!(unique.len(), picks.len());
    }

    #[tokio::test]
    async fn test_fallback_locale_appends_after_primary() {
        let mut mock = MockMovieCatalog::new();

        // Primary locale yields 2 qualifying items in total.
        mock.expect_discover_page()
            .withf(|l, _, genre, page| l == "ko-KR" && *genre == 35 && *page == 1)
            .times(1)
            .returning(|_, _, _, _| Ok(vec![movie(1), movie(2)]));
        mock.expect_discover_page()
            .withf(|l, _, genre, page| l == "ko-KR" && *genre == 35 && *page == 2)
            .times(1)
            .returning(|_, _, _, _| Ok(Vec::new()));

        // Fallback yields 4 more, one of which duplicates a primary pick.
        mock.expect_discover_page()
            .withf(|l, _, genre, page| l == "en-US" && *genre == 35 && *page == 1)
            .times(1)
            .returning(|_, _, _, _| Ok(vec![movie(2), movie(7), movie(8), movie(9)]));

        let picks = recommend(&mock, &params(TasteCategory::Comedy)).await.unwrap();

        // Primary picks first, in order; fallback never reorders them.
        assert_eq!(ids(&picks), vec![1, 2, 7, 8, 9]);
    }

    #[tokio::test]
    async fn test_fallback_skipped_when_primary_fills_set() {
        let mut mock = MockMovieCatalog::new();

        mock.expect_discover_page()
            .withf(|l, _, _, _| l == "ko-KR")
            .times(1)
            .returning(|_, _, _, _| Ok(vec![movie(1), movie(2), movie(3), movie(4), movie(5)]));
        mock.expect_discover_page()
            .withf(|l, _, _, _| l == "en-US")
            .times(0)
            .returning(|_, _, _, _| Ok(Vec::new()));

        let picks = recommend(&mock, &params(TasteCategory::Comedy)).await.unwrap();
        assert_eq!(picks.len(), 5);
    }

    #[tokio::test]
    async fn test_fallback_equal_to_primary_is_not_requeried() {
        let mut mock = MockMovieCatalog::new();

        mock.expect_discover_page()
            .withf(|l, _, genre, page| l == "ko-KR" && *genre == 35 && *page == 1)
            .times(1)
            .returning(|_, _, _, _| Ok(vec![movie(1)]));
        mock.expect_discover_page()
            .withf(|l, _, genre, page| l == "ko-KR" && *genre == 35 && *page == 2)
            .times(1)
            .returning(|_, _, _, _| Ok(Vec::new()));

        let mut p = params(TasteCategory::Comedy);
        p.fallback_locale = Some("ko-KR".to_string());

        let picks = recommend(&mock, &p).await.unwrap();
        assert_eq!(ids(&picks), vec![1]);
    }

    #[tokio::test]
    async fn test_page_cap_bounds_fetching_per_genre() {
        let mut mock = MockMovieCatalog::new();

        // Every page yields one already-seen or posterless item, so paging
        // runs to the cap but never past it.
        mock.expect_discover_page()
            .withf(|l, _, genre, _| l == "ko-KR" && *genre == 35)
            .times(5)
            .returning(|_, _, _, _| Ok(vec![posterless(42)]));
        mock.expect_discover_page()
            .withf(|l, _, _, _| l == "en-US")
            .times(5)
            .returning(|_, _, _, _| Ok(vec![posterless(42)]));

        let picks = recommend(&mock, &params(TasteCategory::Comedy)).await.unwrap();
        assert!(picks.is_empty());
    }

    #[tokio::test]
    async fn test_posterless_items_never_returned() {
        let mut mock = MockMovieCatalog::new();

        mock.expect_discover_page()
            .withf(|l, _, genre, page| l == "ko-KR" && *genre == 35 && *page == 1)
            .times(1)
            .returning(|_, _, _, _| Ok(vec![posterless(1), movie(2), posterless(3), movie(4)]));
        default_empty(&mut mock);

        let picks = recommend(&mock, &params(TasteCategory::Comedy)).await.unwrap();

        assert_eq!(ids(&picks), vec![2, 4]);
        assert!(picks.iter().all(|r| !r.poster_url.is_empty()));
    }

    #[tokio::test]
    async fn test_failed_page_ends_genre_but_not_aggregation() {
        let mut mock = MockMovieCatalog::new();

        // Genre 10749 dies on page 1; genre 18 still satisfies the request.
        mock.expect_discover_page()
            .withf(|l, _, genre, _| l == "ko-KR" && *genre == 10749)
            .times(1)
            .returning(|_, _, _, _| Err(AppError::Upstream("boom".to_string())));
        mock.expect_discover_page()
            .withf(|l, _, genre, page| l == "ko-KR" && *genre == 18 && *page == 1)
            .times(1)
            .returning(|_, _, _, _| Ok(vec![movie(1), movie(2), movie(3), movie(4), movie(5)]));

        let picks = recommend(&mock, &params(TasteCategory::RomanceDrama))
            .await
            .unwrap();

        assert_eq!(picks.len(), 5);
    }

    #[tokio::test]
    async fn test_every_fetch_failing_is_upstream_error() {
        let mut mock = MockMovieCatalog::new();

        mock.expect_discover_page()
            .returning(|_, _, _, _| Err(AppError::Upstream("down".to_string())));

        let result = recommend(&mock, &params(TasteCategory::Comedy)).await;

        assert!(matches!(result, Err(AppError::Upstream(_))));
    }

    #[tokio::test]
    async fn test_empty_catalog_is_a_legitimate_empty_result() {
        let mut mock = MockMovieCatalog::new();
        default_empty(&mut mock);

        let picks = recommend(&mock, &params(TasteCategory::Comedy)).await.unwrap();
        assert!(picks.is_empty());
    }

    #[tokio::test]
    async fn test_enrich_applies_details_best_effort() {
        let mut mock = MockMovieCatalog::new();

        mock.expect_discover_page()
            .withf(|l, _, genre, page| l == "ko-KR" && *genre == 35 && *page == 1)
            .times(1)
            .returning(|_, _, _, _| Ok(vec![movie(1), movie(2)]));
        default_empty(&mut mock);

        mock.expect_movie_details()
            .withf(|_, id| *id == 1)
            .times(1)
            .returning(|_, _| {
                Ok(serde_json::from_str(
                    r#"{"id": 1, "title": "Localized One",
                        "videos": {"results": [{"key": "k1", "site": "YouTube", "type": "Trailer"}]}}"#,
                )
                .unwrap())
            });
        mock.expect_movie_details()
            .withf(|_, id| *id == 2)
            .times(1)
            .returning(|_, _| Err(AppError::Upstream("detail down".to_string())));

        let mut p = params(TasteCategory::Comedy);
        p.target_count = 2;
        let mut picks = recommend(&mock, &p).await.unwrap();

        enrich(&mock, "ko-KR", &mut picks).await;

        assert_eq!(picks[0].title, "Localized One");
        assert_eq!(
            picks[0].trailer_url.as_deref(),
            Some("https://www.youtube.com/watch?v=k1")
        );
        // Failed enrichment leaves the item untouched.
        assert_eq!(picks[1].title, "Movie 2");
        assert_eq!(picks[1].trailer_url, None);
    }
}
