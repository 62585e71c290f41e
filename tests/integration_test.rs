// Integration tests for bookrec
use bookrec::prelude::*;
use bookrec_similarity::rank_similar;
use bookrec_storage::{write_artifact, CATALOG_FILE};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

fn random_matrix(size: usize, rng: &mut StdRng) -> SimilarityMatrix {
    let mut rows = vec![vec![0.0f32; size]; size];
    for i in 0..size {
        rows[i][i] = 1.0;
        for j in (i + 1)..size {
            // Sparse, with deliberate ties at 0.25
            let score = match rng.random_range(0..4) {
                0 => 0.0,
                1 => 0.25,
                _ => rng.random_range(0.01f32..0.99f32),
            };
            rows[i][j] = score;
            rows[j][i] = score;
        }
    }
    SimilarityMatrix::from_dense(&rows).unwrap()
}

fn random_recommender(size: usize, seed: u64) -> Recommender {
    let mut rng = StdRng::seed_from_u64(seed);
    let catalog: Catalog = (0..size).map(|i| format!("Title {}", i)).collect();
    Recommender::new(Arc::new(catalog), Arc::new(random_matrix(size, &mut rng))).unwrap()
}

#[test]
fn test_end_to_end_from_disk() {
    let temp_dir = tempfile::tempdir().unwrap();
    let store = DataStore::new(temp_dir.path());

    let catalog = Catalog::new(vec![
        "Dune".to_string(),
        "Foundation".to_string(),
        "Neuromancer".to_string(),
    ]);
    let matrix = SimilarityMatrix::from_dense(&[
        vec![1.0, 0.7, 0.2],
        vec![0.7, 1.0, 0.4],
        vec![0.2, 0.4, 1.0],
    ])
    .unwrap();
    store.save(&catalog, &matrix).unwrap();

    let data = store.load().unwrap();
    assert_eq!(data.artifacts.len(), 2);

    let recommender = Recommender::new(Arc::new(data.catalog), Arc::new(data.matrix)).unwrap();
    assert_eq!(
        recommender.recommend("dune", 2).unwrap().titles(),
        vec!["Foundation", "Neuromancer"]
    );
    assert_eq!(
        recommender.recommend("Nonexistent Book", 2).unwrap(),
        Recommendation::NotFound
    );
    assert_eq!(recommender.catalog().search("dun"), vec!["Dune"]);
}

#[test]
fn test_empty_catalog_from_disk() {
    let temp_dir = tempfile::tempdir().unwrap();
    let store = DataStore::new(temp_dir.path());
    store.save(&Catalog::default(), &SimilarityMatrix::empty()).unwrap();

    let data = store.load().unwrap();
    assert!(data.catalog.is_empty());

    let recommender = Recommender::new(Arc::new(data.catalog), Arc::new(data.matrix)).unwrap();
    assert_eq!(recommender.recommend("Dune", 10).unwrap(), Recommendation::NotFound);
}

#[test]
fn test_pandas_style_catalog_export() {
    let temp_dir = tempfile::tempdir().unwrap();
    let store = DataStore::new(temp_dir.path());

    write_artifact(
        &temp_dir.path().join(CATALOG_FILE),
        &serde_json::json!([
            {"Title": "Emma", "Author": "Austen"},
            {"Title": "Persuasion", "Author": "Austen"}
        ]),
    )
    .unwrap();
    write_artifact(
        store.matrix_path(),
        &SimilarityMatrix::from_dense(&[vec![1.0, 0.3], vec![0.3, 1.0]]).unwrap(),
    )
    .unwrap();

    let data = store.load().unwrap();
    let recommender = Recommender::new(Arc::new(data.catalog), Arc::new(data.matrix)).unwrap();
    assert_eq!(recommender.recommend("EMMA", 10).unwrap().titles(), vec!["Persuasion"]);
}

#[test]
fn test_ranking_never_includes_query() {
    let recommender = random_recommender(60, 42);

    for p in 0..60 {
        let books = recommender.similar_to(p, 10).unwrap();
        assert!(books.iter().all(|b| b.position != p), "position {} recommended itself", p);
    }
}

#[test]
fn test_ranking_length_and_order() {
    let recommender = random_recommender(40, 7);

    for n in [0, 1, 5, 10, 39, 100] {
        for p in 0..40 {
            let books = recommender.similar_to(p, n).unwrap();
            assert_eq!(books.len(), n.min(39));

            for pair in books.windows(2) {
                assert!(pair[0].score >= pair[1].score);
                if pair[0].score == pair[1].score {
                    assert!(pair[0].position < pair[1].position);
                }
            }
        }
    }
}

#[test]
fn test_ranking_matches_full_sort() {
    let recommender = random_recommender(30, 99);
    let matrix = recommender.matrix();

    for p in 0..30 {
        let row = matrix.row_dense(p).unwrap();
        let mut expected: Vec<usize> = (0..30).filter(|&j| j != p).collect();
        // Stable sort keeps ascending position among equal scores
        expected.sort_by(|&a, &b| row[b].partial_cmp(&row[a]).unwrap());
        expected.truncate(10);

        let ranked = rank_similar(matrix, p, 10, SelfExclusion::ExcludeQuery).unwrap();
        let actual: Vec<usize> = ranked.iter().map(|r| r.position).collect();
        assert_eq!(actual, expected);
    }
}

#[test]
fn test_drop_first_matches_when_diagonal_dominates() {
    let recommender = random_recommender(25, 3);
    let legacy = recommender.clone().with_policy(SelfExclusion::DropFirst);

    for p in 0..25 {
        assert_eq!(
            recommender.similar_to(p, 10).unwrap(),
            legacy.similar_to(p, 10).unwrap()
        );
    }
}

#[test]
fn test_resolution_is_case_insensitive() {
    let recommender = random_recommender(10, 1);
    for i in 0..10 {
        let title = format!("Title {}", i);
        assert_eq!(recommender.resolve(&title), Some(i));
        assert_eq!(recommender.resolve(&title.to_uppercase()), Some(i));
        assert_eq!(recommender.resolve(&title.to_lowercase()), Some(i));
    }
}

#[test]
fn test_search_capped_and_case_insensitive() {
    let recommender = random_recommender(50, 5);
    let results = recommender.catalog().search("TITLE");
    assert_eq!(results.len(), bookrec::SEARCH_LIMIT);
    assert_eq!(results[0], "Title 0");
}
