use std::sync::Arc;
use std::thread;

use runfield::config::{FieldDataConfig, RuntimeFieldConfig, RuntimeFieldType};
use runfield::fielddata::{
    FieldDataService, IndexFieldData, LeafFactory, LeafNumericFieldData,
};
use runfield::search::{MultiValueMode, aggregate_stats, sort_segments};
use runfield::segment::SegmentContext;
use runfield::testing::{VecLeafFactory, VecLongLeafFactory};

fn segments() -> Vec<SegmentContext> {
    vec![SegmentContext::new(0, 0, 3), SegmentContext::new(1, 3, 2)]
}

fn service() -> FieldDataService {
    let _ = env_logger::builder().is_test(true).try_init();

    let service = FieldDataService::new(FieldDataConfig::default());
    let score = RuntimeFieldConfig::from_json(r#"{"name": "computed_score", "type": "double"}"#)
        .unwrap();
    service
        .register(
            &score,
            LeafFactory::Double(Arc::new(VecLeafFactory::new(
                "computed_score",
                vec![
                    vec![vec![3.0, 1.0], vec![], vec![2.5]],
                    vec![vec![0.5, 9.0], vec![4.0]],
                ],
            ))),
        )
        .unwrap();
    service
        .register(
            &RuntimeFieldConfig::new("visits", RuntimeFieldType::Long),
            LeafFactory::Long(Arc::new(VecLongLeafFactory::new(
                "visits",
                vec![vec![vec![5], vec![1, 2], vec![]], vec![vec![7], vec![]]],
            ))),
        )
        .unwrap();
    service
}

#[test]
fn test_sort_runtime_double_ascending() {
    let service = service();
    let field_data = service.get_for_field("computed_score").unwrap();
    let sort = service.sort_field("computed_score", false).unwrap();
    assert_eq!(sort.mode(), MultiValueMode::Min);

    let hits = sort_segments(&field_data, &sort, &segments(), 10).unwrap();
    let docs: Vec<u64> = hits.iter().map(|h| h.doc).collect();
    // mins: doc0 1.0, doc1 none, doc2 2.5, doc3 0.5, doc4 4.0
    assert_eq!(docs, vec![3, 0, 2, 4, 1]);
    assert_eq!(hits[4].value, None);
}

#[test]
fn test_sort_runtime_long_descending_top_n() {
    let service = service();
    let field_data = service.get_for_field("visits").unwrap();
    let sort = service.sort_field("visits", true).unwrap();

    let hits = sort_segments(&field_data, &sort, &segments(), 2).unwrap();
    let docs: Vec<u64> = hits.iter().map(|h| h.doc).collect();
    assert_eq!(docs, vec![3, 0]);
    assert_eq!(hits[0].value, Some(7.0));
}

#[test]
fn test_aggregate_runtime_double() {
    let service = service();
    let field_data = service.get_for_field("computed_score").unwrap();

    let stats = aggregate_stats(&field_data, &segments()).unwrap();
    assert_eq!(stats.count, 6);
    assert_eq!(stats.sum, 20.0);
    assert_eq!(stats.min, Some(0.5));
    assert_eq!(stats.max, Some(9.0));
}

#[test]
fn test_threads_load_their_own_segments() {
    let service = Arc::new(service());

    let handles: Vec<_> = segments()
        .into_iter()
        .map(|segment| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                let field_data = service.get_for_field("computed_score").unwrap();
                let mut leaf = field_data.load(&segment).unwrap();
                let values = leaf.double_values();

                let mut total = 0.0;
                for doc in 0..segment.max_doc() {
                    if values.advance_exact(doc).unwrap() {
                        for _ in 0..values.doc_value_count() {
                            total += values.next_value();
                        }
                    }
                }
                total
            })
        })
        .collect();

    let totals: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(totals, vec![6.5, 13.5]);
}

#[test]
fn test_unknown_segment_fails_whole_sort() {
    let service = service();
    let field_data = service.get_for_field("computed_score").unwrap();
    let sort = service.sort_field("computed_score", false).unwrap();
    let segments = vec![SegmentContext::new(0, 0, 3), SegmentContext::new(7, 3, 1)];

    let err = sort_segments(&field_data, &sort, &segments, 10).unwrap_err();
    assert!(err.to_string().contains("segment[7]"));
}
