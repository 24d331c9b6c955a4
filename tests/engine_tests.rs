use collatz_longest::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn best(limit: u64, workers: usize) -> (u64, u64) {
    let report = search(&SearchRequest::new(limit, workers), &CancellationToken::new()).unwrap();
    assert!(report.is_completed(), "limit={} workers={}", limit, workers);
    (report.best_start().unwrap(), report.best_length().unwrap())
}

#[test]
fn test_limit_one() {
    assert_eq!(best(1, 1), (1, 1));
    assert_eq!(best(1, 4), (1, 1));
}

#[test]
fn test_limit_ten() {
    assert_eq!(best(10, 1), (9, 20));
    assert_eq!(best(10, 3), (9, 20));
}

#[test]
fn test_known_limits() {
    assert_eq!(best(100, 4), (97, 119));
    assert_eq!(best(1000, 4), (871, 179));
    assert_eq!(best(10_000, 4), (6171, 262));
    assert_eq!(best(1_000_000, 8), (837799, 525));
}

#[test]
fn test_tie_break_independent_of_worker_count() {
    // 18 と 19 はどちらも長さ 21。常に大きい方を返す
    assert_eq!(best(18, 1), (18, 21));
    for workers in 1..=8 {
        assert_eq!(best(19, workers), (19, 21), "workers={}", workers);
    }
}

#[test]
fn test_result_independent_of_worker_count() {
    for limit in [2u64, 7, 19, 255, 256, 257, 1000, 12_345] {
        let single = best(limit, 1);
        for workers in 2..=9 {
            assert_eq!(best(limit, workers), single, "limit={} workers={}", limit, workers);
        }
    }
}

#[test]
fn test_zero_workers_coerced_to_one() {
    assert_eq!(best(10, 0), (9, 20));
}

#[test]
fn test_more_workers_than_values() {
    assert_eq!(best(3, 16), (3, 8));
}

#[test]
fn test_length_at_least_one() {
    for limit in 1u64..=40 {
        let (_, len) = best(limit, 3);
        assert!(len >= 1);
    }
}

#[test]
fn test_zero_limit_is_rejected() {
    let err = search(&SearchRequest::new(0, 4), &CancellationToken::new()).unwrap_err();
    assert!(matches!(err, SearchError::EmptyRange));
}

#[test]
fn test_pre_cancelled_token_reports_stopped() {
    let token = CancellationToken::new();
    token.cancel();
    let report = search(&SearchRequest::new(1_000_000, 4), &token).unwrap();
    assert!(report.was_stopped());
    assert!(!report.had_overflow());
    assert_eq!(report.best_start(), None);
    assert_eq!(report.best_length(), None);
    assert_eq!(report.summary_message(), STOPPED_MESSAGE);
}

#[test]
fn test_stop_from_another_thread() {
    let engine = Arc::new(SearchEngine::new());
    let runner = Arc::clone(&engine);
    let handle = thread::spawn(move || runner.compute(1u64 << 40, 2));

    // compute 開始時のリセットより後に届くよう、終わるまで停止を送り続ける
    while !handle.is_finished() {
        engine.request_stop();
        thread::sleep(Duration::from_millis(10));
    }
    let report = handle.join().unwrap().unwrap();
    assert!(report.was_stopped());
    assert_eq!(report.best_start(), None);
    assert_eq!(engine.last_report(), Some(report));
}

#[test]
fn test_stop_handle_shares_engine_token() {
    let engine = Arc::new(SearchEngine::new());
    let stop = engine.stop_handle();
    let runner = Arc::clone(&engine);
    let handle = thread::spawn(move || runner.compute(1u64 << 40, 3));
    while !handle.is_finished() {
        stop.cancel();
        thread::sleep(Duration::from_millis(10));
    }
    assert!(handle.join().unwrap().unwrap().was_stopped());
}

#[test]
fn test_engine_runs_again_after_stop() {
    let engine = SearchEngine::new();
    engine.request_stop();
    let report = engine.compute(10, 2).unwrap();
    assert!(report.is_completed());
    assert_eq!(report.best_start(), Some(9));
    assert_eq!(
        report.summary_message(),
        format!("Best Start Number: 9\nSequence Length: 20\nTime: {} ms", report.elapsed_ms())
    );
}
