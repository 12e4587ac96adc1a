//! Writes through basic and advanced keys

mod common;

use common::{create_cpu_client, iota, values, zeros};
use npindex::idx;
use npindex::prelude::*;

#[test]
fn test_repeated_rows_last_writer_wins() {
    let a = zeros(&[2, 3]);
    a.index_set(idx![vec![0, 0]], vec![vec![1, 1, 1], vec![2, 2, 2]])
        .unwrap();
    assert_eq!(values(&a), vec![2.0, 2.0, 2.0, 0.0, 0.0, 0.0]);
}

#[test]
fn test_repeated_elements_do_not_accumulate() {
    let a = zeros(&[4]);
    a.index_set(idx![vec![1, 1, 1]], 5.0).unwrap();
    assert_eq!(values(&a), vec![0.0, 5.0, 0.0, 0.0]);
}

#[test]
fn test_view_write_visible_in_source() {
    let a = zeros(&[4, 5]);
    let view = a.index_get(idx![1..3, ..]).unwrap();
    view.index_set(idx![0, 4], 9.0).unwrap();
    assert_eq!(a.index_get(idx![1, 4]).unwrap().item::<f32>().unwrap(), 9.0);

    a.index_set(idx![2, 0], 7.0).unwrap();
    assert_eq!(view.index_get(idx![1, 0]).unwrap().item::<f32>().unwrap(), 7.0);
}

#[test]
fn test_basic_set_then_get_round_trip() {
    let a = zeros(&[4, 5]);
    let keys = [
        idx![1..3, ..],
        idx![.., SliceSpec::full().with_step(2)],
        idx![SliceSpec::new(None, None, Some(-1)), 2],
        idx![3],
    ];
    for key in keys {
        a.fill_with(0.0).unwrap();
        let shape = a.index_get(key.clone()).unwrap().shape().to_vec();
        let n: usize = shape.iter().product();
        let last = *shape.last().unwrap_or(&1);
        let row: Vec<f64> = (0..last).map(|v| v as f64 + 1.0).collect();

        a.index_set(key.clone(), row.clone()).unwrap();
        let got = values(&a.index_get(key).unwrap());
        let expected: Vec<f32> = (0..n).map(|i| row[i % last] as f32).collect();
        assert_eq!(got, expected);
    }
}

#[test]
fn test_strided_set_leaves_rest_untouched() {
    let a = zeros(&[3, 4]);
    a.index_set(idx![.., SliceSpec::new(Some(1), None, Some(2))], 1.0)
        .unwrap();
    assert_eq!(
        values(&a),
        vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0]
    );
}

#[test]
fn test_set_with_new_axis_squeezes_value() {
    let a = zeros(&[2, 3]);
    // value carries the new axis: shape (1, 3)
    a.index_set(idx![0, NewAxis], vec![vec![1.0, 2.0, 3.0]]).unwrap();
    assert_eq!(values(&a), vec![1.0, 2.0, 3.0, 0.0, 0.0, 0.0]);

    a.index_set(idx![1, NewAxis], vec![4.0, 5.0, 6.0]).unwrap();
    assert_eq!(values(&a), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
}

#[test]
fn test_advanced_set_round_trip() {
    let a = zeros(&[3, 3]);
    a.index_set(idx![vec![0, 1], vec![2, 0]], vec![5.0, 6.0]).unwrap();
    assert_eq!(
        values(&a.index_get(idx![vec![0, 1], vec![2, 0]]).unwrap()),
        vec![5.0, 6.0]
    );
    assert_eq!(values(&a), vec![0.0, 0.0, 5.0, 6.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
}

#[test]
fn test_advanced_set_with_slice_and_broadcast() {
    let a = zeros(&[2, 4]);
    a.index_set(idx![.., vec![3, 0]], vec![1.0, 2.0]).unwrap();
    assert_eq!(values(&a), vec![2.0, 0.0, 0.0, 1.0, 2.0, 0.0, 0.0, 1.0]);
}

#[test]
fn test_set_from_array_casts_dtype() {
    let (client, _) = create_cpu_client();
    let a = zeros(&[2, 2]);
    let src = NdArray::<CpuRuntime>::from_slice(&[7i64, 8], &[2], &client).unwrap();
    a.index_set(idx![1], &src).unwrap();
    assert_eq!(values(&a), vec![0.0, 0.0, 7.0, 8.0]);
}

#[test]
fn test_set_from_overlapping_view() {
    let a = iota(&[6]);
    let head = a.index_get(idx![..4]).unwrap();
    a.index_set(idx![2..], &head).unwrap();
    assert_eq!(values(&a), vec![0.0, 1.0, 0.0, 1.0, 2.0, 3.0]);
}

#[test]
fn test_set_errors() {
    let a = zeros(&[2, 3]);
    let err = a.index_set(idx![0], vec![1.0, 2.0]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Shape);

    let err = a.index_set(idx![5], 1.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Bounds);

    let err = a
        .index_set(idx![0], vec![vec![1.0], vec![2.0, 3.0]])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeKind);
}

#[test]
fn test_empty_selection_write_is_noop() {
    let a = iota(&[3]);
    a.index_set(idx![1..1], 9.0).unwrap();
    assert_eq!(values(&a), vec![0.0, 1.0, 2.0]);
}

#[test]
fn test_whole_array_assignment() {
    let a = zeros(&[2, 2]);
    a.index_set(idx![], vec![1.0, 2.0]).unwrap();
    assert_eq!(values(&a), vec![1.0, 2.0, 1.0, 2.0]);
    a.index_set(idx![Ellipsis], 3.0).unwrap();
    assert_eq!(values(&a), vec![3.0; 4]);
}

#[test]
fn test_in_place_arithmetic_on_view() {
    let a = iota(&[2, 3]);
    let row = a.index_get(idx![0]).unwrap();
    row.add_assign(10.0).unwrap();
    row.mul_assign(vec![1.0, 2.0, 3.0]).unwrap();
    assert_eq!(values(&a), vec![10.0, 22.0, 36.0, 3.0, 4.0, 5.0]);

    let err = row.add_assign(vec![1.0, 2.0]).unwrap_err();
    assert!(matches!(err, Error::BroadcastError { .. }));
}

#[test]
fn test_parallel_client_fill() {
    let (client, _) = create_cpu_client();
    let client = client.with_parallelism(ParallelismConfig::new(Some(2), Some(16)));
    let a = NdArray::<CpuRuntime>::zeros(&[64, 64], DType::F64, &client).unwrap();
    a.index_set(idx![10..20], 1.5).unwrap();
    let sum: f64 = a.to_vec::<f64>().unwrap().iter().sum();
    assert_eq!(sum, 1.5 * 640.0);
}

#[test]
fn test_large_integers_round_trip() {
    let (client, _) = create_cpu_client();
    let a = NdArray::<CpuRuntime>::zeros(&[3], DType::I64, &client).unwrap();
    let big = (1i64 << 53) + 1;

    a.index_set(idx![0], big).unwrap();
    a.index_set(idx![1..], vec![big + 2, -big]).unwrap();
    assert_eq!(a.to_vec::<i64>().unwrap(), vec![big, big + 2, -big]);

    a.fill_with(big).unwrap();
    assert_eq!(a.to_vec::<i64>().unwrap(), vec![big; 3]);

    let wide = NdArray::<CpuRuntime>::full(&[2], u64::MAX, DType::U64, &client).unwrap();
    assert_eq!(wide.to_vec::<u64>().unwrap(), vec![u64::MAX; 2]);
}

#[test]
fn test_value_with_leading_unit_axis() {
    let a = zeros(&[2, 3]);
    a.index_set(idx![0], vec![vec![1.0, 2.0, 3.0]]).unwrap();
    assert_eq!(values(&a), vec![1.0, 2.0, 3.0, 0.0, 0.0, 0.0]);

    let src = iota(&[1, 1, 3]);
    a.index_set(idx![1], &src).unwrap();
    assert_eq!(values(&a), vec![1.0, 2.0, 3.0, 0.0, 1.0, 2.0]);
}
