//! Advanced (integer array) indexing reads

mod common;

use common::{create_cpu_client, iota, values};
use npindex::idx;
use npindex::prelude::*;

#[test]
fn test_pairwise_gather() {
    let a = iota(&[3, 3]);
    let g = a.index_get(idx![vec![0, 1], vec![2, 0]]).unwrap();
    assert_eq!(g.shape(), &[2]);
    assert_eq!(values(&g), vec![2.0, 3.0]);
    assert!(!g.shares_storage_with(&a));
}

#[test]
fn test_row_gather_keeps_trailing_axes() {
    let a = iota(&[3, 2]);
    let g = a.index_get(idx![[2, 0, 2]]).unwrap();
    assert_eq!(g.shape(), &[3, 2]);
    assert_eq!(values(&g), vec![4.0, 5.0, 0.0, 1.0, 4.0, 5.0]);
}

#[test]
fn test_column_gather_with_leading_slice() {
    let a = iota(&[2, 4]);
    let g = a.index_get(idx![.., vec![3, 0]]).unwrap();
    assert_eq!(g.shape(), &[2, 2]);
    assert_eq!(values(&g), vec![3.0, 0.0, 7.0, 4.0]);
}

#[test]
fn test_stepped_slice_with_array() {
    let a = iota(&[4, 3]);
    let g = a
        .index_get(idx![SliceSpec::full().with_step(2), vec![2]])
        .unwrap();
    assert_eq!(g.shape(), &[2, 1]);
    assert_eq!(values(&g), vec![2.0, 8.0]);
}

#[test]
fn test_integer_and_array_broadcast() {
    let a = iota(&[3, 4]);
    let g = a.index_get(idx![1, vec![0, 3]]).unwrap();
    assert_eq!(g.shape(), &[2]);
    assert_eq!(values(&g), vec![4.0, 7.0]);
}

#[test]
fn test_two_dimensional_index_array() {
    let a = iota(&[5]);
    let pos = IndexArray::host(vec![4, 0, 1, 1], &[2, 2]).unwrap();
    let g = a.index_get(idx![pos]).unwrap();
    assert_eq!(g.shape(), &[2, 2]);
    assert_eq!(values(&g), vec![4.0, 0.0, 1.0, 1.0]);
}

#[test]
fn test_broadcast_between_arrays() {
    let a = iota(&[3, 3]);
    let rows = IndexArray::host(vec![0, 2], &[2, 1]).unwrap();
    let g = a.index_get(idx![rows, vec![0, 1, 2]]).unwrap();
    assert_eq!(g.shape(), &[2, 3]);
    assert_eq!(values(&g), vec![0.0, 1.0, 2.0, 6.0, 7.0, 8.0]);
}

#[test]
fn test_separated_arrays_move_to_front() {
    let a = iota(&[2, 3, 4]);
    let g = a.index_get(idx![vec![0, 1], .., vec![1, 2]]).unwrap();
    assert_eq!(g.shape(), &[2, 3]);
    // g[i, j] = a[p[i], j, q[i]]
    assert_eq!(values(&g), vec![1.0, 5.0, 9.0, 14.0, 18.0, 22.0]);
}

#[test]
fn test_new_axis_with_array() {
    let a = iota(&[3, 4]);
    let g = a.index_get(idx![vec![0, 2], NewAxis]).unwrap();
    assert_eq!(g.shape(), &[2, 1, 4]);
    assert_eq!(
        values(&g),
        vec![0.0, 1.0, 2.0, 3.0, 8.0, 9.0, 10.0, 11.0]
    );
}

#[test]
fn test_negative_positions_and_ranges() {
    let a = iota(&[4]);
    let g = a.index_get(idx![vec![-1, -4]]).unwrap();
    assert_eq!(values(&g), vec![3.0, 0.0]);

    let r = a.index_get(idx![IndexArray::range(3, 0, -1).unwrap()]).unwrap();
    assert_eq!(values(&r), vec![3.0, 2.0, 1.0]);
}

#[test]
fn test_device_index_array() {
    let (client, _) = create_cpu_client();
    let a = iota(&[4]);
    let pos = NdArray::<CpuRuntime>::from_slice(&[3i32, 1], &[2], &client).unwrap();
    let g = a.index_get(idx![&pos]).unwrap();
    assert_eq!(values(&g), vec![3.0, 1.0]);
}

#[test]
fn test_empty_index_array() {
    let a = iota(&[3, 2]);
    let g = a.index_get(idx![Vec::<i64>::new()]).unwrap();
    assert_eq!(g.shape(), &[0, 2]);
}

#[test]
fn test_errors() {
    let (client, _) = create_cpu_client();
    let a = iota(&[3, 3]);

    let err = a.index_get(idx![vec![0, 3]]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Bounds);

    let err = a.index_get(idx![vec![0, 1], vec![0, 1, 2]]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Shape);

    let floats = NdArray::<CpuRuntime>::from_slice(&[0.0f32, 1.0], &[2], &client).unwrap();
    let err = a.index_get(idx![&floats]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeKind);

    let mask = NdArray::<CpuRuntime>::full(&[3], 1.0, DType::Bool, &client).unwrap();
    let err = a.index_get(idx![&mask]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedKey);
}
