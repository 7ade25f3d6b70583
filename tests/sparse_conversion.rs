//! Integration tests for dense ⇄ sparse conversion
//!
//! Covers the end-to-end behaviour of COO and CSR construction, lookup and
//! reconstruction, including hybrid tensors, offset sources, quantized and
//! half-precision types, and precondition failures.

mod common;

use common::{RecordingAllocator, assert_lookup_agreement, offset_tensor};
use sparsekit::dtype::{DType, QuantizationInfo};
use sparsekit::error::Error;
use sparsekit::runtime::Allocator;
use sparsekit::sparse::{CooTensor, CsrTensor, SparseFormat, SparseTensor};
use sparsekit::tensor::{DataLayout, Tensor, TensorInfo};

// ============================================================================
// Reference scenarios
// ============================================================================

#[test]
fn scenario_a_single_nonzero_row() {
    let dense = Tensor::from_slice(&[0i32, 0, 5, 0], &[4]).unwrap();
    let coo = CooTensor::with_sparse_dim(&dense, 1).unwrap();
    assert_eq!(coo.nnz(), 1);
    assert_eq!(coo.indices()[0].as_slice(), &[2]);
    assert_eq!(coo.values_as::<i32>().unwrap(), &[5]);
    assert_eq!(coo.to_dense().unwrap().to_vec::<i32>().unwrap(), vec![0, 0, 5, 0]);

    // Same data as a 1 x 4 matrix, fully sparse
    let dense = Tensor::from_slice(&[0i32, 0, 5, 0], &[1, 4]).unwrap();
    let coo = dense.to_coo(None).unwrap();
    assert_eq!(coo.indices()[0].as_slice(), &[0, 2]);
    assert_eq!(coo.get_value_as::<i32>(&[0, 2]).unwrap(), Some(5));
}

#[test]
fn scenario_b_csr_layout() {
    let mut data = [0i32; 9];
    data[0] = 1; // (0, 0)
    data[7] = 7; // (2, 1)
    let dense = Tensor::from_slice(&data, &[3, 3]).unwrap();
    let csr = CsrTensor::new(&dense).unwrap();

    assert_eq!(csr.row_offsets(), &[0, 1, 1, 2]);
    assert_eq!(csr.col_indices(), &[0, 1]);
    assert_eq!(csr.values_as::<i32>().unwrap(), &[1, 7]);
    assert_eq!(csr.get_value_as::<i32>(&[2, 1]).unwrap(), Some(7));
    assert_eq!(csr.get_value(&[1, 0]).unwrap(), None);
    assert_eq!(csr.to_dense().unwrap().to_vec::<i32>().unwrap(), data.to_vec());
}

#[test]
fn scenario_c_all_zero() {
    let shapes: [&[usize]; 4] = [&[5], &[3, 4], &[2, 3, 4], &[1, 1, 1, 1]];
    for shape in shapes {
        let dense = Tensor::zeros(shape, DType::F32).unwrap();
        for sparse_dim in 1..=shape.len() {
            let coo = CooTensor::with_sparse_dim(&dense, sparse_dim).unwrap();
            assert_eq!(coo.nnz(), 0);
            assert!(coo.values().is_empty());
            let back = coo.to_dense().unwrap();
            assert_eq!(back.shape().as_slice(), shape);
            assert!(back.as_bytes().unwrap().iter().all(|&b| b == 0));
        }
        if shape.len() == 2 {
            let csr = CsrTensor::new(&dense).unwrap();
            assert_eq!(csr.nnz(), 0);
            assert!(csr.row_offsets().iter().all(|&o| o == 0));
            let back = csr.to_dense().unwrap();
            assert_eq!(back.shape().as_slice(), shape);
            assert!(back.as_bytes().unwrap().iter().all(|&b| b == 0));
        }
    }
}

#[test]
fn scenario_d_non_row_major_source() {
    let alloc = RecordingAllocator::default();

    let nhwc = Tensor::from_slice(&[1i32, 2, 3, 4], &[1, 2, 2, 1])
        .unwrap()
        .with_data_layout(DataLayout::Nhwc);
    assert!(matches!(
        CooTensor::with_allocator(&nhwc, 4, &alloc),
        Err(Error::UnsupportedLayout {
            layout: DataLayout::Nhwc,
            ..
        })
    ));

    let transposed = Tensor::from_slice(&[1i32, 0, 0, 2, 0, 3], &[2, 3])
        .unwrap()
        .transpose(0, 1)
        .unwrap();
    assert!(matches!(
        CooTensor::with_allocator(&transposed, 2, &alloc),
        Err(Error::UnsupportedLayout { .. })
    ));
    assert!(matches!(
        CsrTensor::with_allocator(&transposed, &alloc),
        Err(Error::UnsupportedLayout { .. })
    ));

    assert!(alloc.requests().is_empty());
}

#[test]
fn scenario_e_csr_rejects_3d() {
    let dense = Tensor::zeros(&[2, 2, 2], DType::I32).unwrap();
    let err = CsrTensor::new(&dense).unwrap_err();
    assert_eq!(
        err,
        Error::UnsupportedShape {
            op: "CsrTensor::new",
            expected_ndim: 2,
            shape: vec![2, 2, 2],
        }
    );
    assert!(matches!(
        CsrTensor::new(&Tensor::zeros(&[4], DType::I32).unwrap()),
        Err(Error::UnsupportedShape { .. })
    ));
}

// ============================================================================
// Hybrid tensors
// ============================================================================

#[test]
fn hybrid_coo_end_to_end() {
    // Shape [2, 3, 2]: slices along the first two axes hold pairs
    #[rustfmt::skip]
    let data = [
        0u16, 0,   1, 0,   0, 0,
        0, 0,      0, 0,   0, 9,
    ];
    let dense = Tensor::from_slice(&data, &[2, 3, 2]).unwrap();
    let coo = CooTensor::with_sparse_dim(&dense, 2).unwrap();

    assert!(coo.is_hybrid());
    assert_eq!(coo.dense_dim(), 1);
    assert_eq!(coo.dense_volume(coo.sparse_dim()), 2);
    assert_eq!(coo.nnz(), 2);
    let coords: Vec<Vec<usize>> = coo.indices().iter().map(|c| c.to_vec()).collect();
    assert_eq!(coords, vec![vec![0, 1], vec![1, 2]]);
    assert_eq!(coo.values_as::<u16>().unwrap(), &[1, 0, 0, 9]);

    assert_eq!(coo.get_value_as::<u16>(&[1, 2, 1]).unwrap(), Some(9));
    assert_eq!(coo.get_value_as::<u16>(&[1, 2, 0]).unwrap(), Some(0));
    assert_eq!(coo.get_value_as::<u16>(&[1, 1, 0]).unwrap(), None);

    assert_lookup_agreement(&coo, coo.values(), 4);
    assert_eq!(coo.to_dense().unwrap().to_vec::<u16>().unwrap(), data.to_vec());

    // Density counts stored slices against scalar elements
    assert!((coo.density() - 2.0 / 12.0).abs() < 1e-12);
}

#[test]
fn every_sparse_dim_round_trips() {
    let data: Vec<i8> = (0..24).map(|i| if i % 5 == 0 { i as i8 - 7 } else { 0 }).collect();
    let dense = Tensor::from_slice(&data, &[2, 3, 4]).unwrap();
    let mut previous = usize::MAX;
    for sparse_dim in 1..=3 {
        let coo = dense.to_coo(Some(sparse_dim)).unwrap();
        assert_eq!(coo.to_dense().unwrap().to_vec::<i8>().unwrap(), data);
        // Finer splits never store fewer slices
        assert!(previous == usize::MAX || coo.nnz() >= previous);
        previous = coo.nnz();
    }
}

// ============================================================================
// Source variations
// ============================================================================

#[test]
fn byte_offset_source() {
    let data = [0u32, 3, 0, 0, 0, 8];
    let dense = offset_tensor(&data, &[2, 3], 5, u32::MAX);
    assert_eq!(dense.byte_offset(), 20);

    let coo = dense.to_coo(None).unwrap();
    assert_eq!(coo.nnz(), 2);
    assert_eq!(coo.values_as::<u32>().unwrap(), &[3, 8]);
    assert_eq!(coo.to_dense().unwrap().to_vec::<u32>().unwrap(), data.to_vec());

    let csr = dense.to_csr().unwrap();
    assert_eq!(csr.row_offsets(), &[0, 1, 2]);
    assert_eq!(csr.col_indices(), &[1, 2]);
    assert_eq!(csr.to_dense().unwrap().to_vec::<u32>().unwrap(), data.to_vec());
}

#[test]
fn quantized_round_trip_keeps_quantization() {
    let q = QuantizationInfo::uniform(0.05, -3);
    let data = [0i8, 0, -128, 0, 17, 0];
    let dense = Tensor::from_quantized_slice(&data, &[2, 3], DType::QAsymm8Signed, q.clone())
        .unwrap();

    let coo = dense.to_coo(None).unwrap();
    assert_eq!(coo.nnz(), 2);
    assert_eq!(coo.info().quantization(), &q);
    let back = coo.to_dense().unwrap();
    assert_eq!(back.dtype(), DType::QAsymm8Signed);
    assert_eq!(back.info().quantization(), &q);
    assert!(!back.info().is_sparse());
    assert_eq!(back.to_vec::<i8>().unwrap(), data.to_vec());

    let csr = dense.to_csr().unwrap();
    assert_eq!(csr.get_value_as::<i8>(&[0, 2]).unwrap(), Some(-128));
    assert_eq!(csr.to_dense().unwrap().info().quantization(), &q);
}

#[test]
fn quantized_16_bit_types() {
    let q = QuantizationInfo::per_channel(vec![0.5, 0.25]);
    let dense =
        Tensor::from_quantized_slice(&[0i16, -300, 7, 0], &[2, 2], DType::QSymm16, q).unwrap();
    let csr = dense.to_csr().unwrap();
    assert_eq!(csr.values_as::<i16>().unwrap(), &[-300, 7]);

    let dense = Tensor::from_quantized_slice(
        &[0u16, 0, 65535, 0],
        &[4],
        DType::QAsymm16,
        QuantizationInfo::uniform(1.0, 0),
    )
    .unwrap();
    let coo = dense.to_coo(None).unwrap();
    assert_eq!(coo.indices()[0].as_slice(), &[2]);
}

#[test]
fn f16_negative_zero_is_retained() {
    // 0x8000 is -0.0, 0x3c00 is 1.0
    let bits: [u16; 4] = [0x0000, 0x8000, 0x0000, 0x3c00];
    let dense = Tensor::from_bytes(bytemuck::cast_slice(&bits), &[2, 2], DType::F16).unwrap();

    let coo = dense.to_coo(None).unwrap();
    assert_eq!(coo.nnz(), 2);
    assert_eq!(coo.indices()[0].as_slice(), &[0, 1]);

    let csr = dense.to_csr().unwrap();
    assert_eq!(csr.nnz(), 2);
    assert_eq!(csr.to_dense().unwrap().as_bytes().unwrap(), dense.as_bytes().unwrap());
}

#[test]
fn f32_negative_zero_is_dropped() {
    let dense = Tensor::from_slice(&[-0.0f32, 0.0, 2.0], &[3]).unwrap();
    let coo = dense.to_coo(None).unwrap();
    assert_eq!(coo.nnz(), 1);
    assert_eq!(coo.indices()[0].as_slice(), &[2]);
}

// ============================================================================
// Preconditions
// ============================================================================

#[test]
fn unsupported_types_rejected_before_allocation() {
    let alloc = RecordingAllocator::default();
    for dtype in [DType::F64, DType::BF16, DType::I64, DType::U64, DType::Bool] {
        let dense = Tensor::zeros(&[2, 2], dtype).unwrap();
        assert!(matches!(
            CooTensor::with_allocator(&dense, 2, &alloc),
            Err(Error::UnsupportedDType { dtype: d, .. }) if d == dtype
        ));
        assert!(matches!(
            CsrTensor::with_allocator(&dense, &alloc),
            Err(Error::UnsupportedDType { .. })
        ));
    }
    assert_eq!(alloc.allocation_count(), 0);
}

#[test]
fn sparse_flagged_source_rejected() {
    let dense = Tensor::zeros(&[2, 2], DType::I32).unwrap();
    let flagged = Tensor::from_parts(
        TensorInfo::new([2, 2], DType::I32).with_sparse(true),
        dense.layout().clone(),
        dense.storage().clone(),
    )
    .unwrap();
    assert!(matches!(
        flagged.to_coo(None),
        Err(Error::InvalidInput { .. })
    ));
    assert!(matches!(flagged.to_csr(), Err(Error::InvalidInput { .. })));
}

#[test]
fn malformed_sparse_dim_rejected() {
    let dense = Tensor::from_slice(&[1u8, 2], &[2]).unwrap();
    for sparse_dim in [0, 2, 7] {
        assert!(matches!(
            CooTensor::with_sparse_dim(&dense, sparse_dim),
            Err(Error::InvalidInput { .. })
        ));
    }
}

// ============================================================================
// Allocation contract
// ============================================================================

#[test]
fn exactly_one_allocation_of_exact_size() {
    let data = [0i16, 4, 0, 0, 5, 6];
    let dense = Tensor::from_slice(&data, &[3, 2]).unwrap();

    let alloc = RecordingAllocator::default();
    let coo = CooTensor::with_allocator(&dense, 1, &alloc).unwrap();
    assert_eq!(coo.nnz(), 2);
    // Two i16 rows of two values, then one i32 coordinate per row
    assert_eq!(alloc.requests(), vec![2 * 2 * 2 + 2 * 4]);
    assert_eq!(coo.buffer().len(), 2 * 2 * 2);

    let alloc = RecordingAllocator::default();
    let csr = CsrTensor::with_allocator(&dense, &alloc).unwrap();
    assert_eq!(csr.nnz(), 3);
    assert_eq!(alloc.requests(), vec![(3 + 1) * 4 + 3 * 4 + 3 * 2]);
}

// ============================================================================
// Trait-object access
// ============================================================================

#[test]
fn dynamic_dispatch_over_formats() {
    let data = [0.0f32, 1.0, 0.0, 0.0, 0.0, 0.0, 2.0, 3.0];
    let dense = Tensor::from_slice(&data, &[2, 4]).unwrap();
    for format in [SparseFormat::Coo, SparseFormat::Csr] {
        let sparse: Box<dyn SparseTensor> = dense.to_sparse(format).unwrap();
        assert_eq!(sparse.format(), format);
        assert_eq!(sparse.nnz(), 3);
        assert_eq!(sparse.dim(), 2);
        assert!((sparse.density() + sparse.sparsity() - 1.0).abs() < 1e-12);
        assert!((sparse.density() - 3.0 / 8.0).abs() < 1e-12);
        assert!(sparse.memory_usage() >= 3 * 4);

        let mut text = String::new();
        sparse.print(&mut text).unwrap();
        assert!(text.starts_with(format.name()));

        let values: Vec<u8> = match format {
            SparseFormat::Coo => sparse.buffer().to_vec(),
            SparseFormat::Csr => sparse.buffer()[(3 + 3) * 4..].to_vec(),
        };
        assert_lookup_agreement(sparse.as_ref(), &values, 4);
        assert_eq!(sparse.to_dense().unwrap().to_vec::<f32>().unwrap(), data.to_vec());
    }
}
